#![allow(clippy::uninlined_format_args)]

pub mod config;
pub mod context;
pub mod http;
pub mod serde;
pub mod storage;

// the test version of init_tracing does not take a config
// since config itself is tested and modified from different parallel tests
// therefore, this only uses the default tracing settings
// it's not gated out because it is used in integration tests of other packages as well
pub fn init_tracing_tests() {
    use std::sync::LazyLock;

    // however, it has an extra complexity of race conditions across threads
    // so we use a Mutex to ensure we only initialize once globally
    static INIT: LazyLock<std::sync::Mutex<bool>> = LazyLock::new(|| std::sync::Mutex::new(false));

    let mut init = INIT.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

    if !*init {
        *init = true;

        // try_init, since a test binary may have installed its own subscriber
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        tracing::debug!("Tracing initialized for tests");
    }
}
