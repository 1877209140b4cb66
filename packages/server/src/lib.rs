pub mod args;
pub mod auth;
pub mod config;
pub mod http;
pub mod store;
pub mod test_utils;

use utils::context::AppContext;

/// Entry point to start up the server
/// Called from main
pub fn run_server(ctx: AppContext, config: config::Config) -> anyhow::Result<()> {
    ctrlc::set_handler({
        let ctx = ctx.clone();
        move || {
            ctx.kill();
        }
    })?;

    // blocks until the kill switch fires
    http::server::start(ctx, config)
}

// the test version of init_tracing does not take a config
// since config itself is tested and modified from different parallel tests
// therefore, this only uses the default tracing settings
pub fn init_tracing_tests() {
    utils::init_tracing_tests();
}
