pub mod args;
pub mod cache;
pub mod config;
pub mod error;
pub mod remote;
pub mod style;
pub mod sync;
pub mod test_utils;

pub fn init_tracing_tests() {
    utils::init_tracing_tests();
}
