pub mod app;
pub mod remote;
