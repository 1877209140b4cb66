mod color;
mod http;
mod settings;
mod shade;

pub use color::*;
pub use http::*;
pub use settings::*;
pub use shade::*;
