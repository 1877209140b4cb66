use super::*;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        theme::handle_get_theme,
        theme::handle_put_theme,
        config::handle_config,
        health::handle_health,
    ),
    info(
        title = "Brandkit API",
        description = "Read and update the brand color settings applied by every client"
    )
)]
pub struct ApiDoc;
