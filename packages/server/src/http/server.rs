use crate::config::Config;
use axum::{
    middleware,
    routing::{get, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utils::{
    context::AppContext,
    http::{verify_bearer, BearerAuth},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use wildmatch::WildMatch;

use super::{
    handlers::{
        handle_config, handle_get_theme, handle_health, handle_not_found, handle_put_theme,
        openapi::ApiDoc,
    },
    state::HttpState,
};

// this is called from main
pub fn start(ctx: AppContext, config: Config) -> anyhow::Result<()> {
    // The server runs within the tokio runtime
    ctx.rt.clone().block_on(async move {
        let (host, port) = (config.host.clone(), config.port);

        let mut shutdown_signal = ctx.get_kill_receiver();

        let router = make_router(config).await?;

        let listener = tokio::net::TcpListener::bind(&format!("{}:{}", host, port)).await?;

        tracing::info!("Http server starting on: {}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_signal.recv().await.ok();

                tracing::debug!("Http server shutting down");
            })
            .await?;

        anyhow::Ok(())
    })
}

// this is called from main and tests
pub async fn make_router(config: Config) -> anyhow::Result<axum::Router> {
    let state = HttpState::new(config)?;
    Ok(make_router_with_state(state))
}

// tests use this directly to share a store between routers
pub fn make_router_with_state(state: HttpState) -> axum::Router {
    let config = state.config.clone();

    // public routes
    let public = axum::Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/theme", get(handle_get_theme))
        .route("/config", get(handle_config))
        .route("/health", get(handle_health))
        .fallback(handle_not_found)
        .with_state(state.clone());

    // protected routes
    let protected = axum::Router::new()
        .route("/theme", put(handle_put_theme))
        .with_state(state);

    // apply bearer auth to protected routes if configured
    let mut router = public
        .merge(match &config.bearer_token {
            Some(token) => protected.layer(middleware::from_fn_with_state(
                BearerAuth::new(token.clone(), "brandkit"),
                verify_bearer,
            )),
            None => protected,
        })
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(&config) {
        router = router.layer(cors);
    }

    router
}

fn cors_layer(config: &Config) -> Option<CorsLayer> {
    if config.cors_allowed_origins.is_empty() {
        None
    } else {
        let allowed_origins: Vec<WildMatch> = config
            .cors_allowed_origins
            .iter()
            .map(|s| WildMatch::new(s))
            .collect();

        Some(
            CorsLayer::new()
                // a predicate allows wildcard patterns like https://*.example.com
                .allow_origin(tower_http::cors::AllowOrigin::predicate(
                    move |origin, _parts| {
                        origin
                            .to_str()
                            .map(|origin| {
                                allowed_origins
                                    .iter()
                                    .any(|allowed_origin| allowed_origin.matches(origin))
                            })
                            .unwrap_or(false)
                    },
                ))
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
    }
}
