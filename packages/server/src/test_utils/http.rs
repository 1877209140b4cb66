use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request},
};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use tower::Service;

use crate::{
    args::CliArgs,
    http::{server::make_router_with_state, state::HttpState},
    store::AnyThemeStore,
};

use super::app::TestApp;

#[derive(Clone)]
pub struct TestHttpApp {
    pub inner: TestApp,
    pub state: HttpState,
    _http_router: axum::Router,
}

impl TestHttpApp {
    pub async fn new() -> Self {
        Self::new_with_args(TestApp::zeroed_cli_args()).await
    }

    pub async fn new_with_args(cli_args: CliArgs) -> Self {
        let inner = TestApp::new_with_args(cli_args).await;
        let state = HttpState::new(inner.config.as_ref().clone()).unwrap();

        Self::new_with_state(inner, state)
    }

    /// Another app sharing this one's store, as if a second server process
    /// were pointed at the same settings
    pub fn new_sharing_store(&self, store: Arc<AnyThemeStore>) -> Self {
        let state = HttpState::new_with_store(self.inner.config.as_ref().clone(), store);
        Self::new_with_state(self.inner.clone(), state)
    }

    fn new_with_state(inner: TestApp, state: HttpState) -> Self {
        let http_router = make_router_with_state(state.clone());

        Self {
            inner,
            state,
            _http_router: http_router,
        }
    }

    pub async fn http_router(&mut self) -> &mut axum::Router {
        // wait till it's ready
        <axum::Router as tower::ServiceExt<axum::extract::Request<axum::body::Body>>>::ready(
            &mut self._http_router,
        )
        .await
        .unwrap();

        &mut self._http_router
    }

    pub async fn call(&mut self, req: Request<Body>) -> axum::http::Response<Body> {
        self.http_router().await.call(req).await.unwrap()
    }

    pub async fn get(&mut self, uri: &str) -> axum::http::Response<Body> {
        let req = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        self.call(req).await
    }

    pub async fn put_json(
        &mut self,
        uri: &str,
        body: &serde_json::Value,
    ) -> axum::http::Response<Body> {
        let req = Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();

        self.call(req).await
    }
}

pub async fn map_response<T: DeserializeOwned>(response: axum::http::Response<Body>) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
