use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};
use brandkit_types::ErrorResponse;
use subtle::ConstantTimeEq;

/// State for [`verify_bearer`], the token every request must present
/// and the realm reported back when it does not
#[derive(Clone, Debug)]
pub struct BearerAuth {
    pub token: String,
    pub realm: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>, realm: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            realm: realm.into(),
        }
    }

    fn unauthorized(&self, error: &str, description: &str) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            [(
                header::WWW_AUTHENTICATE,
                format!(
                    "Bearer realm=\"{}\", error=\"{}\", error_description=\"{}\"",
                    self.realm, error, description
                ),
            )],
            Json(ErrorResponse::new("Unauthorized")),
        )
            .into_response()
    }
}

pub async fn verify_bearer(
    State(auth): State<BearerAuth>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    req: Request,
    next: Next,
) -> Response {
    match bearer {
        Ok(TypedHeader(Authorization(bearer))) => {
            if bearer.token().as_bytes().ct_eq(auth.token.as_bytes()).into() {
                next.run(req).await
            } else {
                tracing::debug!("rejected request with mismatched bearer token");
                auth.unauthorized("invalid_token", "token_mismatch")
            }
        }
        Err(_) => auth.unauthorized("invalid_request", "invalid_authorization_header"),
    }
}

#[cfg(test)]
mod tests {
    use super::{verify_bearer, BearerAuth};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        middleware,
        routing::put,
        Router,
    };
    use brandkit_types::ErrorResponse;
    use http_body_util::BodyExt;
    use tower::util::ServiceExt; // for `oneshot`

    fn app_with_auth(token: &str) -> Router {
        Router::new()
            .route("/theme", put(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(
                BearerAuth::new(token, "brandkit"),
                verify_bearer,
            ))
    }

    fn put_theme(authorization: Option<&str>) -> Request<Body> {
        let mut req = Request::builder().method("PUT").uri("/theme");
        if let Some(value) = authorization {
            req = req.header(header::AUTHORIZATION, value);
        }
        req.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let resp = app_with_auth("s3cr3t").oneshot(put_theme(None)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let val = resp
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(val.contains("Bearer realm=\"brandkit\""));
        assert!(val.contains("error=\"invalid_request\""));

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.error, "Unauthorized");
    }

    #[tokio::test]
    async fn wrong_token_is_unauthorized() {
        let resp = app_with_auth("s3cr3t")
            .oneshot(put_theme(Some("Bearer wrong")))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let val = resp.headers().get(header::WWW_AUTHENTICATE).unwrap();
        assert!(val.to_str().unwrap().contains("error=\"invalid_token\""));
    }

    #[tokio::test]
    async fn correct_token_allows() {
        let resp = app_with_auth("s3cr3t")
            .oneshot(put_theme(Some("Bearer s3cr3t")))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
