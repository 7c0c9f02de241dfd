use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use super::ApiError;

/// Typed route parameters, e.g. `Params(course_id): Params<i32>`.
///
/// A segment that does not parse means the object cannot exist, so it is
/// reported as not found on the index page instead of axum's plain-text 400.
pub struct Params<T>(pub T);

impl<S, T> FromRequestParts<S> for Params<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(path = %parts.uri.path(), "Bad route parameters: {}", rejection);
                Err(ApiError::not_found("The page you are looking for does not exist"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    async fn echo(Params((course_id, item)): Params<(i32, i32)>) -> String {
        format!("{course_id}/{item}")
    }

    fn app() -> Router {
        Router::new().route("/echo/{course_id}/{item}", get(echo))
    }

    async fn status_of(uri: &str) -> StatusCode {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn numeric_segments_are_extracted() {
        assert_eq!(status_of("/echo/3/7").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn bad_segments_are_not_found() {
        assert_eq!(status_of("/echo/abc/7").await, StatusCode::NOT_FOUND);
        assert_eq!(status_of("/echo/3/99999999999").await, StatusCode::NOT_FOUND);
    }
}
