use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::error;

pub(crate) fn handle_internal_server_error<E: std::error::Error>(e: E) -> impl IntoResponse {
    error!(error = %e, "unhandled error occurred.");
    (StatusCode::INTERNAL_SERVER_ERROR, error_payload("INTERNAL_SERVER_ERROR", "Internal Server Error"))
}

#[derive(Serialize, Debug)]
pub(crate) struct ErrorPayload<'a, D: Serialize> {
    code: &'a str,
    message: &'a str,
    data: D,
}

#[derive(Serialize, Debug)]
pub(crate) struct EmptyData {}

pub fn error_payload<'a>(code: &'a str, message: &'a str) -> Json<ErrorPayload<'a, EmptyData>> {
    Json(ErrorPayload { code, message, data: EmptyData {} })
}

pub fn error_payload_with_data<'a, D: Serialize>(
    code: &'a str,
    message: &'a str,
    data: D,
) -> Json<ErrorPayload<'a, D>> {
    Json(ErrorPayload { code, message, data })
}

/// Json extractor whose rejection renders as the error payload shape with
/// status 400 instead of axum's default rejection.
pub(crate) struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(payload)) => Ok(Self(payload)),
            Err(rejection) => Err((
                StatusCode::BAD_REQUEST,
                error_payload_with_data(
                    "INVALID_REQUEST_BODY",
                    "request body is invalid",
                    RequestBodyErrorData { detail: rejection.body_text() },
                ),
            )
                .into_response()),
        }
    }
}

#[derive(Serialize, Debug)]
struct RequestBodyErrorData {
    detail: String,
}

#[cfg(test)]
mod test {
    use axum::{
        body::Body,
        extract::{FromRequest, Request},
        http::StatusCode,
    };
    use serde::Deserialize;

    use super::Payload;

    #[derive(Deserialize)]
    struct NamedRequest {
        name: String,
    }

    #[tokio::test]
    async fn when_request_body_is_valid_then_payload_extractor_returns_payload_ok() {
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name": "City Clinic"}"#))
            .expect("building request should be successful");

        let Payload(payload) = Payload::<NamedRequest>::from_request(request, &())
            .await
            .expect("extracting payload should be successful");

        assert_eq!(payload.name, "City Clinic");
    }

    #[tokio::test]
    async fn when_request_body_is_missing_required_field_then_payload_extractor_returns_bad_request() {
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .expect("building request should be successful");

        let result = Payload::<NamedRequest>::from_request(request, &()).await;

        let response = match result {
            Ok(_) => panic!("extracting a payload without required fields should fail"),
            Err(response) => response,
        };

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
