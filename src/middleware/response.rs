use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Wrapper for API responses that adds the `{"success": <message>, ...}` envelope.
///
/// `data` must serialize to a JSON object (its keys are merged next to `success`)
/// or to `null` (no payload).
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,
    pub data: T,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
            status_code: None,
        }
    }

    pub fn with_status(message: impl Into<String>, data: T, status_code: StatusCode) -> Self {
        Self {
            message: message.into(),
            data,
            status_code: Some(status_code),
        }
    }

    /// Create a 201 Created response
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::with_status(message, data, StatusCode::CREATED)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let payload = match serde_json::to_value(&self.data) {
            Ok(Value::Object(map)) => map,
            Ok(Value::Null) => Map::new(),
            Ok(other) => {
                tracing::error!("Response payload is not an object: {}", other);
                return internal_error();
            }
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return internal_error();
            }
        };

        let mut envelope = Map::with_capacity(payload.len() + 1);
        envelope.insert("success".to_string(), Value::String(self.message));
        envelope.extend(payload);

        (status, Json(Value::Object(envelope))).into_response()
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Failed to serialize response data" })),
    )
        .into_response()
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn payload_keys_sit_next_to_success() {
        let response = ApiResponse::created("Category created", json!({ "category": { "id": 1 } }))
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            json!({ "success": "Category created", "category": { "id": 1 } })
        );
    }

    #[tokio::test]
    async fn unit_payload_is_just_the_message() {
        let response = ApiResponse::success("ok", ()).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "success": "ok" }));
    }

    #[tokio::test]
    async fn non_object_payload_is_a_server_error() {
        let response = ApiResponse::success("list", vec![1, 2, 3]).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
