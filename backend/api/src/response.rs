/// Uniform API response envelope
///
/// Every successful response is `{statusCode, data, message, success}`;
/// the matching error shape lives in [`crate::error`].
use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
            message: message.into(),
            success: status.is_success(),
        }
    }

    /// 200 envelope
    pub fn ok(data: T, message: impl Into<String>) -> HttpResponse {
        HttpResponse::Ok().json(Self::new(StatusCode::OK, data, message))
    }

    /// 201 envelope
    pub fn created(data: T, message: impl Into<String>) -> HttpResponse {
        HttpResponse::Created().json(Self::new(StatusCode::CREATED, data, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_camel_case() {
        let envelope = ApiResponse::new(StatusCode::OK, serde_json::json!({"id": 1}), "fetched");
        let value = serde_json::to_value(&envelope).expect("serialize");

        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["message"], "fetched");
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["id"], 1);
    }

    #[test]
    fn created_envelope_reports_201() {
        let envelope = ApiResponse::new(StatusCode::CREATED, (), "created");
        let value = serde_json::to_value(&envelope).expect("serialize");

        assert_eq!(value["statusCode"], 201);
        assert_eq!(value["success"], true);
    }
}
