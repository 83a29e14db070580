// HTTP response utilities for file downloads and errors
use crate::domain::error::FleetError;
use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

/// Build a download response with Content-Disposition set to `filename`
pub fn attachment_response(
    body: Vec<u8>,
    content_type: &'static str,
    filename: &str,
) -> Result<Response<Body>, StatusCode> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|e| {
            tracing::error!("Invalid attachment filename {}: {}", filename, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

pub fn status_for(err: &FleetError) -> StatusCode {
    match err {
        FleetError::InvalidMonth(_) | FleetError::InvalidYear(_) | FleetError::DayOutOfRange { .. } => {
            StatusCode::BAD_REQUEST
        }
        FleetError::UnknownEquipment(_) => StatusCode::NOT_FOUND,
        FleetError::NoEditSession => StatusCode::CONFLICT,
        FleetError::EmptySeries => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for FleetError {
    fn into_response(self) -> axum::response::Response {
        let status = status_for(&self);
        if status.is_server_error() {
            tracing::error!("Fleet error: {}", self);
        }
        error_response(status, self.to_string())
    }
}
