//! HTTP-facing errors.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Json, Response},
};
use scout_discovery::DiscoveryError;
use scout_types::ErrorResponse;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ApiError {
	#[error("{0}")]
	InvalidRequest(String),

	#[error("{0}")]
	Upstream(#[source] DiscoveryError),

	#[error("Discovery did not complete within {0:?}")]
	Timeout(Duration),

	#[error("Service is shutting down")]
	ShuttingDown,
}

impl ApiError {
	pub fn status_code(&self) -> StatusCode {
		match self {
			ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
			ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
			ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
			ApiError::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
		}
	}
}

impl From<DiscoveryError> for ApiError {
	fn from(err: DiscoveryError) -> Self {
		match err {
			DiscoveryError::Cancelled => ApiError::ShuttingDown,
			other => ApiError::Upstream(other),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status_code();
		if status.is_server_error() {
			error!(status = status.as_u16(), "Request failed: {}", self);
		} else {
			warn!(status = status.as_u16(), "Rejected request: {}", self);
		}

		let body = ErrorResponse {
			message: self.to_string(),
		};
		(status, Json(body)).into_response()
	}
}
