use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;
use mnemo_service::{AnswerResponse, QuestionRequest, ServiceError};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/question", post(question))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn question(
	State(state): State<AppState>,
	Json(payload): Json<QuestionRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
	let response = state.service.answer_question(&payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let (status, error_code) = match &err {
			ServiceError::InvalidRequest { .. } =>
				(StatusCode::BAD_REQUEST, "invalid_request"),
			ServiceError::Provider { .. } | ServiceError::Index { .. } =>
				(StatusCode::BAD_GATEWAY, "upstream_unavailable"),
		};

		Self { status, error_code: error_code.to_string(), message: err.to_string() }
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
