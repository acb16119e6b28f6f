use log::{debug, error};
use pinnotes::content_store::ContentStoreError;
use pinnotes::note_repository::NoteRepositoryError;
use rocket::http::Status;
use rocket::response::{self, Responder, Response};
use rocket::serde::json::Json;
use rocket::Request;
use thiserror::Error;
use crate::routes::api::model::ErrorBody;

#[derive(Debug, Error)]
pub enum RequestBodyError {
    #[error("request body must be json")]
    NotJson,

    #[error("request body is too large")]
    TooLarge,

    #[error("malformed note request: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Repository(#[from] NoteRepositoryError),

    #[error(transparent)]
    RequestBody(#[from] RequestBodyError),

    #[error("missing query parameter {0}")]
    MissingParameter(&'static str),
}

impl ApiError {
    /// Status, error code and a message safe to show to the caller.
    fn describe(&self) -> (Status, &'static str, String) {
        use ContentStoreError as S;
        use NoteRepositoryError as R;
        match self {
            ApiError::MissingParameter(name) => (
                Status::BadRequest,
                "invalid_input",
                format!("missing query parameter {name}"),
            ),
            ApiError::RequestBody(RequestBodyError::TooLarge) => (
                Status::PayloadTooLarge,
                "invalid_input",
                "request body is too large".into(),
            ),
            ApiError::RequestBody(RequestBodyError::NotJson) => (
                Status::BadRequest,
                "invalid_input",
                "request body must be json".into(),
            ),
            ApiError::RequestBody(_) => (
                Status::BadRequest,
                "invalid_input",
                "request body is not a note submission".into(),
            ),
            ApiError::Repository(R::InvalidInput(message)) => (
                Status::BadRequest,
                "invalid_input",
                (*message).into(),
            ),
            ApiError::Repository(R::Store(S::Unavailable(_) | S::Unexpected(_))) => (
                Status::BadGateway,
                "store_unavailable",
                "content store is unavailable".into(),
            ),
            ApiError::Repository(R::Store(S::WriteFailed(_))) => (
                Status::InternalServerError,
                "store_write_failed",
                "failed to store the note".into(),
            ),
            ApiError::Repository(R::Store(S::PinFailed(_))) => (
                Status::InternalServerError,
                "pin_failed",
                "failed to pin the note".into(),
            ),
            ApiError::Repository(_) => (
                Status::InternalServerError,
                "internal",
                "internal error".into(),
            ),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let (status, code, message) = self.describe();
        if status.class().is_server_error() {
            error!("{} {} failed: {self}", request.method(), request.uri());
        } else {
            debug!("{} {} rejected: {self}", request.method(), request.uri());
        }
        Response::build_from(Json(ErrorBody { error: code, message }).respond_to(request)?)
            .status(status)
            .ok()
    }
}
