use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::server::model::api::ErrorDto;

/// Errors produced by the verification correlator.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// No pending attempt matched the external signal.
    ///
    /// Also covers attempts whose expiry deadline has passed; expired attempts
    /// are indistinguishable from absent ones at confirmation time. Results in
    /// 404 Not Found.
    #[error("No matching verification found")]
    NotFound,

    /// A description check was requested but the actor has no pending
    /// description attempt.
    ///
    /// Results in 404 Not Found.
    #[error("No pending description verification for this user")]
    NoPendingAttempt,

    /// The challenge phrase was not found in the supplied profile text.
    ///
    /// The pending attempt is left untouched so the user can fix their
    /// profile and retry. Results in 400 Bad Request.
    #[error("Challenge phrase not found in profile description")]
    PhraseMismatch,
}

impl IntoResponse for VerifyError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::NotFound | Self::NoPendingAttempt => StatusCode::NOT_FOUND,
            Self::PhraseMismatch => StatusCode::BAD_REQUEST,
        };

        (
            status,
            Json(ErrorDto {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
