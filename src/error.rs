use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::{Display, Error, From};
use serde_json::json;

use crate::utils::date_format::GermanDate;

/// Every way a leave operation can fail.
///
/// Validation and lookup failures are answered with 400; a malformed data file
/// or a failed read/write is a 500 for that call only.
#[derive(Debug, Display, Error, From)]
pub enum LeaveError {
    #[display(fmt = "Alle Felder sind Pflicht!")]
    MissingFields,
    #[display(fmt = "Dienstnummer fehlt")]
    MissingEmployeeId,
    #[display(fmt = "Ungültiges Datum")]
    InvalidDate,
    #[display(fmt = "Enddatum darf nicht vor Startdatum liegen")]
    InvertedRange,
    #[display(fmt = "Mindestdauer {} Tage", _0)]
    BelowMinimumDuration(#[error(not(source))] u32),
    #[display(fmt = "Maximaldauer {} Tage", _0)]
    AboveMaximumDuration(#[error(not(source))] u32),
    #[display(fmt = "Ein aktiver Urlaub besteht noch bis zum {}", _0)]
    ActiveRequestExists(#[error(not(source))] GermanDate),
    #[display(fmt = "Dienstnummer ist gesperrt")]
    EmployeeBlocked,
    #[display(fmt = "Urlaub nicht gefunden")]
    NotFound,
    #[display(fmt = "Datenbestand ist beschädigt: {}", _0)]
    CorruptState(#[error(source)] serde_json::Error),
    #[display(fmt = "Speicherzugriff fehlgeschlagen: {}", _0)]
    #[from]
    Io(#[error(source)] std::io::Error),
}

impl LeaveError {
    /// Failures of the data file rather than of the caller's input.
    pub fn is_internal(&self) -> bool {
        matches!(self, LeaveError::CorruptState(_) | LeaveError::Io(_))
    }
}

impl ResponseError for LeaveError {
    fn status_code(&self) -> StatusCode {
        if self.is_internal() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::BAD_REQUEST
        }
    }

    fn error_response(&self) -> HttpResponse {
        // file paths and parser positions stay in the log
        let message = if self.is_internal() {
            "Interner Serverfehler".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use chrono::NaiveDate;
    use serde_json::Value;

    #[test]
    fn active_request_message_uses_german_date() {
        let end = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let err = LeaveError::ActiveRequestExists(GermanDate(end));
        assert_eq!(
            err.to_string(),
            "Ein aktiver Urlaub besteht noch bis zum 05.01.2024"
        );
    }

    #[actix_web::test]
    async fn validation_error_is_bad_request_with_message() {
        let response = LeaveError::BelowMinimumDuration(20).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body()).await.unwrap();
        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload["error"], "Mindestdauer 20 Tage");
    }

    #[test]
    fn io_errors_convert_and_keep_their_source() {
        let err: LeaveError = std::io::Error::other("disk gone").into();
        assert!(err.is_internal());
        assert!(std::error::Error::source(&err).is_some());
        assert!(std::error::Error::source(&LeaveError::BelowMinimumDuration(4)).is_none());
        assert_eq!(LeaveError::MissingEmployeeId.to_string(), "Dienstnummer fehlt");
    }

    #[actix_web::test]
    async fn corrupt_state_is_redacted() {
        let parse_err = serde_json::from_str::<Value>("{not json").unwrap_err();
        let err = LeaveError::CorruptState(parse_err);
        assert!(std::error::Error::source(&err).is_some());

        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body()).await.unwrap();
        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload["error"], "Interner Serverfehler");
    }
}
