//! Wire envelopes for snapshots and failures.

use axum::Json;
use axum::http::StatusCode;
use axum::response::sse::Event;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use crate::query::{Failure, Header, QueryError, Snapshot, Status, report};

pub const GENERIC_ERROR: &str = "Sorry! An error has occurred.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    #[serde(flatten)]
    pub header: Header,
    pub status: Status,
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(failure: &Failure, debug: bool) -> Self {
        Self {
            header: failure.header.clone(),
            status: Status::Error,
            error: envelope_message(failure, debug),
        }
    }
}

fn envelope_message(failure: &Failure, debug: bool) -> String {
    match &failure.error {
        QueryError::Unexpected { .. } if debug => report(failure),
        QueryError::Unexpected { .. } => GENERIC_ERROR.to_string(),
        other => other.to_string(),
    }
}

fn log_unexpected(failure: &Failure) {
    if let QueryError::Unexpected { stage, .. } = &failure.error {
        error!(%stage, error = %report(failure), "query:unexpected_failure");
    }
}

/// Response for a run that ended in `failure`.
///
/// With `debug` set, unexpected failures become a plain-text 500 carrying the
/// full error chain; everything else is a 400 envelope.
pub fn failure_response(failure: &Failure, debug: bool) -> Response {
    log_unexpected(failure);
    if debug && matches!(failure.error, QueryError::Unexpected { .. }) {
        return (StatusCode::INTERNAL_SERVER_ERROR, report(failure)).into_response();
    }
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorEnvelope::new(failure, debug)),
    )
        .into_response()
}

pub fn snapshot_response(snapshot: Snapshot) -> Response {
    Json(snapshot).into_response()
}

/// One SSE event per stream item: `snapshot` on progress, `error` on failure.
pub fn stream_event(item: Result<Snapshot, Failure>, debug: bool) -> Result<Event, axum::Error> {
    match item {
        Ok(snapshot) => Event::default().event("snapshot").json_data(&snapshot),
        Err(failure) => {
            log_unexpected(&failure);
            Event::default()
                .event("error")
                .json_data(ErrorEnvelope::new(&failure, debug))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Category;
    use crate::translate::TranslateError;
    use serde_json::json;

    fn header() -> Header {
        Header {
            expression: "bom dia".into(),
            source: "pt".into(),
            target: "en".into(),
        }
    }

    fn unexpected() -> Failure {
        Failure {
            header: header(),
            error: QueryError::unexpected(
                Category::Images,
                TranslateError::UnexpectedResponse("missing d".into()),
            ),
        }
    }

    #[test]
    fn provider_payload_is_verbatim() {
        let failure = Failure {
            header: header(),
            error: QueryError::Provider(r#"{"code":403}"#.into()),
        };
        assert_eq!(
            serde_json::to_value(ErrorEnvelope::new(&failure, false)).unwrap(),
            json!({
                "expression": "bom dia",
                "source": "pt",
                "target": "en",
                "status": "error",
                "error": "{\"code\":403}"
            })
        );
    }

    #[test]
    fn unexpected_is_generic_without_debug() {
        let envelope = ErrorEnvelope::new(&unexpected(), false);
        assert_eq!(envelope.error, GENERIC_ERROR);
    }

    #[test]
    fn unexpected_carries_chain_with_debug() {
        let envelope = ErrorEnvelope::new(&unexpected(), true);
        assert!(envelope.error.contains("images stage failed"));
        assert!(envelope.error.contains("missing d"));
    }

    #[test]
    fn debug_unexpected_response_is_500() {
        let response = failure_response(&unexpected(), true);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn input_error_response_is_400() {
        let failure = Failure {
            header: header(),
            error: QueryError::NoQueryType,
        };
        assert_eq!(
            failure_response(&failure, true).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
