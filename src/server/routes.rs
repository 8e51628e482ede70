use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::response::sse::{KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use tracing::debug;
use url::form_urlencoded;

use super::AppState;
use super::render::{failure_response, snapshot_response, stream_event};
use crate::query::{Category, DEFAULT_TARGET, QueryRequest, QueryRun, Results, Snapshot, Status};

/// Builds a request from the raw query string. `query_type` may repeat;
/// unknown values are dropped.
pub(super) fn parse_request(raw: Option<&str>) -> QueryRequest {
    let mut expression = String::new();
    let mut source = String::new();
    let mut target = None;
    let mut categories = Vec::new();

    for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
        match key.as_ref() {
            "expression" => expression = value.into_owned(),
            "source" => source = value.to_lowercase(),
            "target" => target = Some(value.to_lowercase()),
            "query_type" => match value.parse::<Category>() {
                Ok(category) => categories.push(category),
                Err(e) => debug!(%e, "ignoring query_type"),
            },
            _ => {}
        }
    }

    QueryRequest {
        expression,
        source,
        target: target.unwrap_or_else(|| DEFAULT_TARGET.to_string()),
        categories,
    }
}

/// `GET /api/v1/search`: runs every stage and returns the final snapshot.
pub(super) async fn search(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Response {
    let request = parse_request(query.as_deref());
    let mut run = match QueryRun::start(request, state.providers.clone()) {
        Ok(run) => run,
        Err(failure) => return failure_response(&failure, state.debug),
    };

    let mut last = Snapshot {
        header: run.header(),
        status: Status::Success,
        results: Results::default(),
    };
    while let Some(item) = run.advance().await {
        match item {
            Ok(snapshot) => last = snapshot,
            Err(failure) => return failure_response(&failure, state.debug),
        }
    }
    snapshot_response(last)
}

/// `GET /api/v1/search/stream`: one SSE event per completed stage.
pub(super) async fn search_stream(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Response {
    let request = parse_request(query.as_deref());
    let run = match QueryRun::start(request, state.providers.clone()) {
        Ok(run) => run,
        Err(failure) => return failure_response(&failure, state.debug),
    };

    let debug = state.debug;
    let events = run
        .into_stream()
        .map(move |item| stream_event(item, debug));
    Sse::new(events)
        .keep_alive(KeepAlive::default())
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let request = parse_request(None);
        assert_eq!(request.expression, "");
        assert_eq!(request.source, "");
        assert_eq!(request.target, "en");
        assert!(request.categories.is_empty());
    }

    #[test]
    fn parse_repeated_query_types_and_lowercases_languages() {
        let request = parse_request(Some(
            "expression=Bom+dia%21&source=PT&target=EN&query_type=images&query_type=translation&query_type=audio",
        ));
        assert_eq!(request.expression, "Bom dia!");
        assert_eq!(request.source, "pt");
        assert_eq!(request.target, "en");
        assert_eq!(
            request.categories,
            vec![Category::Images, Category::Translation]
        );
    }

    #[test]
    fn parse_keeps_explicit_empty_target() {
        let request = parse_request(Some("expression=x&target="));
        assert_eq!(request.target, "");
    }
}
