use std::collections::VecDeque;

use futures::Stream;
use tracing::{info, warn};

use super::Providers;
use super::category::{Category, schedule};
use super::error::{Failure, QueryError, report};
use super::model::{Header, Results, Snapshot, Status};
use super::stages::run_stage;
use crate::tokenize::tokenize;

pub const DEFAULT_TARGET: &str = "en";

#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub expression: String,
    pub source: String,
    pub target: String,
    pub categories: Vec<Category>,
}

/// Request-scoped state threaded through the stages of one run.
#[derive(Debug)]
pub struct QueryState {
    pub(super) expression: String,
    pub(super) source: String,
    pub(super) target: String,
    pub(super) words: Vec<String>,
    pub(super) results: Results,
    pub(super) translation_resolved: bool,
}

impl QueryState {
    fn new(request: QueryRequest) -> Self {
        let words = tokenize(&request.expression);
        Self {
            expression: request.expression,
            source: request.source,
            target: request.target,
            words,
            results: Results::default(),
            translation_resolved: false,
        }
    }

    /// Never replaces a known source with an empty one.
    pub(super) fn set_source(&mut self, language: String) {
        if !language.is_empty() {
            self.source = language;
        }
    }

    fn header(&self) -> Header {
        Header {
            expression: self.expression.clone(),
            source: self.source.clone(),
            target: self.target.clone(),
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            header: self.header(),
            status: Status::Success,
            results: self.results.clone(),
        }
    }
}

/// One validated query. Each call to [`QueryRun::advance`] runs the next
/// stage and returns the cumulative snapshot.
pub struct QueryRun {
    state: QueryState,
    providers: Providers,
    pending: VecDeque<Category>,
}

impl QueryRun {
    pub fn start(request: QueryRequest, providers: Providers) -> Result<Self, Failure> {
        let requested = schedule(&request.categories);
        let state = QueryState::new(request);

        let invalid = if state.words.is_empty() {
            Some(QueryError::EmptyExpression)
        } else if requested.is_empty() {
            Some(QueryError::NoQueryType)
        } else {
            None
        };
        if let Some(error) = invalid {
            info!(expression = %state.expression, %error, "query:rejected");
            return Err(Failure {
                header: state.header(),
                error,
            });
        }

        info!(
            expression = %state.expression,
            source = %state.source,
            target = %state.target,
            categories = ?requested,
            "query:start"
        );
        Ok(Self {
            state,
            providers,
            pending: requested.into(),
        })
    }

    pub fn header(&self) -> Header {
        self.state.header()
    }

    /// Runs the next pending stage. `None` once every stage has run or a stage failed.
    pub async fn advance(&mut self) -> Option<Result<Snapshot, Failure>> {
        let category = self.pending.pop_front()?;

        match run_stage(category, &mut self.state, &self.providers).await {
            Ok(result) => {
                self.state.results.insert(category, result);
                if self.pending.is_empty() {
                    info!(
                        expression = %self.state.expression,
                        source = %self.state.source,
                        categories = ?self.state.results.categories().collect::<Vec<_>>(),
                        "query:done"
                    );
                }
                Some(Ok(self.state.snapshot()))
            }
            Err(error) => {
                self.pending.clear();
                warn!(stage = %category, error = %report(&error), "query:failed");
                Some(Err(Failure {
                    header: self.state.header(),
                    error,
                }))
            }
        }
    }

    /// Lazily yields one item per stage. Dropping the stream abandons the remaining stages.
    pub fn into_stream(self) -> impl Stream<Item = Result<Snapshot, Failure>> + Send {
        futures::stream::unfold(self, |mut run| async move {
            let item = run.advance().await?;
            Some((item, run))
        })
    }
}
