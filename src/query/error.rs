use super::category::Category;
use super::model::Header;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("'expression' can't be empty")]
    EmptyExpression,

    #[error("No query type specified")]
    NoQueryType,

    /// Structured failure reported by a provider, serialized verbatim.
    #[error("{0}")]
    Provider(String),

    #[error("{stage} stage failed")]
    Unexpected {
        stage: Category,
        #[source]
        source: BoxError,
    },
}

impl QueryError {
    pub fn unexpected(stage: Category, source: impl Into<BoxError>) -> Self {
        QueryError::Unexpected {
            stage,
            source: source.into(),
        }
    }
}

/// A run's terminal error together with the request state at the moment it failed.
#[derive(Debug, thiserror::Error)]
#[error("query for {:?} failed", .header.expression)]
pub struct Failure {
    pub header: Header,
    #[source]
    pub error: QueryError,
}

/// Renders an error and its `source()` chain on one line.
pub fn report(error: &dyn std::error::Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        // Variants built with `#[error("...: {0}")]` already embed their source.
        if !text.ends_with(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}
