//! Progressive query orchestration.
//!
//! A [`QueryRun`] executes the requested categories in [plan order](category::PLAN) and
//! yields a cumulative [`Snapshot`] after each stage. A stage failure ends the
//! run with a [`Failure`]; snapshots already yielded stand.

mod category;
mod error;
mod model;
mod run;
mod stages;

#[cfg(test)]
pub(crate) mod testing;

pub use category::Category;
pub use error::{Failure, QueryError, report};
pub use model::{Header, Results, Snapshot, Status};
pub use run::{DEFAULT_TARGET, QueryRequest, QueryRun};

use std::sync::Arc;

use crate::dictionary::Dictionary;
use crate::images::ImageSearch;
use crate::translate::Translator;

/// Shared provider handles. Cloning is cheap; every request gets its own copy.
#[derive(Clone)]
pub struct Providers {
    pub translator: Arc<dyn Translator>,
    pub images: Arc<dyn ImageSearch>,
    pub dictionary: Arc<dyn Dictionary>,
}
