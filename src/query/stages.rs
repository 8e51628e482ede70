use tracing::{debug, info};

use super::Providers;
use super::category::Category;
use super::error::QueryError;
use super::model::{CategoryResult, ImageHit, WordDefinition};
use super::run::QueryState;
use crate::dictionary::{DictionaryError, DictionaryOutcome};
use crate::images::{ImageSearchError, MediaKind, SearchOptions};
use crate::translate::TranslationOutcome;

const IMAGE_OPTIONS: SearchOptions = SearchOptions {
    format: "json",
    top: 10,
    skip: 0,
};

pub(super) async fn run_stage(
    category: Category,
    state: &mut QueryState,
    providers: &Providers,
) -> Result<CategoryResult, QueryError> {
    match category {
        Category::Translation => stage_translation(state, providers)
            .await
            .map(CategoryResult::Translation),
        Category::Images => stage_images(state, providers)
            .await
            .map(CategoryResult::Images),
        Category::Definitions => stage_definitions(state, providers)
            .await
            .map(CategoryResult::Definitions),
    }
}

/// Translates the expression, recording the detected source language.
/// An unsupported pair falls back to detection and echoes the expression.
pub(super) async fn stage_translation(
    state: &mut QueryState,
    providers: &Providers,
) -> Result<String, QueryError> {
    let outcome = providers
        .translator
        .translate(&state.expression, &state.source, &state.target)
        .await;
    state.translation_resolved = true;

    match outcome.map_err(|e| QueryError::unexpected(Category::Translation, e))? {
        TranslationOutcome::Translated {
            text,
            detected_source,
        } => {
            if state.source.is_empty()
                && let Some(detected) = detected_source
            {
                state.set_source(detected);
            }
            Ok(text)
        }
        TranslationOutcome::UnsupportedPair => {
            let detected = providers
                .translator
                .detect(&state.expression)
                .await
                .map_err(|e| QueryError::unexpected(Category::Translation, e))?;
            info!(source = %detected, target = %state.target, "translation:unsupported_pair");
            state.set_source(detected);
            Ok(state.expression.clone())
        }
        TranslationOutcome::ProviderError { message } => Err(QueryError::Provider(message)),
    }
}

pub(super) async fn stage_images(
    state: &QueryState,
    providers: &Providers,
) -> Result<Vec<ImageHit>, QueryError> {
    let query = state
        .words
        .iter()
        .map(|word| format!("+{word}"))
        .collect::<Vec<_>>()
        .join(" ");

    let hits = providers
        .images
        .search(MediaKind::Image, &query, &IMAGE_OPTIONS)
        .await
        .map_err(|e| match e {
            ImageSearchError::Api { payload, .. } => QueryError::Provider(payload),
            other => QueryError::unexpected(Category::Images, other),
        })?;

    debug!(%query, hits = hits.len(), "images:done");
    Ok(hits.into_iter().map(ImageHit::from).collect())
}

pub(super) async fn stage_definitions(
    state: &mut QueryState,
    providers: &Providers,
) -> Result<Option<Vec<WordDefinition>>, QueryError> {
    if state.source.is_empty() && !state.translation_resolved {
        debug!("definitions: resolving source language via translation");
        stage_translation(state, providers).await?;
    }

    if state.source.is_empty() {
        info!(expression = %state.expression, "definitions: source language unknown");
        return Ok(None);
    }

    let unexpected = |e: DictionaryError| QueryError::unexpected(Category::Definitions, e);
    let Some(dictionary) = providers
        .dictionary
        .open(&state.source)
        .await
        .map_err(unexpected)?
    else {
        info!(source = %state.source, "definitions: no dictionary for language");
        return Ok(None);
    };

    let mut definitions = Vec::with_capacity(state.words.len());
    for word in &state.words {
        let sentences = match dictionary.lookup(word).await.map_err(unexpected)? {
            DictionaryOutcome::Found { sentences } => Some(sentences),
            DictionaryOutcome::NotFound => None,
        };
        definitions.push(WordDefinition {
            word: word.clone(),
            sentences,
        });
    }
    Ok(Some(definitions))
}
