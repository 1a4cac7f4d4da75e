//! Concrete list screens built on [`crate::list::ListController`].

pub mod agents;
pub mod catalog_lists;
pub mod popular;
pub mod tools;

use tokio::task::JoinHandle;

use crate::error::{AppError, AppResult};
use crate::list::FetchOutcome;

pub use agents::{AgentsScreen, AgentsSource};
pub use catalog_lists::{AiModelsSource, KnowledgeBasesSource};
pub use popular::{PopularScreen, PopularSource};
pub use tools::{ToolsScreen, ToolsSource};

/// Wait for a spawned fetch to settle.
pub async fn settle(handle: JoinHandle<FetchOutcome>) -> AppResult<FetchOutcome> {
    handle
        .await
        .map_err(|e| AppError::Internal(format!("Fetch task failed: {e}")))
}

/// Empty or whitespace-only input means "no search".
pub(crate) fn search_term(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
