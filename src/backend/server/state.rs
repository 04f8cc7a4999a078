/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct holds:
 * - The store behind the collaborator traits (`Arc<dyn Store>`)
 * - The validated application configuration
 *
 * There is no in-process snippet cache; every request reads through the
 * store.
 *
 * # Example
 *
 * ```rust
 * use codenest::backend::server::state::AppState;
 * use codenest::backend::store::SnippetStore;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let limit = state.config.latest_limit;
 *     let _latest = state.store.latest_snippets(limit).await;
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::store::{MemoryStore, Store};
use crate::shared::config::AppConfig;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Persistence for users, snippets, tags, groups and messages
    pub store: Arc<dyn Store>,

    /// Validated configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// State over a fresh in-memory store
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(Arc::new(MemoryStore::new()), config)
    }
}

/// Implement FromRef for the store
///
/// This allows handlers to extract `State<Arc<dyn Store>>` directly.
impl FromRef<AppState> for Arc<dyn Store> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

/// Implement FromRef for the configuration
impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
