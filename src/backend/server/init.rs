/**
 * Server Initialization
 *
 * Assembles the application: open the store, build the state, configure the
 * router.
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_store;
use crate::backend::server::state::AppState;
use crate::backend::store::StoreError;
use crate::shared::config::AppConfig;

/// Create the application for `config`
///
/// # Errors
///
/// Fails if the configured database cannot be opened.
pub async fn create_app(config: AppConfig) -> Result<Router<()>, StoreError> {
    tracing::info!("Initializing codenest backend server");

    let store = load_store(&config).await?;
    let app_state = AppState::new(store, config);

    Ok(build_app(app_state))
}

/// Router over an already-built state
///
/// Tests use this with `AppState::in_memory`.
pub fn build_app(app_state: AppState) -> Router<()> {
    let app = create_router(app_state);
    tracing::info!("Router configured");
    app
}
