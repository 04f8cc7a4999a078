/**
 * API Routes
 *
 * # Routes
 *
 * ## Accounts
 * - `POST /api/register` - create an account and start a session
 * - `POST /api/login` - start a session
 * - `POST /api/logout` - end the session
 * - `GET  /api/auth/me` - current user
 * - `PUT  /api/user/profile` - update username, email and links
 *
 * ## Snippets
 * - `GET    /api/user/snippets` - caller's snippets
 * - `POST   /api/code/new` - create
 * - `GET    /api/code/latest` - newest snippets
 * - `GET    /api/code/{token}` - view (counts unless `skipIncrement=true`)
 * - `DELETE /api/code/{token}` - soft delete
 * - `GET    /api/code/{token}/stats` - owner statistics
 *
 * ## Groups
 * - `POST /api/groups`, `GET /api/groups/my`
 * - `GET|POST /api/groups/{id}/members`, `DELETE /api/groups/{id}/members/{userId}`
 * - `GET|POST /api/groups/{id}/snippets`
 *
 * ## Messages
 * - `POST /api/messages`
 * - `GET  /api/messages/inbox`, `GET /api/messages/sent`
 * - `GET  /api/messages/conversation/{otherUserId}`
 *
 * Authentication is checked by the `CurrentUser` / `MaybeUser` extractors in
 * each handler.
 */

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::backend::auth::{get_me, login, logout, register, update_profile};
use crate::backend::groups::handlers as groups;
use crate::backend::messaging::handlers as messages;
use crate::backend::server::state::AppState;
use crate::backend::snippets::handlers as snippets;

/// Add every API route to `router`
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Accounts
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/auth/me", get(get_me))
        .route("/api/user/profile", put(update_profile))
        .route("/api/user/snippets", get(snippets::my_snippets))
        // Snippets; the static segments are matched before `{token}`
        .route("/api/code/new", post(snippets::create))
        .route("/api/code/latest", get(snippets::latest))
        .route(
            "/api/code/{token}",
            get(snippets::view).delete(snippets::delete),
        )
        .route("/api/code/{token}/stats", get(snippets::stats))
        // Groups
        .route("/api/groups", post(groups::create))
        .route("/api/groups/my", get(groups::mine))
        .route(
            "/api/groups/{id}/members",
            get(groups::members).post(groups::add),
        )
        .route("/api/groups/{id}/members/{user_id}", delete(groups::remove))
        .route(
            "/api/groups/{id}/snippets",
            get(groups::snippets).post(groups::share),
        )
        // Messages
        .route("/api/messages", post(messages::send))
        .route("/api/messages/inbox", get(messages::inbox))
        .route("/api/messages/sent", get(messages::sent))
        .route(
            "/api/messages/conversation/{other_user_id}",
            get(messages::conversation),
        )
}
