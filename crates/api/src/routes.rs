//! Route table for the `/api` surface

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{self, auth, goals, habits, notes};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/ping", get(handlers::ping))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Goals
        .route("/goals", get(goals::list).post(goals::create))
        .route("/goals/archived", get(goals::list_archived))
        .route(
            "/goals/:id",
            get(goals::get).put(goals::update).delete(goals::archive),
        )
        // Habits
        .route("/habits", get(habits::list).post(habits::create))
        .route("/habits/archived", get(habits::list_archived))
        .route(
            "/habits/:id",
            get(habits::get).put(habits::update).delete(habits::archive),
        )
        .route("/habits/:id/toggle", post(habits::toggle))
        .route("/habits/:id/completions", get(habits::completions))
        // Notes
        .route("/notes", get(notes::list).post(notes::create))
        .route("/notes/archived", get(notes::list_archived))
        .route(
            "/notes/:id",
            get(notes::get).put(notes::update).delete(notes::archive),
        );

    Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
