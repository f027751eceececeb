use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/tasks", post(handlers::create_task_form))
        .route("/tasks/:id/toggle", post(handlers::toggle_form))
        .route("/api/today", get(handlers::get_today))
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route("/api/tasks/:id", axum::routing::delete(handlers::delete_task))
        .route("/api/tasks/:id/archive", post(handlers::archive_task))
        .route("/api/tasks/:id/stats", get(handlers::task_stats))
        .route("/api/toggle", post(handlers::toggle))
        .route("/api/calendar", get(handlers::get_month))
        .route("/api/calendar/:date", get(handlers::get_day))
        .route("/api/heatmap", get(handlers::get_heatmap))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/export", get(handlers::export_data))
        .route("/api/import", post(handlers::import_data))
        .with_state(state)
}
