use crate::calendar::{self, CalendarMonth, DayView, Heatmap};
use crate::date_key::DateKey;
use crate::errors::AppError;
use crate::identity::Identity;
use crate::models::{
    AggregateStats, ArchiveRequest, CreateTaskRequest, ImportResponse, MonthQuery, Task,
    TaskStats, TodayResponse, ToggleRequest, ToggleResponse,
};
use crate::state::AppState;
use crate::stats::{aggregate, compute_stats, dashboard};
use crate::transfer::{self, ExportBundle};
use crate::ui::render_index;
use axum::{
    Form, Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use chrono::{Datelike, Utc};
use tracing::info;

pub async fn index(State(state): State<AppState>, identity: Identity) -> Html<String> {
    let today = DateKey::today();
    let data = state.profile(&identity).await;
    let rows = dashboard(&data.tasks, &data.log, today);
    let totals = aggregate(&data.tasks, &data.log, today);
    let map = calendar::heatmap(&data.tasks, &data.log, today);
    Html(render_index(today, &rows, &totals, &map))
}

pub async fn get_today(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<TodayResponse>, AppError> {
    let today = DateKey::today();
    let data = state.profile(&identity).await;
    Ok(Json(TodayResponse {
        date: today,
        tasks: dashboard(&data.tasks, &data.log, today),
    }))
}

pub async fn list_tasks(State(state): State<AppState>, identity: Identity) -> Json<Vec<Task>> {
    let data = state.profile(&identity).await;
    Json(data.tasks.clone())
}

pub async fn create_task(
    State(state): State<AppState>,
    identity: Identity,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let task = add_task(&state, &identity, &payload.title).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn create_task_form(
    State(state): State<AppState>,
    identity: Identity,
    Form(payload): Form<CreateTaskRequest>,
) -> Result<Redirect, AppError> {
    add_task(&state, &identity, &payload.title).await?;
    Ok(Redirect::to("/"))
}

pub async fn delete_task(
    State(state): State<AppState>,
    identity: Identity,
    Path(task_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut data = state.profile(&identity).await;
    let mut next = data.clone();
    next.remove_task(&task_id)
        .ok_or_else(|| AppError::not_found(format!("no task with id {task_id}")))?;
    state.scoped_store(&identity).save_tasks(&next.tasks).await?;
    *data = next;
    info!(identity = %identity, task_id = %task_id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn archive_task(
    State(state): State<AppState>,
    identity: Identity,
    Path(task_id): Path<String>,
    Json(payload): Json<ArchiveRequest>,
) -> Result<Json<Task>, AppError> {
    let mut data = state.profile(&identity).await;
    let mut next = data.clone();
    let task = next
        .task_mut(&task_id)
        .ok_or_else(|| AppError::not_found(format!("no task with id {task_id}")))?;
    task.archived = payload.archived;
    let updated = task.clone();
    state.scoped_store(&identity).save_tasks(&next.tasks).await?;
    *data = next;
    info!(
        identity = %identity,
        task_id = %task_id,
        archived = updated.archived,
        "task archive flag set"
    );
    Ok(Json(updated))
}

pub async fn task_stats(
    State(state): State<AppState>,
    identity: Identity,
    Path(task_id): Path<String>,
) -> Result<Json<TaskStats>, AppError> {
    let data = state.profile(&identity).await;
    let task = data
        .task(&task_id)
        .ok_or_else(|| AppError::not_found(format!("no task with id {task_id}")))?;
    Ok(Json(compute_stats(task, &data.log, DateKey::today())))
}

pub async fn toggle(
    State(state): State<AppState>,
    identity: Identity,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, AppError> {
    let response = apply_toggle(&state, &identity, &payload.task_id, payload.date).await?;
    Ok(Json(response))
}

pub async fn toggle_form(
    State(state): State<AppState>,
    identity: Identity,
    Path(task_id): Path<String>,
) -> Result<Redirect, AppError> {
    apply_toggle(&state, &identity, &task_id, None).await?;
    Ok(Redirect::to("/"))
}

pub async fn get_month(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CalendarMonth>, AppError> {
    let today = DateKey::today();
    let year = query.year.unwrap_or_else(|| today.date().year());
    let month = query.month.unwrap_or_else(|| today.date().month());
    let data = state.profile(&identity).await;
    calendar::month_grid(year, month, &data.tasks, &data.log, today)
        .map(Json)
        .ok_or_else(|| AppError::bad_request(format!("invalid month {year}-{month}")))
}

pub async fn get_day(
    State(state): State<AppState>,
    identity: Identity,
    Path(date): Path<String>,
) -> Result<Json<DayView>, AppError> {
    let date: DateKey = date
        .parse()
        .map_err(|err: crate::date_key::DateKeyError| AppError::bad_request(err.to_string()))?;
    let data = state.profile(&identity).await;
    Ok(Json(calendar::day_view(date, &data.tasks, &data.log)))
}

pub async fn get_heatmap(State(state): State<AppState>, identity: Identity) -> Json<Heatmap> {
    let data = state.profile(&identity).await;
    Json(calendar::heatmap(&data.tasks, &data.log, DateKey::today()))
}

pub async fn get_stats(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<AggregateStats>, AppError> {
    let data = state.profile(&identity).await;
    Ok(Json(aggregate(&data.tasks, &data.log, DateKey::today())))
}

pub async fn export_data(State(state): State<AppState>, identity: Identity) -> Json<ExportBundle> {
    let data = state.profile(&identity).await;
    Json(transfer::export(&identity, &data, Utc::now().timestamp_millis()))
}

pub async fn import_data(
    State(state): State<AppState>,
    identity: Identity,
    body: Bytes,
) -> Result<Json<ImportResponse>, AppError> {
    let imported = transfer::parse_import(&body)?;
    let mut data = state.profile(&identity).await;
    state.scoped_store(&identity).save_all(&imported).await?;
    *data = imported;
    info!(
        identity = %identity,
        tasks = data.tasks.len(),
        logged_days = data.log.len(),
        "import replaced profile"
    );

    Ok(Json(ImportResponse {
        imported: true,
        tasks: data.tasks.len(),
        logged_days: data.log.len(),
    }))
}

async fn add_task(state: &AppState, identity: &Identity, title: &str) -> Result<Task, AppError> {
    let task = Task::create(title, Utc::now().timestamp_millis())
        .ok_or_else(|| AppError::bad_request("title must not be empty"))?;
    let mut data = state.profile(identity).await;
    let mut tasks = data.tasks.clone();
    tasks.push(task.clone());
    state.scoped_store(identity).save_tasks(&tasks).await?;
    data.tasks = tasks;
    info!(identity = %identity, task_id = %task.id, "task created");
    Ok(task)
}

async fn apply_toggle(
    state: &AppState,
    identity: &Identity,
    task_id: &str,
    date: Option<DateKey>,
) -> Result<ToggleResponse, AppError> {
    let today = DateKey::today();
    let date = date.unwrap_or(today);
    if date > today {
        return Err(AppError::bad_request("cannot complete a task on a future date"));
    }

    let mut data = state.profile(identity).await;
    let task = data
        .task(task_id)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("no task with id {task_id}")))?;
    let mut log = data.log.clone();
    let done = log.toggle(date, task_id);
    state.scoped_store(identity).save_log(&log).await?;
    data.log = log;

    Ok(ToggleResponse {
        date,
        task_id: task.id.clone(),
        done,
        stats: compute_stats(&task, &data.log, today),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrackerData;
    use crate::storage::Store;
    use std::path::PathBuf;

    /// State whose data root is a plain file, so every save fails.
    fn unwritable_state(label: &str) -> (AppState, PathBuf) {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let root = std::env::temp_dir().join(format!(
            "relentless_blocked_{label}_{}_{nanos}",
            std::process::id()
        ));
        std::fs::write(&root, b"not a directory").unwrap();
        let state = AppState::new(Store::new(&root), "local".parse().unwrap());
        (state, root)
    }

    async fn seed(state: &AppState, identity: &Identity) -> TrackerData {
        let task = Task::create("Meditate", 0).unwrap();
        let mut data = state.profile(identity).await;
        data.log.toggle(DateKey::today().pred(), &task.id);
        data.tasks.push(task);
        data.clone()
    }

    #[tokio::test]
    async fn failed_save_leaves_roster_untouched() {
        let (state, root) = unwritable_state("roster");
        let identity: Identity = "blocked".parse().unwrap();
        let before = seed(&state, &identity).await;
        let task_id = before.tasks[0].id.clone();

        let created = create_task(
            State(state.clone()),
            identity.clone(),
            Json(CreateTaskRequest {
                title: "Journal".to_string(),
            }),
        )
        .await;
        assert_eq!(created.unwrap_err().status, StatusCode::INTERNAL_SERVER_ERROR);

        let deleted =
            delete_task(State(state.clone()), identity.clone(), Path(task_id.clone())).await;
        assert!(deleted.is_err());

        let archived = archive_task(
            State(state.clone()),
            identity.clone(),
            Path(task_id),
            Json(ArchiveRequest { archived: true }),
        )
        .await;
        assert!(archived.is_err());

        assert_eq!(*state.profile(&identity).await, before);
        let _ = std::fs::remove_file(root);
    }

    #[tokio::test]
    async fn failed_save_leaves_log_untouched() {
        let (state, root) = unwritable_state("log");
        let identity: Identity = "blocked".parse().unwrap();
        let before = seed(&state, &identity).await;
        let task_id = before.tasks[0].id.clone();

        for date in [None, Some(DateKey::today().pred())] {
            let toggled = toggle(
                State(state.clone()),
                identity.clone(),
                Json(ToggleRequest {
                    task_id: task_id.clone(),
                    date,
                }),
            )
            .await;
            assert!(toggled.is_err());
        }

        assert_eq!(*state.profile(&identity).await, before);
        let _ = std::fs::remove_file(root);
    }

    #[tokio::test]
    async fn future_dates_are_rejected_before_any_change() {
        let (state, root) = unwritable_state("future");
        let identity: Identity = "blocked".parse().unwrap();
        let before = seed(&state, &identity).await;

        let err = apply_toggle(
            &state,
            &identity,
            &before.tasks[0].id,
            Some(DateKey::today().plus_days(1)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(*state.profile(&identity).await, before);
        let _ = std::fs::remove_file(root);
    }
}
