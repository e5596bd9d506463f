//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::Config;
use crate::error::TaskError;
use crate::service::{TaskService, TaskUpdate};
use crate::store;

use super::types::*;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub service: TaskService,
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let task_store = store::create_task_store(config.store_type, config.db_dir.clone())
        .await
        .map_err(|e| anyhow::anyhow!("failed to initialize task store: {}", e))?;
    tracing::info!(
        "Task store initialized: {} (persistent: {})",
        config.store_type.label(),
        task_store.is_persistent()
    );

    let service = TaskService::new(task_store, config.validate_updates);
    let state = Arc::new(AppState {
        config: config.clone(),
        service,
    });

    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the router. Separated from `serve` so tests can drive it directly.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tasks", post(create_task).get(list_tasks))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/:id/moveUp", put(move_up))
        .route("/tasks/:id/moveDown", put(move_down))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.config.store_type.label().to_string(),
    })
}

/// POST /tasks - Create a task.
async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<DataResponse<TaskResponse>>), TaskError> {
    let task = state
        .service
        .create(&req.name, req.cost, &req.due_date)
        .await?;
    tracing::debug!("Created task {} at order {}", task.id, task.order);
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: task.into(),
            message: "task created".to_string(),
        }),
    ))
}

/// GET /tasks - List all tasks ascending by display order.
async fn list_tasks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DataResponse<Vec<TaskResponse>>>, TaskError> {
    let tasks = state.service.list().await?;
    Ok(Json(DataResponse {
        data: tasks.into_iter().map(Into::into).collect(),
        message: "ok".to_string(),
    }))
}

/// GET /tasks/:id - Get a single task.
async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataResponse<TaskResponse>>, TaskError> {
    let task = state.service.get(id).await?;
    Ok(Json(DataResponse {
        data: task.into(),
        message: "ok".to_string(),
    }))
}

/// PUT /tasks/:id - Partial update.
async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<DataResponse<TaskResponse>>, TaskError> {
    let task = state
        .service
        .update(
            id,
            TaskUpdate {
                name: req.name,
                cost: req.cost,
                due_date: req.due_date,
            },
        )
        .await?;
    Ok(Json(DataResponse {
        data: task.into(),
        message: "task updated".to_string(),
    }))
}

/// DELETE /tasks/:id - Delete, returning the removed record.
async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataResponse<TaskResponse>>, TaskError> {
    let task = state.service.delete(id).await?;
    tracing::debug!("Deleted task {}, gap left at order {}", task.id, task.order);
    Ok(Json(DataResponse {
        data: task.into(),
        message: "task deleted".to_string(),
    }))
}

/// PUT /tasks/:id/moveUp - Swap with the task directly above.
async fn move_up(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, TaskError> {
    state.service.move_up(id).await?;
    Ok(Json(MessageResponse {
        message: "task moved up".to_string(),
    }))
}

/// PUT /tasks/:id/moveDown - Swap with the task directly below.
async fn move_down(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, TaskError> {
    state.service.move_down(id).await?;
    Ok(Json(MessageResponse {
        message: "task moved down".to_string(),
    }))
}
