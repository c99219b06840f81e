//! HTTP surface: course listing, file serving and rendered pages.

use crate::page::{not_found_html, page_html};
use crate::service::CourseService;
use axum::Router;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use coursevault_core::{Course, Error};
use serde_json::json;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tower_http::trace::TraceLayer;

type SharedService = Arc<CourseService>;

/// Router over a shared service.
///
/// `/api/...` is matched before the page routes, so a course whose slug is
/// `api` is not reachable as a page.
pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/api/courses", get(list_courses))
        .route("/api/files/:course/*file", get(serve_file))
        .route("/:course", get(course_page))
        .route("/:course/*topic", get(topic_page))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(service: SharedService) -> anyhow::Result<()> {
    let addr = service.config().bind.clone();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Serving courses from {} on http://{}", service.config().courses_root.display(), addr);

    axum::serve(listener, router(service).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Error response; not-found conditions map to 404, everything else to 500.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Internal(String),
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        if err.is_not_found() {
            Self::NotFound(err.to_string())
        } else {
            tracing::error!("Request failed: {}", err);
            Self::Internal(err.to_string())
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::NotFound(msg) | Self::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Same errors, rendered as an HTML page for browser routes.
pub struct PageError(AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (self.0.status(), Html(not_found_html(self.0.message()))).into_response()
    }
}

/// Run blocking pipeline work off the async workers.
async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> coursevault_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("Worker task failed: {}", e)))?
        .map_err(AppError::from)
}

async fn list_courses(State(service): State<SharedService>) -> Result<Json<Vec<Course>>, AppError> {
    let courses = run_blocking(move || service.courses_structure()).await?;
    Ok(Json(courses))
}

async fn serve_file(
    State(service): State<SharedService>,
    Path((course, file)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let located = run_blocking(move || service.locate_file(&course, &file)).await?;
    let handle = tokio::fs::File::open(&located.path)
        .await
        .map_err(|e| AppError::from(Error::io(e)))?;

    let body = Body::from_stream(ReaderStream::new(handle));
    Ok(([(header::CONTENT_TYPE, located.content_type)], body).into_response())
}

async fn course_page(
    State(service): State<SharedService>,
    Path(course): Path<String>,
) -> Result<Html<String>, PageError> {
    render(service, course, String::new()).await
}

async fn topic_page(
    State(service): State<SharedService>,
    Path((course, topic)): Path<(String, String)>,
) -> Result<Html<String>, PageError> {
    render(service, course, topic).await
}

async fn render(
    service: SharedService,
    course: String,
    slug_path: String,
) -> Result<Html<String>, PageError> {
    let page = run_blocking(move || service.render_page(&course, &slug_path)).await?;
    Ok(Html(page_html(&page)))
}
