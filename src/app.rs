use axum::{
    Json, Router,
    body::Body,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info, warn};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::Config;
use crate::downloader::{DOWNLOAD_FILENAME, XLSX_MIME};
use crate::error::FillError;
use crate::process::{Preview, process_workbook};

/// Multipart field carrying the uploaded workbook.
pub const UPLOAD_FIELD: &str = "file";

pub struct AppState {
    config: Config,
}

#[derive(Serialize)]
struct ApiResponse {
    status: String,
    message: Option<String>,
}

impl IntoResponse for FillError {
    fn into_response(self) -> Response {
        let status = match &self {
            FillError::MissingSourceColumns(_) | FillError::MissingTargetColumns(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            FillError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            FillError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("request failed: {}", self);
        } else {
            warn!("request rejected: {}", self);
        }

        (
            status,
            Json(ApiResponse {
                status: "error".to_string(),
                message: Some(self.to_string()),
            }),
        )
            .into_response()
    }
}

/// Build the application router
///
/// # Arguments
/// * `config` - Active configuration, shared read-only by every request
///
/// # Returns
/// * `Router` - Routes for the landing page, config dump, preview and download
pub fn router(config: Config) -> Router {
    let max_upload = config.server.max_upload_bytes;
    let app_state = Arc::new(AppState { config });

    Router::new()
        .route("/", get(serve_landing))
        .route("/api/config", get(get_config))
        .route("/api/preview", post(preview_upload))
        .route("/api/process", post(process_upload))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload))
        .with_state(app_state)
}

/// Bind the configured address and serve until the process is stopped.
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.server.bind_addr.clone();
    info!(
        "rules: style_code={:?} (default {}), image_code={:?}, process label '{}'",
        config.rules.style_code,
        config.rules.default_style_code,
        config.rules.image_code,
        config.rules.process_label
    );

    let app = router(config);

    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_landing() -> Html<&'static str> {
    Html(include_str!("./static/index.html"))
}

async fn get_config(State(state): State<Arc<AppState>>) -> Json<Config> {
    Json(state.config.clone())
}

async fn preview_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Preview>, FillError> {
    let file_data = read_upload(&mut multipart).await?;
    let processed = process_workbook(&file_data, &state.config)?;

    Ok(Json(processed.preview(state.config.server.preview_rows)))
}

async fn process_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, FillError> {
    let file_data = read_upload(&mut multipart).await?;
    let processed = process_workbook(&file_data, &state.config)?;
    let buffer = processed.to_xlsx()?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, XLSX_MIME)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", DOWNLOAD_FILENAME),
        )
        .body(Body::from(buffer))
        .map_err(|e| FillError::Unexpected(e.to_string()))
}

// Pull the workbook bytes out of the multipart body, ignoring other fields
async fn read_upload(multipart: &mut Multipart) -> Result<Vec<u8>, FillError> {
    let mut file_data = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| FillError::MalformedInput(e.to_string()))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            file_data = field
                .bytes()
                .await
                .map_err(|e| FillError::MalformedInput(e.to_string()))?
                .to_vec();
        }
    }

    if file_data.is_empty() {
        return Err(FillError::MalformedInput(format!(
            "no file data received in field '{}'",
            UPLOAD_FIELD
        )));
    }

    info!("received upload of {} bytes", file_data.len());
    Ok(file_data)
}
