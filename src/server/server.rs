use anyhow::Result;
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tracing::{debug, error, info};

use crate::library::{scanner, MusicLibrary};
use tower_http::cors::CorsLayer;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{log_requests, state::*, stream::stream_audio, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug)]
struct SetMusicFolderBody {
    pub path: String,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub(super) fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_owned(),
        }),
    )
        .into_response()
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    };
    Json(stats)
}

async fn set_music_folder(
    State(library): State<GuardedLibrary>,
    Json(body): Json<SetMusicFolderBody>,
) -> Response {
    match MusicLibrary::open(&body.path) {
        Ok(opened) => {
            info!("Music folder set to {}", opened.root().display());
            *library.lock().unwrap() = Some(opened);
            Json(MessageResponse {
                message: format!("Music folder set to: {}", body.path),
            })
            .into_response()
        }
        Err(err) => {
            debug!("Rejected music folder {:?}: {}", body.path, err);
            error_response(StatusCode::BAD_REQUEST, "Invalid directory path")
        }
    }
}

async fn get_library(State(library): State<GuardedLibrary>) -> Response {
    let library = library.lock().unwrap().clone();
    let library = match library {
        Some(library) => library,
        None => return error_response(StatusCode::BAD_REQUEST, "Music folder not set"),
    };

    // The walk is blocking I/O; keep it off the async executor.
    let scanned = tokio::task::spawn_blocking(move || scanner::scan(&library)).await;
    match scanned {
        Ok(Ok(tracks)) => Json(tracks).into_response(),
        Ok(Err(err)) => {
            error!("Library scan failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(err) => {
            error!("Library scan task panicked: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn get_album_art(
    State(library): State<GuardedLibrary>,
    Path(filename): Path<String>,
) -> Response {
    let library = library.lock().unwrap().clone();
    let library = match library {
        Some(library) => library,
        None => return error_response(StatusCode::BAD_REQUEST, "Album art cache not set"),
    };

    let path = match crate::library::path_guard::resolve_under(
        library.art_cache().dir(),
        &filename,
    ) {
        Ok(path) => path,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid file path"),
    };

    if !path.is_file() {
        return error_response(StatusCode::NOT_FOUND, "Album art not found");
    }

    let buffer = match tokio::fs::read(&path).await {
        Ok(buffer) => buffer,
        Err(err) => {
            error!("Failed to read album art {}: {}", path.display(), err);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let content_type = infer::get(&buffer)
        .map(|kind| kind.mime_type())
        .unwrap_or("application/octet-stream");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .body(buffer.into())
        .unwrap()
}

pub fn make_app(config: ServerConfig, library: GuardedLibrary) -> Router {
    let state = ServerState::new(config, library);

    let api_routes: Router = Router::new()
        .route("/set_music_folder", post(set_music_folder))
        .route("/library", get(get_library))
        .route("/stream/{*filepath}", get(stream_audio))
        .route("/album_art/{filename}", get(get_album_art))
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    let app: Router = Router::new()
        .route("/", get(home))
        .with_state(state.clone())
        .nest("/api", api_routes);

    app.layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(config: ServerConfig, library: Option<MusicLibrary>) -> Result<()> {
    let port = config.port;
    let app = make_app(config, Arc::new(Mutex::new(library)));

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}
