// handlers/pages/media.rs - GET /media/:name serves uploaded pictures

use std::io::ErrorKind;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::state::AppState;
use crate::views::PageError;

pub async fn media_get(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, PageError> {
    let bytes = state.catalog.pictures().load(&name).await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            PageError::NotFound(format!("picture {} was not found", name))
        } else {
            tracing::error!("Failed to read picture {}: {}", name, e);
            PageError::Internal("The picture could not be read".to_string())
        }
    })?;

    let mime = mime_guess::from_path(&name).first_or_octet_stream();
    Ok((
        [
            (header::CONTENT_TYPE, mime.essence_str().to_string()),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
        ],
        bytes,
    )
        .into_response())
}
