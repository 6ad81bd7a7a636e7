//! Uploaded image serving.
//!
//! Images are uploaded as part of the event multipart forms; this module
//! only serves them back. Public access - the frontend embeds these URLs in
//! pages shown before login.

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use http::header;

use crate::core::ServerState;

enum ImageResponse {
    Ok(Bytes, String),
    NotFound,
    BadRequest,
}

impl IntoResponse for ImageResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            ImageResponse::Ok(content, content_type) => (
                http::StatusCode::OK,
                [(header::CONTENT_TYPE, content_type)],
                content,
            )
                .into_response(),
            ImageResponse::NotFound => {
                (http::StatusCode::NOT_FOUND, "File not found").into_response()
            }
            ImageResponse::BadRequest => {
                (http::StatusCode::BAD_REQUEST, "Invalid filename").into_response()
            }
        }
    }
}

async fn serve_image(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> ImageResponse {
    let file_path = match state.images.resolve(&filename) {
        Ok(path) => path,
        Err(_) => return ImageResponse::BadRequest,
    };

    match tokio::fs::read(&file_path).await {
        Ok(content) => {
            let content_type = mime_guess::from_path(&file_path)
                .first_or_octet_stream()
                .to_string();
            ImageResponse::Ok(content.into(), content_type)
        }
        Err(e) => {
            tracing::debug!(file = %filename, error = %e, "Image not found");
            ImageResponse::NotFound
        }
    }
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/image/{filename}", get(serve_image))
}
