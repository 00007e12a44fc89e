//! 前端静态资源（编译期嵌入）

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use http::header;
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

/// GET /static/{*path}
pub async fn serve_asset(Path(path): Path<String>) -> Response {
    let path = path.trim_start_matches('/');
    match Assets::get(path) {
        Some(file) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [
                    (header::CONTENT_TYPE, mime.as_ref().to_string()),
                    (header::CACHE_CONTROL, "public, max-age=300".to_string()),
                ],
                file.data.into_owned(),
            )
                .into_response()
        }
        None => {
            tracing::debug!("静态资源不存在: {}", path);
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}
