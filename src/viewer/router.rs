//! Viewer 路由

use std::sync::Arc;

use axum::{Router, routing::get};

use crate::events::EventPipeline;

use super::handlers::{get_case_events, health, view_case};
use super::ui::serve_asset;

/// Viewer 共享状态
#[derive(Clone)]
pub struct ViewerState {
    pub pipeline: Arc<EventPipeline>,
    /// 请求未携带 env 时使用的环境
    pub default_env: String,
}

impl ViewerState {
    pub fn new(pipeline: EventPipeline, default_env: impl Into<String>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            default_env: default_env.into(),
        }
    }
}

/// 创建 Viewer 路由
///
/// # 端点
/// - `GET /view/{id}?env=` - 事件查看页面
/// - `GET /api/events/{id}?env=` - 聚合结果 JSON
/// - `GET /static/{*path}` - 前端静态资源
/// - `GET /health` - 健康检查
pub fn create_viewer_router(state: ViewerState) -> Router {
    Router::new()
        .route("/view/{id}", get(view_case))
        .route("/api/events/{id}", get(get_case_events))
        .route("/static/{*path}", get(serve_asset))
        .route("/health", get(health))
        .layer(cors_layer())
        .with_state(state)
}

/// CORS 中间件层（JSON 接口允许跨域读取）
fn cors_layer() -> tower_http::cors::CorsLayer {
    use tower_http::cors::{Any, CorsLayer};

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
