//! Viewer HTTP 处理器

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};

use super::page::{render_error_page, render_view_page};
use super::router::ViewerState;
use super::types::{ErrorResponse, HealthResponse, ViewQuery};

/// GET /view/{id}
/// 渲染案件事件查看页面
pub async fn view_case(
    State(state): State<ViewerState>,
    Path(case_id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Response {
    // 页面展示与流水线使用同一个规范化后的 ID
    let case_id = case_id.trim();
    let env = query.effective_env(&state.default_env);

    let aggregate = match state.pipeline.run(case_id, env).await {
        Ok(aggregate) => aggregate,
        Err(e) => {
            tracing::error!("获取案件 {} 事件失败: {}", case_id, e);
            let status = if e.status_code() == StatusCode::BAD_REQUEST {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            return (status, Html(render_error_page(case_id, &e.to_string()))).into_response();
        }
    };

    match render_view_page(case_id, env, &aggregate) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("渲染事件页面失败: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_error_page(case_id, "渲染页面失败")),
            )
                .into_response()
        }
    }
}

/// GET /api/events/{id}
/// 以 JSON 返回聚合结果
pub async fn get_case_events(
    State(state): State<ViewerState>,
    Path(case_id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Response {
    let env = query.effective_env(&state.default_env);

    match state.pipeline.run(&case_id, env).await {
        Ok(aggregate) => Json(aggregate).into_response(),
        Err(e) => {
            tracing::error!("获取案件 {} 事件失败: {}", case_id, e);
            (e.status_code(), Json(ErrorResponse::from(&e))).into_response()
        }
    }
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
