//! 流水线错误类型

use std::fmt;

use http::StatusCode;

/// 流水线错误
///
/// 任一上游失败都会中止整个流水线，不返回部分结果
#[derive(Debug)]
pub enum PipelineError {
    /// 请求参数无效
    InvalidRequest(String),
    /// 元数据服务不可用或返回错误
    MetadataFetch(anyhow::Error),
    /// 某个详情批次请求失败
    DetailFetch { batch: usize, source: anyhow::Error },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::InvalidRequest(msg) => write!(f, "请求参数无效: {}", msg),
            PipelineError::MetadataFetch(e) => write!(f, "获取元数据失败: {:#}", e),
            PipelineError::DetailFetch { batch, source } => {
                write!(f, "获取事件详情失败（批次 #{}）: {:#}", batch, source)
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::InvalidRequest(_) => None,
            PipelineError::MetadataFetch(e) => Some(&**e),
            PipelineError::DetailFetch { source, .. } => Some(&**source),
        }
    }
}

impl PipelineError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            PipelineError::MetadataFetch(_) | PipelineError::DetailFetch { .. } => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    /// 错误类型标识（用于 JSON 错误响应）
    pub fn error_type(&self) -> &'static str {
        match self {
            PipelineError::InvalidRequest(_) => "invalid_request_error",
            PipelineError::MetadataFetch(_) => "metadata_fetch_error",
            PipelineError::DetailFetch { .. } => "detail_fetch_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            PipelineError::InvalidRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PipelineError::MetadataFetch(anyhow::anyhow!("down")).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_display_includes_batch_and_cause() {
        let err = PipelineError::DetailFetch {
            batch: 2,
            source: anyhow::anyhow!("HTTP 503"),
        };
        let text = err.to_string();
        assert!(text.contains("#2"));
        assert!(text.contains("HTTP 503"));
        assert_eq!(err.error_type(), "detail_fetch_error");
    }
}
