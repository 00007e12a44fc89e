//! Viewer API 请求/响应类型

use serde::{Deserialize, Serialize};

use crate::events::PipelineError;

/// 查询参数
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    /// 目标环境，缺省时使用配置中的 defaultEnv
    pub env: Option<String>,
}

impl ViewQuery {
    /// 有效环境（空字符串视为未提供）
    pub fn effective_env<'a>(&'a self, default_env: &'a str) -> &'a str {
        self.env
            .as_deref()
            .map(str::trim)
            .filter(|env| !env.is_empty())
            .unwrap_or(default_env)
    }
}

/// API 错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// 错误详情
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                error_type: error_type.into(),
                message: message.into(),
            },
        }
    }
}

impl From<&PipelineError> for ErrorResponse {
    fn from(err: &PipelineError) -> Self {
        Self::new(err.error_type(), err.to_string())
    }
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_env() {
        let query = ViewQuery { env: None };
        assert_eq!(query.effective_env("dev"), "dev");

        let query = ViewQuery {
            env: Some("  ".to_string()),
        };
        assert_eq!(query.effective_env("dev"), "dev");

        let query = ViewQuery {
            env: Some("prod".to_string()),
        };
        assert_eq!(query.effective_env("dev"), "prod");
    }

    #[test]
    fn test_error_response_from_pipeline_error() {
        let err = PipelineError::InvalidRequest("案件 ID 不能为空".to_string());
        let value = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(value["error"]["type"], "invalid_request_error");
        assert!(value["error"]["message"].as_str().unwrap().contains("案件 ID"));
    }
}
