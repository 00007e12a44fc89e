use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Event Viewer 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// 元数据服务 URL 模板（GET）
    /// 可用变量: ${env}, ${id}
    #[serde(default)]
    pub meta_url_template: String,

    /// 事件详情服务 URL 模板（POST）
    /// 可用变量: ${env}
    #[serde(default)]
    pub detail_url_template: String,

    /// 请求未携带 env 参数时使用的环境
    #[serde(default = "default_env")]
    pub default_env: String,

    /// 元数据单页大小（作为 size 查询参数发送）
    #[serde(default = "default_meta_page_size")]
    pub meta_page_size: usize,

    /// 每批请求的事件 ID 数量
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// 同时进行的详情批量请求上限（未配置时一次性全部发出）
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_concurrency: Option<usize>,

    /// 上游请求超时（秒）
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// HTTP 代理地址（可选）
    /// 支持格式: http://host:port, https://host:port, socks5://host:port
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,

    /// 配置文件路径（运行时元数据，不写入 JSON）
    #[serde(skip)]
    pub(crate) config_path: Option<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9090
}

fn default_env() -> String {
    "dev".to_string()
}

fn default_meta_page_size() -> usize {
    150
}

fn default_batch_size() -> usize {
    100
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            meta_url_template: String::new(),
            detail_url_template: String::new(),
            default_env: default_env(),
            meta_page_size: default_meta_page_size(),
            batch_size: default_batch_size(),
            detail_concurrency: None,
            request_timeout_secs: default_request_timeout_secs(),
            proxy_url: None,
            config_path: None,
        }
    }
}

impl Config {
    /// 获取默认配置文件路径
    pub fn default_config_path() -> &'static str {
        "config.json"
    }

    /// 从文件加载配置
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            // 配置文件不存在，返回默认配置
            let mut config = Self::default();
            config.config_path = Some(path.to_path_buf());
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// 获取配置文件路径（如果有）
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// 校验配置，启动前调用
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.meta_url_template.trim().is_empty() {
            anyhow::bail!("未配置 metaUrlTemplate");
        }
        if self.detail_url_template.trim().is_empty() {
            anyhow::bail!("未配置 detailUrlTemplate");
        }
        if self.batch_size == 0 {
            anyhow::bail!("batchSize 必须大于 0");
        }
        if self.meta_page_size == 0 {
            anyhow::bail!("metaPageSize 必须大于 0");
        }
        if self.detail_concurrency == Some(0) {
            anyhow::bail!("detailConcurrency 必须大于 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            meta_url_template: "http://meta.${env}.local/cases/${id}/events".to_string(),
            detail_url_template: "http://detail.${env}.local/events/search".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_defaults_from_empty_json() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert_eq!(config.default_env, "dev");
        assert_eq!(config.meta_page_size, 150);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.detail_concurrency, None);
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn test_camel_case_keys() {
        let json = r#"{
            "metaUrlTemplate": "http://m/${id}",
            "detailUrlTemplate": "http://d",
            "batchSize": 25,
            "detailConcurrency": 4
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.meta_url_template, "http://m/${id}");
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.detail_concurrency, Some(4));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_batch_size() {
        let config = Config {
            batch_size: 0,
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_templates() {
        assert!(Config::default().validate().is_err());

        let config = Config {
            detail_url_template: "  ".to_string(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = Config {
            detail_concurrency: Some(0),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let path = std::env::temp_dir().join("event-viewer-missing-config.json");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.config_path(), Some(path.as_path()));
    }
}
