//! 基于 HTTP 的上游事件数据源
//!
//! - 元数据: GET `metaUrlTemplate`，附带 `size` 查询参数
//! - 详情: POST `detailUrlTemplate`，body 为 `{"caseIds": [..], "eventIds": [..]}`

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::common::{preview_body, render_template};
use crate::events::EventSource;
use crate::events::model::{DetailRecord, MetadataRecord};
use crate::model::config::Config;

/// 错误日志中上游响应体的最大长度
const ERROR_BODY_PREVIEW_BYTES: usize = 512;

/// 详情查询请求体
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailQuery<'a> {
    case_ids: [&'a str; 1],
    event_ids: &'a [String],
}

/// HTTP 事件数据源
pub struct HttpEventSource {
    client: Client,
    meta_url_template: String,
    detail_url_template: String,
    meta_page_size: usize,
}

impl HttpEventSource {
    pub fn new(
        client: Client,
        meta_url_template: impl Into<String>,
        detail_url_template: impl Into<String>,
        meta_page_size: usize,
    ) -> Self {
        Self {
            client,
            meta_url_template: meta_url_template.into(),
            detail_url_template: detail_url_template.into(),
            meta_page_size,
        }
    }

    /// 从配置创建
    pub fn from_config(client: Client, config: &Config) -> Self {
        Self::new(
            client,
            config.meta_url_template.clone(),
            config.detail_url_template.clone(),
            config.meta_page_size,
        )
    }

    fn meta_url(&self, case_id: &str, env: &str) -> String {
        render_template(&self.meta_url_template, &[("env", env), ("id", case_id)])
    }

    fn detail_url(&self, env: &str) -> String {
        render_template(&self.detail_url_template, &[("env", env)])
    }
}

/// 检查状态码并解析 JSON 响应体
async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> anyhow::Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("HTTP {}: {}", status, preview_body(&body, ERROR_BODY_PREVIEW_BYTES));
    }

    let bytes = resp.bytes().await.context("读取响应体失败")?;
    serde_json::from_slice(&bytes).with_context(|| {
        format!(
            "解析响应体失败: {}",
            preview_body(&String::from_utf8_lossy(&bytes), ERROR_BODY_PREVIEW_BYTES)
        )
    })
}

#[async_trait]
impl EventSource for HttpEventSource {
    async fn fetch_metadata(
        &self,
        case_id: &str,
        env: &str,
    ) -> anyhow::Result<Vec<MetadataRecord>> {
        let url = self.meta_url(case_id, env);
        tracing::debug!("请求元数据: {}", url);

        let resp = self
            .client
            .get(&url)
            .query(&[("size", self.meta_page_size)])
            .send()
            .await
            .with_context(|| format!("请求元数据服务失败: {}", url))?;

        decode_json(resp).await
    }

    async fn fetch_details(
        &self,
        case_id: &str,
        env: &str,
        event_ids: &[String],
    ) -> anyhow::Result<Vec<DetailRecord>> {
        let url = self.detail_url(env);
        let query = DetailQuery {
            case_ids: [case_id],
            event_ids,
        };

        let resp = self
            .client
            .post(&url)
            .json(&query)
            .send()
            .await
            .with_context(|| format!("请求详情服务失败: {}", url))?;

        decode_json(resp).await
    }
}
