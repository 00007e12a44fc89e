//! 事件数据源抽象

use async_trait::async_trait;

use super::model::{DetailRecord, MetadataRecord};

/// 上游事件数据源
///
/// 流水线只依赖这个 trait；HTTP 实现见 [`crate::upstream::HttpEventSource`]
#[async_trait]
pub trait EventSource: Send + Sync {
    /// 获取案件的元数据（单页）
    async fn fetch_metadata(&self, case_id: &str, env: &str)
    -> anyhow::Result<Vec<MetadataRecord>>;

    /// 获取一批事件的详情
    ///
    /// 只返回服务端存在的记录，不保证每个 ID 都有结果
    async fn fetch_details(
        &self,
        case_id: &str,
        env: &str,
        event_ids: &[String],
    ) -> anyhow::Result<Vec<DetailRecord>>;
}
