//! 事件关联与详情聚合流水线
//!
//! 元数据（一次） -> 配对 -> 批次规划 -> 并发获取详情 -> 合并排序 -> 聚合
//!
//! 每次调用独立构建全部结果，不共享可变状态

use std::num::NonZeroUsize;
use std::sync::Arc;

use futures::future;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::Instrument;

use super::aggregate::{EventAggregate, build_aggregate};
use super::batch::{DEFAULT_BATCH_SIZE, flatten_ids, plan_batches};
use super::correlator::correlate;
use super::error::PipelineError;
use super::merger::merge_details;
use super::model::DetailRecord;
use super::source::EventSource;

/// 流水线参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// 每批事件 ID 数量
    pub batch_size: NonZeroUsize,
    /// 同时进行的批次请求上限，None 表示全部同时发出
    pub max_in_flight: Option<NonZeroUsize>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_in_flight: None,
        }
    }
}

/// 事件聚合流水线
pub struct EventPipeline {
    source: Arc<dyn EventSource>,
    options: PipelineOptions,
}

impl EventPipeline {
    pub fn new(source: Arc<dyn EventSource>, options: PipelineOptions) -> Self {
        Self { source, options }
    }

    /// 为案件运行完整流水线
    ///
    /// 元数据或任一详情批次失败都会中止，不返回部分结果
    pub async fn run(&self, case_id: &str, env: &str) -> Result<EventAggregate, PipelineError> {
        let case_id = case_id.trim();
        let env = env.trim();
        if case_id.is_empty() {
            return Err(PipelineError::InvalidRequest("案件 ID 不能为空".to_string()));
        }
        if env.is_empty() {
            return Err(PipelineError::InvalidRequest("环境不能为空".to_string()));
        }

        let span = tracing::info_span!(
            "pipeline",
            trace_id = %uuid::Uuid::new_v4(),
            case_id = %case_id,
            env = %env
        );
        self.run_inner(case_id, env).instrument(span).await
    }

    async fn run_inner(&self, case_id: &str, env: &str) -> Result<EventAggregate, PipelineError> {
        tracing::info!("开始查询案件事件");

        let metas = self
            .source
            .fetch_metadata(case_id, env)
            .await
            .map_err(PipelineError::MetadataFetch)?;
        tracing::info!(count = metas.len(), "元数据获取完成");

        let pairs = correlate(&metas);
        let event_ids = flatten_ids(&pairs);
        let batches = plan_batches(&event_ids, self.options.batch_size);
        tracing::info!(
            pairs = pairs.len(),
            event_ids = event_ids.len(),
            batches = batches.len(),
            "开始获取事件详情"
        );

        let results = self.fetch_batches(case_id, env, batches).await?;
        let details = merge_details(results);

        let aggregate = build_aggregate(metas, details, pairs);
        let unresolved = aggregate.unresolved_ids();
        if !unresolved.is_empty() {
            tracing::warn!(
                count = unresolved.len(),
                "部分事件 ID 未返回详情: {:?}",
                unresolved
            );
        }
        if aggregate.event_map.is_empty() && !aggregate.meta_map.is_empty() {
            tracing::warn!("元数据非空，但详情服务未返回任何事件");
        }
        tracing::info!(events = aggregate.event_map.len(), "事件聚合完成");

        Ok(aggregate)
    }

    /// 并发获取所有批次
    ///
    /// 批次按 0..n 顺序发出，结果按发出顺序返回（与完成顺序无关），
    /// 因此合并时同一时间的记录按批次顺序排列
    async fn fetch_batches(
        &self,
        case_id: &str,
        env: &str,
        batches: Vec<Vec<String>>,
    ) -> Result<Vec<Vec<DetailRecord>>, PipelineError> {
        let requests = batches.into_iter().enumerate().map(|(index, batch)| {
            let source = Arc::clone(&self.source);
            async move {
                tracing::debug!(batch = index, size = batch.len(), "请求详情批次");
                match source.fetch_details(case_id, env, &batch).await {
                    Ok(details) => {
                        tracing::debug!(batch = index, returned = details.len(), "详情批次完成");
                        Ok(details)
                    }
                    Err(e) => {
                        tracing::error!(batch = index, "详情批次失败: {:#}", e);
                        Err(PipelineError::DetailFetch {
                            batch: index,
                            source: e,
                        })
                    }
                }
            }
        });

        match self.options.max_in_flight {
            None => future::try_join_all(requests).await,
            Some(limit) => stream::iter(requests).buffered(limit.get()).try_collect().await,
        }
    }
}
