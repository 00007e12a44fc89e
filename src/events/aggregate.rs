//! 聚合结果构建
//!
//! 输出交给渲染层：按 eventId 索引的详情、按 id 索引的元数据以及配对列表

use std::cmp::Reverse;

use serde::Serialize;

use super::model::{CorrelationPair, DetailRecord, MetadataRecord};
use super::ordered::OrderedMap;

/// eventId -> 详情
pub type EventMap = OrderedMap<DetailRecord>;
/// id -> 元数据
pub type MetaMap = OrderedMap<MetadataRecord>;

/// 单次请求的聚合结果（不跨请求共享，不持久化）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAggregate {
    pub event_map: EventMap,
    pub meta_map: MetaMap,
    pub pairs: Vec<CorrelationPair>,
}

impl EventAggregate {
    /// 配对中引用了、但详情服务没有返回的 ID
    pub fn unresolved_ids(&self) -> Vec<&str> {
        self.pairs
            .iter()
            .flat_map(|pair| pair.ids())
            .filter(|id| !self.event_map.contains_key(id))
            .collect()
    }

    /// 按事件列表展示顺序返回 eventId：以映射中最终保留的详情时间倒序，
    /// 时间相同按映射顺序，无法解析的时间排在最后
    pub fn timeline(&self) -> Vec<&str> {
        let mut entries: Vec<(&str, &DetailRecord)> = self.event_map.iter().collect();
        entries.sort_by_cached_key(|(_, detail)| Reverse(detail.event_date.parse()));
        entries.into_iter().map(|(id, _)| id).collect()
    }
}

/// 构建聚合结果
///
/// `details` 应为 [`merge_details`](super::merger::merge_details) 的输出；
/// 两个映射均为后写覆盖前写，不做额外排序或过滤
pub fn build_aggregate(
    metas: Vec<MetadataRecord>,
    details: Vec<DetailRecord>,
    pairs: Vec<CorrelationPair>,
) -> EventAggregate {
    let event_map: EventMap = details
        .into_iter()
        .map(|detail| (detail.event_id.clone(), detail))
        .collect();
    let meta_map: MetaMap = metas
        .into_iter()
        .map(|meta| (meta.id.clone(), meta))
        .collect();

    EventAggregate {
        event_map,
        meta_map,
        pairs,
    }
}
