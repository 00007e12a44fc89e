//! 详情合并：拼接各批次结果并按时间倒序排列

use std::cmp::Reverse;

use super::model::DetailRecord;

/// 合并批次结果
///
/// 按传入顺序拼接后做稳定排序（`eventDate` 倒序，最新在前）。
/// 时间相同的记录保持传入顺序；无法解析的时间排在最后
pub fn merge_details(batches: Vec<Vec<DetailRecord>>) -> Vec<DetailRecord> {
    let mut details: Vec<DetailRecord> = batches.into_iter().flatten().collect();
    details.sort_by_cached_key(|detail| Reverse(detail.event_date.parse()));
    details
}
