//! 详情批量请求规划

use std::num::NonZeroUsize;

use super::model::CorrelationPair;

/// 默认每批事件 ID 数量
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(100).unwrap();

/// 按配对顺序展开所有 ID（请求侧在前），丢弃空值
pub fn flatten_ids(pairs: &[CorrelationPair]) -> Vec<String> {
    pairs
        .iter()
        .flat_map(|pair| pair.ids())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// 将 ID 切分为固定大小的批次（最后一批可能不足）
///
/// 纯划分：不丢弃、不重复、不重排
pub fn plan_batches(ids: &[String], batch_size: NonZeroUsize) -> Vec<Vec<String>> {
    ids.chunks(batch_size.get()).map(<[String]>::to_vec).collect()
}
