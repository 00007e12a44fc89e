//! 请求/响应关联推断
//!
//! 元数据只携带部分关联信息（响应记录通过 `requestId` 指向请求），
//! 且请求与响应的到达顺序不固定。这里把扁平的元数据列表还原为配对列表

use std::collections::HashSet;

use super::model::{CorrelationPair, MetadataRecord};
use super::ordered::OrderedMap;

/// 从元数据推断请求/响应配对
///
/// 1. 按输入顺序遍历：带 `requestId` 的记录登记 `requestId -> id`（请求侧）
///    与 `id -> requestId`（响应侧）；否则若 `id` 尚未作为请求侧键出现，
///    登记 `id -> None`，等待可能出现的响应
/// 2. 每个请求侧键按首次登记顺序输出一个 `(request, response?)`
/// 3. 响应侧记录的 `requestId` 若不是任何已输出配对的请求侧，
///    追加 `(None, response)`
///
/// 重复键后写覆盖前写，位置以首次登记为准
pub fn correlate(records: &[MetadataRecord]) -> Vec<CorrelationPair> {
    let mut requests: OrderedMap<Option<String>> = OrderedMap::new();
    let mut responses: OrderedMap<String> = OrderedMap::new();

    for record in records {
        match record.linked_request_id() {
            Some(request_id) => {
                requests.insert(request_id.to_string(), Some(record.id.clone()));
                responses.insert(record.id.clone(), request_id.to_string());
            }
            None if !requests.contains_key(&record.id) => {
                requests.insert(record.id.clone(), None);
            }
            None => {}
        }
    }

    let mut pairs: Vec<CorrelationPair> = requests
        .iter()
        .filter_map(|(request, response)| {
            CorrelationPair::new(Some(request.to_string()), response.clone())
        })
        .collect();

    let mut emitted_requests: HashSet<String> =
        requests.keys().map(str::to_string).collect();

    for (response, request) in responses.iter() {
        if emitted_requests.contains(request) {
            continue;
        }
        tracing::debug!(response_id = %response, request_id = %request, "孤立响应，单独成对");
        if let Some(pair) = CorrelationPair::new(None, Some(response.to_string())) {
            pairs.push(pair);
        }
        emitted_requests.insert(request.clone());
    }

    pairs
}
