//! 事件查看页面渲染
//!
//! 页面本身只是外壳：聚合结果以 JSON 数据块嵌入，由 `/static/viewer.js` 在浏览器端渲染

use serde::Serialize;

use crate::events::EventAggregate;

/// 转义 HTML 文本
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 序列化为可安全嵌入 `<script type="application/json">` 的 JSON
///
/// `<` `>` `&` 只会出现在字符串内，替换为 unicode 转义后 JSON 语义不变
fn embed_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

/// 渲染事件查看页面
pub fn render_view_page(
    case_id: &str,
    env: &str,
    aggregate: &EventAggregate,
) -> serde_json::Result<String> {
    let event_data = embed_json(&aggregate.event_map)?;
    let meta_data = embed_json(&aggregate.meta_map)?;
    let pair_data = embed_json(&aggregate.pairs)?;
    let order_data = embed_json(&aggregate.timeline())?;
    let case_id = escape_html(case_id);
    let env = escape_html(env);

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>Event Viewer - {case_id}</title>
  <link rel="stylesheet" href="/static/viewer.css">
</head>
<body>
  <header class="page-header">
    <h1>{case_id}</h1>
    <span class="env-badge">{env}</span>
  </header>
  <div class="tz-switch-row">
    <label class="switch">
      <input type="checkbox" id="tzSwitch" checked>
      <span class="slider"></span>
    </label>
    <span id="tzSwitchLabel"></span>
    <span id="timezoneLabel"></span>
  </div>
  <ul class="event-list" id="eventList"></ul>
  <div class="modal-overlay" id="modal">
    <div class="modal-container">
      <div class="tab-bar" id="tabHeader"></div>
      <button class="close-btn" id="closeModalBtn" aria-label="Close">&times;</button>
      <div class="modal-inner">
        <div class="modal-header">
          <span class="modal-type" id="modalType"></span>
          <span class="modal-date" id="modalDate"></span>
        </div>
        <div id="modalStatus" class="status"></div>
        <div id="modalUri" class="uri-row"></div>
        <div class="section">
          <div class="section-title" data-section="metadataContent">Metadata</div>
          <div class="section-content" id="metadataContent"></div>
        </div>
        <div class="section">
          <div class="section-title" data-section="headersContent">Headers</div>
          <div class="section-content" id="headersContent"></div>
        </div>
        <div class="section">
          <div class="section-title" data-section="entityContent">Entity</div>
          <div class="section-content visible" id="entityContent"></div>
        </div>
      </div>
    </div>
  </div>
  <script type="application/json" id="event-data">{event_data}</script>
  <script type="application/json" id="meta-data">{meta_data}</script>
  <script type="application/json" id="pair-data">{pair_data}</script>
  <script type="application/json" id="order-data">{order_data}</script>
  <script src="/static/viewer.js"></script>
</body>
</html>
"#
    ))
}

/// 渲染错误页面
pub fn render_error_page(case_id: &str, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>Event Viewer - {case_id}</title>
  <link rel="stylesheet" href="/static/viewer.css">
</head>
<body>
  <div class="error-box">
    <h1>Failed to load events</h1>
    <p>{message}</p>
  </div>
</body>
</html>
"#,
        case_id = escape_html(case_id),
        message = escape_html(message),
    )
}
