//! 公共工具模块

/// 渲染 URL 模板
///
/// 将模板中所有 `${key}` 占位符替换为对应的值（值会做 URL 编码），
/// 未提供的占位符原样保留
pub fn render_template(template: &str, params: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in params {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, &urlencoding::encode(value));
    }
    result
}

/// 截断上游响应体用于日志输出，确保不会在多字节字符中间截断
///
/// 启用 `sensitive-logs` feature 时返回完整内容
pub fn preview_body(body: &str, max_bytes: usize) -> String {
    if cfg!(feature = "sensitive-logs") || body.len() <= max_bytes {
        return body.to_string();
    }

    let end = body
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= max_bytes)
        .last()
        .unwrap_or(0);

    format!("{}...（共 {} 字节）", &body[..end], body.len())
}
