//! 输出清洗 - 业务能力层
//!
//! 从模型原始输出中取回文档正文：还原被转义的标记字符，
//! 优先提取代码围栏内部，否则截取第一个 `<` 到最后一个 `>`，
//! 最后去掉残留的围栏符号。

use regex::Regex;

const FENCE: &str = "```";

/// 围栏对，可带格式标签（如 ```html）；常见文档标签可直接紧贴正文
const FENCED_BLOCK_PATTERN: &str = r"(?s)```(?:(?i:html|xhtml|xml|markdown|md)\b|[A-Za-z0-9_+\-]*[ \t]*\r?\n|[A-Za-z0-9_+\-]+\s+)?\s*(.*?)```";

/// 残留的围栏及其标签
const STRAY_FENCE_PATTERN: &str = r"```[A-Za-z0-9_+\-]*";

/// 清洗模型输出，没有结构化内容时返回空字符串
pub fn sanitize(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let text = unescape_markup(raw);

    let body = match extract_fenced(&text) {
        Some(inner) => inner,
        None => extract_markup_span(&text).unwrap_or_default(),
    };

    strip_fences(&body).trim().to_string()
}

/// 还原标记字符的 HTML 实体，`&amp;` 最后处理
fn unescape_markup(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

fn extract_fenced(text: &str) -> Option<String> {
    if !text.contains(FENCE) {
        return None;
    }
    let re = Regex::new(FENCED_BLOCK_PATTERN).ok()?;
    let caps = re.captures(text)?;
    caps.get(1).map(|m| m.as_str().trim().to_string())
}

fn extract_markup_span(text: &str) -> Option<String> {
    let start = text.find('<')?;
    let end = text.rfind('>')?;
    (start < end).then(|| text[start..=end].to_string())
}

fn strip_fences(text: &str) -> String {
    match Regex::new(STRAY_FENCE_PATTERN) {
        Ok(re) => re.replace_all(text, "").into_owned(),
        Err(_) => text.replace(FENCE, ""),
    }
}
