//! 记录压缩 - 业务能力层
//!
//! 把一条记录压缩成有长度上限的单行摘要

use crate::models::{Field, Record};

/// 字段名或字段值被截断时追加的省略标记
pub const ELLIPSIS: &str = "...";

/// 摘要达到总长度上限时追加的标记
pub const TRUNCATION_MARKER: &str = "[TRUNCATED]";

/// 字段名包含这些关键词时优先输出（大小写不敏感）
const PRIORITY_KEYWORDS: &[&str] = &[
    "title",
    "invention",
    "abstract",
    "claim",
    "applicant",
    "number",
    "publication",
    "id",
    "発明",
    "名称",
    "要約",
    "請求",
    "出願人",
    "番号",
    "发明",
    "摘要",
    "权利要求",
    "申请人",
    "编号",
    "公开",
];

/// 摘要长度限制（单位：字符）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestLimits {
    pub max_name_chars: usize,
    pub max_value_chars: usize,
    pub max_total_chars: usize,
}

impl Default for DigestLimits {
    fn default() -> Self {
        Self {
            max_name_chars: 30,
            max_value_chars: 300,
            max_total_chars: 1500,
        }
    }
}

/// 记录压缩器
#[derive(Debug, Clone, Default)]
pub struct RecordCompressor {
    limits: DigestLimits,
}

impl RecordCompressor {
    pub fn new(limits: DigestLimits) -> Self {
        Self { limits }
    }

    /// 压缩一条记录
    ///
    /// 空字段被丢弃；优先字段排在前面，同一优先级内保持原始顺序。
    /// 累计长度超过上限时截到上限并追加 [`TRUNCATION_MARKER`]。
    pub fn compress(&self, record: &Record) -> String {
        let mut fields: Vec<&Field> = record.fields().iter().filter(|f| !f.is_empty()).collect();
        // sort_by_key 是稳定排序，同分字段保持原顺序
        fields.sort_by_key(|f| priority_score(&f.name));

        let mut digest = String::new();
        let mut digest_chars = 0;

        for field in fields {
            let value = field.value.as_deref().unwrap_or_default();
            let segment = format!(
                "{}: {} | ",
                truncate_chars(&field.name, self.limits.max_name_chars),
                truncate_chars(value, self.limits.max_value_chars)
            );
            digest_chars += segment.chars().count();
            digest.push_str(&segment);

            if digest_chars > self.limits.max_total_chars {
                digest = digest.chars().take(self.limits.max_total_chars).collect();
                digest.push_str(TRUNCATION_MARKER);
                break;
            }
        }

        digest
    }

    /// 按顺序压缩全部记录
    pub fn compress_all(&self, records: &[Record]) -> Vec<String> {
        records.iter().map(|r| self.compress(r)).collect()
    }
}

/// 0 = 优先字段，1 = 普通字段
fn priority_score(field_name: &str) -> u8 {
    let lowered = field_name.to_lowercase();
    if PRIORITY_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        0
    } else {
        1
    }
}

/// 按字符截断，超出时追加省略号
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        text.chars().take(max_chars).collect::<String>() + ELLIPSIS
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compress(record: &Record) -> String {
        RecordCompressor::default().compress(record)
    }

    #[test]
    fn drops_empty_and_missing_fields() {
        let record = Record::new()
            .with("note", "")
            .with_missing("remark")
            .with("color", "red");
        assert_eq!(compress(&record), "color: red | ");
    }

    #[test]
    fn priority_fields_first_and_stable() {
        let record = Record::new()
            .with("color", "red")
            .with("Title", "Widget")
            .with("size", "L")
            .with("出願人", "ACME")
            .with("weight", "3kg")
            .with("Publication Number", "JP-1");
        assert_eq!(
            compress(&record),
            "Title: Widget | 出願人: ACME | Publication Number: JP-1 | color: red | size: L | weight: 3kg | "
        );
    }

    #[test]
    fn truncates_names_and_values() {
        let long_name = "n".repeat(31);
        let long_value = "v".repeat(301);
        let record = Record::new().with(long_name, long_value);
        let digest = compress(&record);

        assert!(digest.starts_with(&format!("{}...: ", "n".repeat(30))));
        assert!(digest.contains(&format!("{}... | ", "v".repeat(300))));
    }

    #[test]
    fn exact_limit_is_not_truncated() {
        let record = Record::new().with("n".repeat(30), "v".repeat(300));
        assert!(!compress(&record).contains(ELLIPSIS));
    }

    #[test]
    fn total_length_is_capped() {
        let mut record = Record::new();
        for i in 0..20 {
            record = record.with(format!("field{}", i), "x".repeat(300));
        }
        let digest = compress(&record);

        assert!(digest.ends_with(TRUNCATION_MARKER));
        assert!(digest.chars().count() <= 1500 + TRUNCATION_MARKER.chars().count());
        assert!(!digest.contains("field19"));
    }

    #[test]
    fn multibyte_text_is_counted_in_chars() {
        let record = Record::new().with("名称", "技".repeat(400));
        let digest = compress(&record);
        assert!(digest.contains(&format!("{}...", "技".repeat(300))));
    }

    #[test]
    fn empty_record_gives_empty_digest() {
        assert_eq!(compress(&Record::new()), "");
    }
}
