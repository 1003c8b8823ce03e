use crate::error::{AppResult, FileError};
use crate::models::Record;
use serde_json::Value as JsonValue;

/// 解析 JSON 数组，每个元素是一个对象
///
/// `null` 视为缺失，数字与布尔值按文本保存，字段顺序与源文件一致
pub fn parse_json_records(content: &str, source: &str) -> AppResult<Vec<Record>> {
    let malformed = |reason: String| FileError::MalformedRecords {
        path: source.to_string(),
        reason,
    };

    let value: JsonValue =
        serde_json::from_str(content).map_err(|e| malformed(e.to_string()))?;

    let rows = value
        .as_array()
        .ok_or_else(|| malformed("顶层必须是数组".to_string()))?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let object = row
            .as_object()
            .ok_or_else(|| malformed(format!("第 {} 个元素不是对象", i + 1)))?;

        let record: Record = object
            .iter()
            .map(|(name, value)| (name.clone(), scalar_to_text(value)))
            .collect();
        records.push(record);
    }

    Ok(records)
}

fn scalar_to_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn preserves_key_order_and_nulls() {
        let json = r#"[{"zeta": "z", "alpha": null, "count": 3, "ok": true}]"#;
        let records = parse_json_records(json, "t.json").unwrap();
        let fields = records[0].fields();

        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "count", "ok"]);
        assert_eq!(fields[1].value, None);
        assert_eq!(fields[2].value.as_deref(), Some("3"));
        assert_eq!(fields[3].value.as_deref(), Some("true"));
    }

    #[test]
    fn non_array_is_malformed() {
        let err = parse_json_records(r#"{"a": 1}"#, "t.json").unwrap_err();
        assert!(matches!(
            err,
            AppError::File(FileError::MalformedRecords { .. })
        ));
    }
}
