use serde::{Deserialize, Serialize};

/// 单个字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    /// `None` 表示缺失值
    pub value: Option<String>,
}

impl Field {
    /// 缺失值与空字符串都视为空
    pub fn is_empty(&self) -> bool {
        self.value.as_deref().map_or(true, str::is_empty)
    }
}

/// 一条表格记录
///
/// 字段保持来源中的原始顺序，读取后不再修改
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<Field>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个有值字段
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: Some(value.into()),
        });
        self
    }

    /// 追加一个缺失字段
    pub fn with_missing(mut self, name: impl Into<String>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: None,
        });
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Option<String>)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| Field { name, value })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_field_order() {
        let record = Record::new()
            .with("b", "2")
            .with_missing("a")
            .with("c", "");
        let names: Vec<_> = record.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert!(!record.fields()[0].is_empty());
        assert!(record.fields()[1].is_empty());
        assert!(record.fields()[2].is_empty());
    }
}
