use serde::{Deserialize, Serialize};

/// 用户输入的自由文本参数
///
/// 原样注入每一次请求，不做解析
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobParams {
    /// 着目关键词
    pub focus: String,
    /// 排除条件
    pub exclude: String,
}

impl JobParams {
    pub fn new(focus: impl Into<String>, exclude: impl Into<String>) -> Self {
        Self {
            focus: focus.into(),
            exclude: exclude.into(),
        }
    }
}
