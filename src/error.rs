use thiserror::Error;

use crate::models::ReportMode;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 最终汇总调用失败（单次模式或 map-reduce 的 reduce 阶段）
    #[error("最终报告生成失败 ({mode}): {source}")]
    ReduceFailed {
        mode: ReportMode,
        #[source]
        source: LlmError,
    },
    /// 文件错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// LLM 服务错误
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// 请求频率限制 / 资源耗尽，可重试
    #[error("请求频率限制 (模型: {model}): {message}")]
    RateLimited { model: String, message: String },
    /// API 调用失败，不可重试
    #[error("LLM API调用失败 (模型: {model}): {message}")]
    ApiCallFailed { model: String, message: String },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 请求构建失败
    #[error("请求构建失败: {0}")]
    RequestBuildFailed(String),
    /// 任务在完成前中止（panic 或被取消）
    #[error("任务执行中止: {reason}")]
    TaskAborted { reason: String },
    /// 多次频率限制后放弃
    #[error("已重试 {attempts} 次仍被限流: {last_error}")]
    RetryExhausted { attempts: u32, last_error: String },
}

impl LlmError {
    /// 只有频率限制类错误才允许重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("不支持的文件格式: {path}")]
    UnsupportedFormat { path: String },
    #[error("记录格式错误 ({path}): {reason}")]
    MalformedRecords { path: String, reason: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("未找到任何 API 密钥")]
    NoApiKeys,
    #[error("配置项 {field} 无效: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("配置文件解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建汇总阶段错误
    pub fn reduce_failed(mode: ReportMode, source: LlmError) -> Self {
        AppError::ReduceFailed { mode, source }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rate_limits_are_retryable() {
        let limited = LlmError::RateLimited {
            model: "m".into(),
            message: "429".into(),
        };
        let failed = LlmError::ApiCallFailed {
            model: "m".into(),
            message: "400 bad request".into(),
        };
        assert!(limited.is_retryable());
        assert!(!failed.is_retryable());
        assert!(!LlmError::EmptyContent { model: "m".into() }.is_retryable());
        assert!(!LlmError::RetryExhausted {
            attempts: 3,
            last_error: "429".into()
        }
        .is_retryable());
    }

    #[test]
    fn reduce_failure_names_the_mode() {
        let err = AppError::reduce_failed(
            ReportMode::MapReduce,
            LlmError::RetryExhausted {
                attempts: 3,
                last_error: "RESOURCE_EXHAUSTED".into(),
            },
        );
        let text = err.to_string();
        assert!(text.contains("map-reduce"));
        assert!(text.contains("RESOURCE_EXHAUSTED"));
    }
}
