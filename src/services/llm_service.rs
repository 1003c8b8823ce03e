//! LLM 服务 - 业务能力层
//!
//! 只负责"调用一次生成模型"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Gemini 的 OpenAI 兼容端点）

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoff;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::LlmError;

/// 一次生成请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system: Option<String>,
    pub user: String,
}

impl GenerationRequest {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// 生成能力
///
/// 实现必须可以被多个并发任务同时调用
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn model_name(&self) -> &str;

    /// 频率限制必须映射为 [`LlmError::RateLimited`]，其余错误不可重试
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError>;
}

/// 按类型 / 代码识别的频率限制错误
const RATE_LIMIT_LABELS: &[&str] = &[
    "rate_limit_error",
    "rate_limit_exceeded",
    "requests",
    "tokens",
    "resource_exhausted",
    "too_many_requests",
    "429",
];

/// 错误描述中作为状态码出现的 429
const STATUS_429_PATTERN: &str = r"(?i)\b(?:code|status|http)\W{0,3}429\b";

/// LLM 服务，绑定一个 API 密钥
///
/// 每次 `generate` 只发出一次 HTTP 请求，重试统一交给 `RetryExecutor`
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
}

impl LlmService {
    /// 使用指定密钥创建服务
    pub fn with_api_key(config: &Config, api_key: &str) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config).with_backoff(single_attempt()),
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
        }
    }

    fn build_request(
        &self,
        request: &GenerationRequest,
    ) -> Result<async_openai::types::chat::CreateChatCompletionRequest, LlmError> {
        let build_failed = |e: async_openai::error::OpenAIError| {
            LlmError::RequestBuildFailed(e.to_string())
        };

        let mut messages = Vec::new();

        if let Some(sys_msg) = &request.system {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg.as_str())
                .build()
                .map_err(build_failed)?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(request.user.as_str())
            .build()
            .map_err(build_failed)?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(build_failed)
    }

    fn classify_error(&self, error: &OpenAIError) -> LlmError {
        let rate_limited = match error {
            OpenAIError::ApiError(api_error) => {
                classify_api_error(api_error).unwrap_or_else(|| is_rate_limit_signal(&api_error.message))
            }
            other => is_rate_limit_signal(&other.to_string()),
        };

        let message = error.to_string();
        if rate_limited {
            LlmError::RateLimited {
                model: self.model_name.clone(),
                message,
            }
        } else {
            LlmError::ApiCallFailed {
                model: self.model_name.clone(),
                message,
            }
        }
    }
}

#[async_trait]
impl TextGenerator for LlmService {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", request.user.chars().count());

        let chat_request = self.build_request(request)?;

        let response = self.client.chat().create(chat_request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            self.classify_error(&e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}

/// 关闭 async-openai 内置的退避重试
fn single_attempt() -> ExponentialBackoff {
    ExponentialBackoff {
        max_elapsed_time: Some(Duration::ZERO),
        ..Default::default()
    }
}

/// 先看错误的类型与代码；两者都无法判断时返回 `None`
fn classify_api_error(api_error: &ApiError) -> Option<bool> {
    let labels: Vec<String> = [&api_error.r#type, &api_error.code]
        .into_iter()
        .flatten()
        .map(|label| label.to_ascii_lowercase())
        .collect();

    if labels.iter().any(|l| l == "insufficient_quota") {
        return Some(false);
    }
    if labels.iter().any(|l| RATE_LIMIT_LABELS.contains(&l.as_str())) {
        return Some(true);
    }
    None
}

/// 判断错误描述是否为频率限制 / 资源耗尽
pub fn is_rate_limit_signal(message: &str) -> bool {
    let lowered = message.to_lowercase();
    let named = ["resource_exhausted", "rate limit", "rate_limit", "too many requests"]
        .iter()
        .any(|marker| lowered.contains(marker));

    named
        || Regex::new(STATUS_429_PATTERN)
            .map(|re| re.is_match(message))
            .unwrap_or(false)
}
