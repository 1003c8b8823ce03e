//! 重试执行器 - 业务能力层
//!
//! 包装单次外部调用：仅对频率限制类错误做指数退避重试，
//! 其他错误立即返回。退避使用 `tokio::time::sleep`，只挂起当前任务。

use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::services::llm_service::{GenerationRequest, TextGenerator};

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最多尝试次数（含第一次）
    pub max_attempts: u32,
    /// 第一次重试前的等待时间
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// 第 `attempt` 次失败（从 0 开始）之后的等待时间：`base_delay * 2^attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// 重试执行器
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// 通过指定客户端发起调用
    ///
    /// 连续 `max_attempts` 次被限流后返回 [`LlmError::RetryExhausted`]，
    /// 其中带有最后一次错误的描述
    pub async fn call(
        &self,
        client: &dyn TextGenerator,
        request: &GenerationRequest,
    ) -> Result<String, LlmError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..max_attempts {
            match client.generate(request).await {
                Ok(text) => {
                    if attempt > 0 {
                        debug!("第 {} 次尝试成功 (模型: {})", attempt + 1, client.model_name());
                    }
                    return Ok(text);
                }
                Err(e) if e.is_retryable() => {
                    if attempt + 1 < max_attempts {
                        let delay = self.policy.delay_for(attempt);
                        warn!(
                            "⏳ 请求被限流 (尝试 {}/{}), 等待 {:?} 后重试: {}",
                            attempt + 1,
                            max_attempts,
                            delay,
                            e
                        );
                        sleep(delay).await;
                    }
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(LlmError::RetryExhausted {
            attempts: max_attempts,
            last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }
}
