//! 分块分析流程 - 流程层
//!
//! 定义"一个分块"的处理流程：构建请求 → 带重试调用 → 结果或隔离的失败。
//! 失败不会向上传播，整个任务继续进行。

use tracing::{info, warn};

use crate::error::LlmError;
use crate::models::JobParams;
use crate::services::{prompt, RetryExecutor};
use crate::workflow::ChunkTask;

/// 单个分块的处理结果
#[derive(Debug, Clone)]
pub enum ChunkOutcome {
    /// 模型返回的中间报告
    Analyzed(String),
    /// 终止性失败，已被隔离
    Failed(LlmError),
}

impl ChunkOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ChunkOutcome::Analyzed(_))
    }

    /// 交给汇总阶段的文本，失败时为带批次编号的错误标记
    pub fn report_text(&self, batch_number: usize) -> String {
        match self {
            ChunkOutcome::Analyzed(text) => text.clone(),
            ChunkOutcome::Failed(e) => format!("[批次 {} 分析失败: {}]", batch_number, e),
        }
    }
}

/// 分块分析流程
///
/// 不持有客户端，客户端随任务传入
pub struct ChunkFlow {
    retry: RetryExecutor,
    params: JobParams,
}

impl ChunkFlow {
    pub fn new(retry: RetryExecutor, params: JobParams) -> Self {
        Self { retry, params }
    }

    pub async fn run(&self, task: &ChunkTask) -> ChunkOutcome {
        let request = prompt::chunk_analysis(
            &self.params,
            &task.text,
            task.batch_number(),
            task.total_chunks,
        );

        match self.retry.call(task.client.as_ref(), &request).await {
            Ok(text) => {
                info!("{} ✓ 分析完成 ({} 字符)", task, text.chars().count());
                ChunkOutcome::Analyzed(text)
            }
            Err(e) => {
                warn!("{} ⚠️ 分析失败，已隔离: {}", task, e);
                ChunkOutcome::Failed(e)
            }
        }
    }
}
