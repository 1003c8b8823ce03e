//! 汇总器 - 编排层（reduce 阶段）
//!
//! 一次带重试的调用生成最终报告原文。这里的失败不做隔离，直接返回给调用方。

use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::models::{JobParams, ReportMode, DIGEST_SEPARATOR};
use crate::orchestrator::batch_runner::BatchResults;
use crate::services::{prompt, GenerationRequest, RetryExecutor, TextGenerator};

/// 汇总输入
pub enum ReduceInput<'a> {
    /// 单次模式：全部摘要
    Digests(&'a [String]),
    /// map-reduce 模式：各批次中间报告
    BatchReports(&'a BatchResults),
}

impl ReduceInput<'_> {
    pub fn mode(&self) -> ReportMode {
        match self {
            ReduceInput::Digests(_) => ReportMode::SinglePass,
            ReduceInput::BatchReports(_) => ReportMode::MapReduce,
        }
    }
}

pub struct Reducer {
    retry: RetryExecutor,
    params: JobParams,
}

impl Reducer {
    pub fn new(retry: RetryExecutor, params: JobParams) -> Self {
        Self { retry, params }
    }

    pub fn build_request(&self, input: &ReduceInput<'_>) -> GenerationRequest {
        match input {
            ReduceInput::Digests(digests) => {
                prompt::single_pass_report(&self.params, &digests.join(DIGEST_SEPARATOR))
            }
            ReduceInput::BatchReports(results) => {
                prompt::synthesis_report(&self.params, &results.combined_text())
            }
        }
    }

    /// 返回模型原始输出，由调用方清洗
    pub async fn reduce(
        &self,
        client: &dyn TextGenerator,
        input: ReduceInput<'_>,
    ) -> AppResult<String> {
        let mode = input.mode();
        let request = self.build_request(&input);

        info!("📝 正在生成最终报告 ({}, 模型: {})", mode, client.model_name());

        self.retry.call(client, &request).await.map_err(|e| {
            error!("❌ 最终报告生成失败: {}", e);
            AppError::reduce_failed(mode, e)
        })
    }
}
