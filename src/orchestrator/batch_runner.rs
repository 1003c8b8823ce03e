//! 批处理执行器 - 编排层（map 阶段）
//!
//! ## 职责
//!
//! 1. **创建任务**：每个分块一个任务，客户端按索引轮询分配
//! 2. **全部并发**：所有任务同时启动，不额外限流
//! 3. **失败隔离**：单个分块失败只影响该分块的结果
//! 4. **完成顺序上报**：每个任务结束时发出一次进度事件
//! 5. **索引顺序输出**：结果按分块索引排列，与完成顺序无关
//!
//! 全部任务结束之前 `run` 不会返回，汇总阶段因此天然位于屏障之后。

use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::LlmError;
use crate::infrastructure::ClientPool;
use crate::models::{Chunk, ProgressEvent};
use crate::workflow::{ChunkFlow, ChunkOutcome, ChunkTask};

/// 单个分块的最终结果
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub chunk_index: usize,
    pub outcome: ChunkOutcome,
}

impl BatchResult {
    pub fn batch_number(&self) -> usize {
        self.chunk_index + 1
    }
}

/// 按分块索引升序排列的全部结果
#[derive(Debug, Clone, Default)]
pub struct BatchResults {
    results: Vec<BatchResult>,
}

impl BatchResults {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BatchResult> {
        self.results.iter()
    }

    /// 失败分块的索引
    pub fn failed_indices(&self) -> Vec<usize> {
        self.results
            .iter()
            .filter(|r| !r.outcome.is_success())
            .map(|r| r.chunk_index)
            .collect()
    }

    /// 交给汇总阶段的文本：按索引顺序，每段带 1 起始的批次编号
    pub fn combined_text(&self) -> String {
        self.results
            .iter()
            .map(|r| {
                format!(
                    "--- Batch {} Report ---\n{}",
                    r.batch_number(),
                    r.outcome.report_text(r.batch_number())
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// 批处理执行器
pub struct BatchRunner {
    pool: ClientPool,
    flow: Arc<ChunkFlow>,
}

impl BatchRunner {
    pub fn new(pool: ClientPool, flow: ChunkFlow) -> Self {
        Self {
            pool,
            flow: Arc::new(flow),
        }
    }

    /// 并发处理全部分块
    ///
    /// `on_progress` 按实际完成顺序被调用，每个分块一次
    pub async fn run(
        &self,
        chunks: &[Chunk],
        mut on_progress: impl FnMut(ProgressEvent),
    ) -> BatchResults {
        let total = chunks.len();
        let tasks: Vec<ChunkTask> = chunks
            .iter()
            .map(|chunk| ChunkTask::new(chunk, total, &self.pool))
            .collect();

        info!("📦 启动 {} 个分块任务 (客户端数: {})", total, self.pool.len());

        // 为每个分块创建并发任务
        let mut pending = FuturesUnordered::new();
        for (slot, task) in tasks.iter().enumerate() {
            let flow = Arc::clone(&self.flow);
            let task = task.clone();
            let handle = tokio::spawn(async move { flow.run(&task).await });
            pending.push(handle.map(move |joined| (slot, joined)));
        }

        // 每个槽位只由对应任务写入一次
        let mut slots: Vec<Option<ChunkOutcome>> = (0..total).map(|_| None).collect();
        let mut completed = 0;

        while let Some((slot, joined)) = pending.next().await {
            let outcome = joined.unwrap_or_else(|e| {
                error!("{} 任务执行失败: {}", tasks[slot], e);
                ChunkOutcome::Failed(LlmError::TaskAborted {
                    reason: e.to_string(),
                })
            });

            completed += 1;
            on_progress(ProgressEvent::ChunkSettled {
                completed,
                total,
                chunk_index: tasks[slot].chunk_index,
                succeeded: outcome.is_success(),
            });
            slots[slot] = Some(outcome);
        }

        let results: Vec<BatchResult> = slots
            .into_iter()
            .zip(&tasks)
            .filter_map(|(outcome, task)| {
                outcome.map(|outcome| BatchResult {
                    chunk_index: task.chunk_index,
                    outcome,
                })
            })
            .collect();

        let failed = results.iter().filter(|r| !r.outcome.is_success()).count();
        if failed > 0 {
            warn!("⚠️ {}/{} 个分块分析失败，报告将缺少这些批次的内容", failed, total);
        }

        BatchResults { results }
    }
}
