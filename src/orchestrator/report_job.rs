//! 报告任务 - 编排层
//!
//! 记录 → 摘要 → 分块 → (map) → 汇总 → 清洗，整个过程以事件流的形式对外暴露：
//! 若干 `Progress` 之后是一个 `Done`，或者一个终止性的错误。

use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::ClientPool;
use crate::models::{ChunkPlan, FinalReport, JobEvent, JobParams, ProgressEvent, Record, ReportMode};
use crate::orchestrator::batch_runner::BatchRunner;
use crate::orchestrator::reducer::{ReduceInput, Reducer};
use crate::services::{plan_chunks, sanitize, RecordCompressor, RetryExecutor, RetryPolicy};
use crate::workflow::ChunkFlow;

/// 报告任务
pub struct ReportJob {
    pool: ClientPool,
    compressor: RecordCompressor,
    chunk_size: usize,
    runner: BatchRunner,
    reducer: Reducer,
}

impl ReportJob {
    pub fn new(
        pool: ClientPool,
        chunk_size: usize,
        retry_policy: RetryPolicy,
        params: JobParams,
    ) -> Self {
        let retry = RetryExecutor::new(retry_policy);
        Self {
            runner: BatchRunner::new(pool.clone(), ChunkFlow::new(retry, params.clone())),
            reducer: Reducer::new(retry, params),
            compressor: RecordCompressor::default(),
            chunk_size,
            pool,
        }
    }

    pub fn from_config(pool: ClientPool, config: &Config) -> Self {
        Self::new(
            pool,
            config.chunk_size,
            config.retry_policy(),
            config.job_params(),
        )
    }

    /// 执行任务，进度通过 `on_progress` 上报
    pub async fn run(
        &self,
        records: &[Record],
        mut on_progress: impl FnMut(ProgressEvent),
    ) -> AppResult<FinalReport> {
        let digests = self.compressor.compress_all(records);
        debug!("已压缩 {} 条记录", digests.len());

        let primary = self.pool.primary();

        let (raw, mode, chunk_count, failed_chunks) = match plan_chunks(digests, self.chunk_size) {
            ChunkPlan::SinglePass { digests } => {
                on_progress(ProgressEvent::SinglePassStarted {
                    records: records.len(),
                    model: primary.model_name().to_string(),
                });
                let raw = self
                    .reducer
                    .reduce(primary.as_ref(), ReduceInput::Digests(&digests))
                    .await?;
                (raw, ReportMode::SinglePass, 1, Vec::new())
            }
            ChunkPlan::MapReduce { chunks } => {
                let chunk_count = chunks.len();
                on_progress(ProgressEvent::MapStarted {
                    chunks: chunk_count,
                });

                let results = self.runner.run(&chunks, &mut on_progress).await;

                on_progress(ProgressEvent::ReduceStarted {
                    chunks: chunk_count,
                });
                let raw = self
                    .reducer
                    .reduce(primary.as_ref(), ReduceInput::BatchReports(&results))
                    .await?;
                (raw, ReportMode::MapReduce, chunk_count, results.failed_indices())
            }
        };

        let html = sanitize(&raw);
        if html.is_empty() {
            warn!("⚠️ 模型输出中没有找到可用的文档内容");
        }
        info!("✓ 最终报告生成完成 ({} 字符)", html.chars().count());

        Ok(FinalReport {
            html,
            mode,
            chunk_count,
            failed_chunks,
        })
    }

    /// 在后台执行任务，返回事件流
    pub fn spawn(self, records: Vec<Record>) -> ReportStream {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let progress_tx = tx.clone();
            let result = self
                .run(&records, |event| {
                    let _ = progress_tx.send(Ok(JobEvent::Progress(event)));
                })
                .await;
            let _ = tx.send(result.map(JobEvent::Done));
        });

        ReportStream { rx }
    }
}

/// 任务事件流，最后一项为 `Ok(JobEvent::Done)` 或 `Err`
pub struct ReportStream {
    rx: mpsc::UnboundedReceiver<AppResult<JobEvent>>,
}

impl Stream for ReportStream {
    type Item = AppResult<JobEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, task};

    #[test]
    fn stream_waits_for_events_and_ends_with_sender() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut stream = task::spawn(ReportStream { rx });

        assert_pending!(stream.poll_next());

        tx.send(Ok(JobEvent::Progress(ProgressEvent::MapStarted { chunks: 2 })))
            .unwrap();
        assert!(stream.is_woken());
        assert!(matches!(
            stream.poll_next(),
            Poll::Ready(Some(Ok(JobEvent::Progress(ProgressEvent::MapStarted { chunks: 2 }))))
        ));

        drop(tx);
        assert!(matches!(stream.poll_next(), Poll::Ready(None)));
    }
}
