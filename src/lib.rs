//! # Patent Insight
//!
//! 把大量表格记录交给生成模型并行分析，最终合成一份调查报告
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（API 凭证），只暴露能力
//! - `ClientPool` - 按分块索引轮询分配客户端
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个能力只做一件事
//! - `RecordCompressor` - 记录压缩为摘要
//! - `plan_chunks` - 摘要分块
//! - `LlmService` - 生成模型调用
//! - `RetryExecutor` - 频率限制退避重试
//! - `sanitize` - 输出清洗
//! - `ReportWriter` - 写报告文件
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个分块"的完整处理流程
//! - `ChunkTask` - 分块索引 + 分块文本 + 分配的客户端
//! - `ChunkFlow` - 请求 → 重试调用 → 结果或隔离的失败
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_runner` - map 阶段，全部分块并发
//! - `orchestrator/reducer` - reduce 阶段
//! - `orchestrator/report_job` - 完整任务与事件流
//! - `orchestrator/app` - 应用生命周期
//!
//! ## 错误处理策略
//!
//! - 频率限制在 `RetryExecutor` 内部重试
//! - map 阶段单个分块的终止性失败被隔离为错误标记文本，不影响其他分块
//! - 最终汇总调用（单次模式或 reduce 阶段）失败时整个任务失败

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, LlmError};
pub use infrastructure::ClientPool;
pub use models::{FinalReport, JobEvent, JobParams, ProgressEvent, Record};
pub use orchestrator::{App, ReportJob, ReportStream};
pub use services::{GenerationRequest, RetryPolicy, TextGenerator};
