//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_runner` - map 阶段
//! - 每个分块一个任务，全部并发
//! - 单个分块失败被隔离
//! - 结果按分块索引排列
//!
//! ### `reducer` - reduce 阶段
//! - 单次模式直接基于摘要，map-reduce 模式基于中间报告
//! - 失败直接返回
//!
//! ### `report_job` - 完整任务
//! - 压缩 → 分块 → map → reduce → 清洗
//! - 对外暴露事件流
//!
//! ### `app` - 应用生命周期
//! - 加载配置与记录、运行任务、写出报告、输出统计
//!
//! ## 层次关系
//!
//! ```text
//! app
//!     ↓
//! report_job (处理 Vec<Record>)
//!     ↓
//! batch_runner (处理 Vec<Chunk>) → reducer
//!     ↓
//! workflow::ChunkFlow (处理单个 Chunk)
//!     ↓
//! services (能力层：compress / plan / retry / llm / sanitize)
//!     ↓
//! infrastructure (基础设施：ClientPool)
//! ```

pub mod app;
pub mod batch_runner;
pub mod reducer;
pub mod report_job;

pub use app::App;
pub use batch_runner::{BatchResult, BatchResults, BatchRunner};
pub use reducer::{ReduceInput, Reducer};
pub use report_job::{ReportJob, ReportStream};
