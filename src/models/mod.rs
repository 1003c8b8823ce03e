//! 数据模型
//!
//! 记录、分块、任务参数、进度事件与最终报告

pub mod chunk;
pub mod event;
pub mod loaders;
pub mod params;
pub mod record;

pub use chunk::{Chunk, ChunkPlan, ReportMode, DIGEST_SEPARATOR};
pub use event::{FinalReport, JobEvent, ProgressEvent};
pub use loaders::load_records;
pub use params::JobParams;
pub use record::{Field, Record};
