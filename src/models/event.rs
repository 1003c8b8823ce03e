//! 任务事件
//!
//! 进度事件与最终结果使用带标签的枚举区分，不依赖内容长度推断类型

use serde::Serialize;
use std::fmt;

use crate::models::ReportMode;

/// 进度事件，仅供观察，不会进入最终报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ProgressEvent {
    /// 单次模式开始
    SinglePassStarted { records: usize, model: String },
    /// map 阶段开始
    MapStarted { chunks: usize },
    /// 某个分块已结束（成功或已隔离的失败），按实际完成顺序发出
    ChunkSettled {
        completed: usize,
        total: usize,
        chunk_index: usize,
        succeeded: bool,
    },
    /// 全部分块结束，开始汇总
    ReduceStarted { chunks: usize },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::SinglePassStarted { records, model } => {
                write!(f, "正在一次性分析全部 {} 条记录 (模型: {})...", records, model)
            }
            ProgressEvent::MapStarted { chunks } => {
                write!(f, "开始大规模数据分析: 共 {} 个批次并行处理...", chunks)
            }
            ProgressEvent::ChunkSettled {
                completed, total, ..
            } => write!(f, "进度: {}/{} 批次完成...", completed, total),
            ProgressEvent::ReduceStarted { .. } => {
                write!(f, "全部批次完成，正在生成最终报告...")
            }
        }
    }
}

/// 最终报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalReport {
    /// 清洗后的文档正文
    pub html: String,
    pub mode: ReportMode,
    pub chunk_count: usize,
    /// 被隔离的失败分块（chunk index）
    pub failed_chunks: Vec<usize>,
}

impl FinalReport {
    /// 清洗后没有任何结构化内容
    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }

    /// 是否有分块因失败而缺失内容
    pub fn is_degraded(&self) -> bool {
        !self.failed_chunks.is_empty()
    }
}

/// 任务流中的事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum JobEvent {
    Progress(ProgressEvent),
    Done(FinalReport),
}
