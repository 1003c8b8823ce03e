//! 分块结果类型

use serde::Serialize;
use std::fmt;

/// 分块内摘要之间的分隔符
pub const DIGEST_SEPARATOR: &str = "\n---\n";

/// 一个连续的摘要分块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 在原始划分中的位置（从 0 开始）
    pub index: usize,
    pub digests: Vec<String>,
}

impl Chunk {
    /// 批次编号（从 1 开始，仅用于展示）
    pub fn batch_number(&self) -> usize {
        self.index + 1
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// 发送给模型的分块文本
    pub fn text(&self) -> String {
        self.digests.join(DIGEST_SEPARATOR)
    }
}

/// 报告生成模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportMode {
    /// 数据量不超过阈值，一次调用完成
    SinglePass,
    /// 并行分析各分块后再汇总
    MapReduce,
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportMode::SinglePass => write!(f, "single-pass"),
            ReportMode::MapReduce => write!(f, "map-reduce"),
        }
    }
}

/// 分块规划结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkPlan {
    /// 跳过 map 阶段，直接对全部摘要做汇总
    SinglePass { digests: Vec<String> },
    MapReduce { chunks: Vec<Chunk> },
}

impl ChunkPlan {
    pub fn mode(&self) -> ReportMode {
        match self {
            ChunkPlan::SinglePass { .. } => ReportMode::SinglePass,
            ChunkPlan::MapReduce { .. } => ReportMode::MapReduce,
        }
    }

    /// 逻辑分块数，单次模式视为 1
    pub fn chunk_count(&self) -> usize {
        match self {
            ChunkPlan::SinglePass { .. } => 1,
            ChunkPlan::MapReduce { chunks } => chunks.len(),
        }
    }
}
