//! 分块规划 - 业务能力层

use crate::models::{Chunk, ChunkPlan};

/// 把有序摘要序列划分为固定大小的分块
///
/// 数量不超过 `chunk_size` 时进入单次模式；否则按原顺序切成
/// `ceil(N / chunk_size)` 块，只有最后一块可能更小。
/// `chunk_size` 为 0 时按 1 处理，配置校验会提前拒绝这种值。
pub fn plan_chunks(digests: Vec<String>, chunk_size: usize) -> ChunkPlan {
    let chunk_size = chunk_size.max(1);

    if digests.len() <= chunk_size {
        return ChunkPlan::SinglePass { digests };
    }

    let chunks = digests
        .chunks(chunk_size)
        .enumerate()
        .map(|(index, slice)| Chunk {
            index,
            digests: slice.to_vec(),
        })
        .collect();

    ChunkPlan::MapReduce { chunks }
}
