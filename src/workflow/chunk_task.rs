//! 分块任务
//!
//! 封装"我正在处理第几个分块、用哪个客户端"这一信息

use std::fmt::{self, Display};
use std::sync::Arc;

use crate::infrastructure::ClientPool;
use crate::models::Chunk;
use crate::services::TextGenerator;

/// 一个分块对应一个任务
#[derive(Clone)]
pub struct ChunkTask {
    /// 分块索引（从 0 开始）
    pub chunk_index: usize,
    pub total_chunks: usize,
    /// 发送给模型的分块文本
    pub text: String,
    /// 由客户端池按索引分配
    pub client: Arc<dyn TextGenerator>,
}

impl ChunkTask {
    pub fn new(chunk: &Chunk, total_chunks: usize, pool: &ClientPool) -> Self {
        Self {
            chunk_index: chunk.index,
            total_chunks,
            text: chunk.text(),
            client: pool.assign(chunk.index),
        }
    }

    /// 批次编号（从 1 开始）
    pub fn batch_number(&self) -> usize {
        self.chunk_index + 1
    }
}

impl Display for ChunkTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[批次 {}/{}]", self.batch_number(), self.total_chunks)
    }
}

impl fmt::Debug for ChunkTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkTask")
            .field("chunk_index", &self.chunk_index)
            .field("total_chunks", &self.total_chunks)
            .field("text_chars", &self.text.chars().count())
            .field("model", &self.client.model_name())
            .finish()
    }
}
