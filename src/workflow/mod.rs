pub mod chunk_flow;
pub mod chunk_task;

pub use chunk_flow::{ChunkFlow, ChunkOutcome};
pub use chunk_task::ChunkTask;
