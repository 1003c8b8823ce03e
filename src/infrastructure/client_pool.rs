//! 客户端池 - 基础设施层
//!
//! 持有全部凭证对应的客户端，只暴露"按分块取客户端"能力

use std::sync::Arc;

use crate::config::Config;
use crate::error::ConfigError;
use crate::services::{LlmService, TextGenerator};

/// 有序、不可变的客户端列表
///
/// 分配是分块索引与池大小的纯函数，没有共享的轮转游标
#[derive(Clone)]
pub struct ClientPool {
    clients: Arc<[Arc<dyn TextGenerator>]>,
}

impl ClientPool {
    /// 至少需要一个客户端
    pub fn new(clients: Vec<Arc<dyn TextGenerator>>) -> Result<Self, ConfigError> {
        if clients.is_empty() {
            return Err(ConfigError::NoApiKeys);
        }
        Ok(Self {
            clients: clients.into(),
        })
    }

    /// 为配置中的每个 API 密钥创建一个 [`LlmService`]
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let clients = config
            .llm_api_keys
            .iter()
            .map(|key| Arc::new(LlmService::with_api_key(config, key)) as Arc<dyn TextGenerator>)
            .collect();
        Self::new(clients)
    }

    /// `pool[chunk_index mod pool_size]`
    pub fn assign(&self, chunk_index: usize) -> Arc<dyn TextGenerator> {
        Arc::clone(&self.clients[chunk_index % self.clients.len()])
    }

    /// 汇总调用固定使用第一个客户端
    pub fn primary(&self) -> Arc<dyn TextGenerator> {
        self.assign(0)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
