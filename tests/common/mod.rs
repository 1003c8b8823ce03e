#![allow(dead_code)]

use async_trait::async_trait;
use patent_insight::{ClientPool, GenerationRequest, LlmError, Record, TextGenerator};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 脚本化的回复
pub struct Reply {
    pub delay: Duration,
    pub result: Result<String, LlmError>,
}

impl Reply {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(text.into()),
        }
    }

    pub fn after(delay: Duration, text: impl Into<String>) -> Self {
        Self {
            delay,
            result: Ok(text.into()),
        }
    }

    pub fn rate_limited() -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(LlmError::RateLimited {
                model: "fake".into(),
                message: "429 RESOURCE_EXHAUSTED".into(),
            }),
        }
    }
}

type Handler = dyn Fn(&GenerationRequest) -> Reply + Send + Sync;

/// 按请求内容决定回复的假客户端，记录收到的全部请求
pub struct FakeGenerator {
    name: String,
    handler: Box<Handler>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl FakeGenerator {
    pub fn new(
        name: impl Into<String>,
        handler: impl Fn(&GenerationRequest) -> Reply + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// 该客户端处理过的分块批次编号（按调用顺序）
    pub fn served_batches(&self) -> Vec<usize> {
        self.requests()
            .iter()
            .filter_map(|r| batch_number(&r.user))
            .collect()
    }

    pub fn synthesis_requests(&self) -> Vec<GenerationRequest> {
        self.requests()
            .into_iter()
            .filter(|r| is_synthesis(&r.user))
            .collect()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    fn model_name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = (self.handler)(request);
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result
    }
}

pub fn pool_of(clients: &[Arc<FakeGenerator>]) -> ClientPool {
    ClientPool::new(
        clients
            .iter()
            .map(|c| Arc::clone(c) as Arc<dyn TextGenerator>)
            .collect(),
    )
    .unwrap()
}

/// 分块分析请求中的 "Batch n/N" 编号
pub fn batch_number(prompt: &str) -> Option<usize> {
    prompt.match_indices("Batch ").find_map(|(pos, _)| {
        let rest = &prompt[pos + "Batch ".len()..];
        let (number, _) = rest.split_once('/')?;
        number.parse().ok()
    })
}

pub fn is_synthesis(prompt: &str) -> bool {
    prompt.contains("中间报告集合")
}

pub fn is_single_pass(prompt: &str) -> bool {
    prompt.contains("专利列表")
}

pub fn records(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            Record::new()
                .with("color", "blue")
                .with("title", format!("专利 {}", i))
                .with("applicant", "ACME")
        })
        .collect()
}
