//! 应用入口 - 编排层
//!
//! 1. **应用初始化**：校验配置、创建客户端池
//! 2. **加载记录**：读取输入文件（`Vec<Record>`）
//! 3. **运行任务**：消费事件流，进度写日志
//! 4. **写出报告**：最终报告写入输出文件
//! 5. **全局统计**：输出模式、批次数与失败批次

use anyhow::{Context, Result};
use futures::StreamExt;
use std::path::Path;
use tracing::{info, warn};

use crate::config::Config;
use crate::infrastructure::ClientPool;
use crate::models::{load_records, FinalReport, JobEvent, Record};
use crate::orchestrator::report_job::ReportJob;
use crate::services::ReportWriter;
use crate::utils::logging::{log_records_loaded, log_startup, print_final_stats};

/// 应用主结构
pub struct App {
    config: Config,
    pool: ClientPool,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate()?;
        log_startup(&config);

        let pool = ClientPool::from_config(&config)?;

        Ok(Self { config, pool })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let records = self.load_records().await?;

        if records.is_empty() {
            warn!("⚠️ 没有找到待分析的记录，程序结束");
            return Ok(());
        }

        log_records_loaded(records.len(), self.config.chunk_size);

        let report = self.generate(records).await?;

        if report.is_empty() {
            warn!("⚠️ 报告内容为空，请检查模型输出");
        }
        if report.is_degraded() {
            warn!(
                "⚠️ 有 {} 个批次分析失败，报告内容不完整",
                report.failed_chunks.len()
            );
        }

        ReportWriter::new(&self.config.output_file)
            .write(&report)
            .await?;

        print_final_stats(&report, &self.config.output_file);

        Ok(())
    }

    async fn load_records(&self) -> Result<Vec<Record>> {
        info!("\n📁 正在读取记录文件: {}", self.config.input_file);
        let records = load_records(Path::new(&self.config.input_file)).await?;
        Ok(records)
    }

    /// 消费任务事件流，返回最终报告
    async fn generate(&self, records: Vec<Record>) -> Result<FinalReport> {
        let job = ReportJob::from_config(self.pool.clone(), &self.config);
        let mut events = job.spawn(records);
        let mut report = None;

        while let Some(event) = events.next().await {
            match event? {
                JobEvent::Progress(progress) => info!("⏳ {}", progress),
                JobEvent::Done(done) => report = Some(done),
            }
        }

        report.context("任务结束但没有生成报告")
    }
}
