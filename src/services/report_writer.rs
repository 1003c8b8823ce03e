//! 报告写入服务 - 业务能力层
//!
//! 只负责把最终报告写到磁盘

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::error::FileError;
use crate::models::FinalReport;

/// 报告写入服务
pub struct ReportWriter {
    output_path: PathBuf,
}

impl ReportWriter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }

    /// 写入报告，文件头部带生成时间与处理模式
    pub async fn write(&self, report: &FinalReport) -> Result<(), FileError> {
        let content = render(report, chrono::Local::now());
        debug!(
            "写入报告: {} ({} 字符)",
            self.output_path.display(),
            content.chars().count()
        );

        fs::write(&self.output_path, content)
            .await
            .map_err(|source| FileError::WriteFailed {
                path: self.output_path.display().to_string(),
                source,
            })
    }
}

fn render<Tz: chrono::TimeZone>(report: &FinalReport, generated_at: chrono::DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut header = format!(
        "<!-- 生成时间: {} | 模式: {} | 批次数: {} -->\n",
        generated_at.format("%Y-%m-%d %H:%M:%S"),
        report.mode,
        report.chunk_count
    );
    if report.is_degraded() {
        let batches: Vec<String> = report
            .failed_chunks
            .iter()
            .map(|i| (i + 1).to_string())
            .collect();
        header.push_str(&format!("<!-- 分析失败的批次: {} -->\n", batches.join(", ")));
    }
    header + &report.html + "\n"
}
