//! 日志工具模块
//!
//! 提供日志初始化与格式化输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::FinalReport;

/// 初始化日志
///
/// `RUST_LOG` 优先；否则默认 `info`，开启详细日志时为 `debug`
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 专利调查报告生成");
    info!("🤖 模型: {}", config.llm_model_name);
    info!("🔑 已识别 {} 个 API 密钥", config.llm_api_keys.len());
    info!("📦 分块大小: {}", config.chunk_size);
    info!("{}", "=".repeat(60));
}

/// 记录记录文件加载信息
pub fn log_records_loaded(total: usize, chunk_size: usize) {
    info!("✓ 找到 {} 条待分析的记录", total);
    if total > chunk_size {
        info!(
            "📋 将以每批 {} 条的方式并行处理，共 {} 批",
            chunk_size,
            total.div_ceil(chunk_size)
        );
    } else {
        info!("📋 数据量未超过 {} 条，一次性分析", chunk_size);
    }
}

/// 打印最终统计信息
pub fn print_final_stats(report: &FinalReport, output_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 报告生成完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("模式: {} | 批次数: {}", report.mode, report.chunk_count);
    info!(
        "✅ 成功批次: {}/{}",
        report.chunk_count.saturating_sub(report.failed_chunks.len()),
        report.chunk_count
    );
    info!("❌ 失败批次: {}", report.failed_chunks.len());
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", output_path);
}
