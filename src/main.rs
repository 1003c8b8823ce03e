use anyhow::Result;
use patent_insight::utils::logging;
use patent_insight::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（REPORT_CONFIG 指向的 TOML 文件 + 环境变量）
    let mut config = Config::load()?;

    // 第一个参数可覆盖输入文件
    if let Some(input) = std::env::args().nth(1) {
        config.input_file = input;
    }

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
