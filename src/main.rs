use chore_alloc::core::ConfigProvider;
use chore_alloc::utils::{logger, validation::Validate};
use chore_alloc::{start_server, CliConfig, TomlConfig};
use anyhow::Context;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match cli.config.clone() {
        Some(path) => {
            let config = match TomlConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load {}: {}", path.display(), e);
                    std::process::exit(1);
                }
            };
            run(config, cli.verbose).await
        }
        None => {
            let verbose = cli.verbose;
            run(cli, verbose).await
        }
    }
}

async fn run<C: ConfigProvider + Validate + std::fmt::Debug>(
    config: C,
    verbose: bool,
) -> anyhow::Result<()> {
    // 初始化日誌
    logger::init_logger(config.environment(), verbose);

    tracing::info!("Starting chore-alloc ({})", config.environment());
    if verbose {
        tracing::debug!("Config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    start_server(&config)
        .await
        .inspect_err(|e| tracing::error!("❌ Server failed: {}", e))
        .context("chore-alloc server stopped with an error")?;

    Ok(())
}
