use anyhow::{Context, Result};
use netdev_core::config::{load_config_from_path, load_config_from_toml_str, AppConfig};
use netdev_core::factory::create_wifi_plugin;
use netdev_core::registry::CapabilityRegistry;
use netdev_core::shim::FallbackDispatcher;
use netdev_core::throttle::DiagnosticThrottle;
use std::path::PathBuf;

mod runner;

// 内置默认配置；第一个命令行参数可以指定另一个配置文件
const DEFAULT_CONFIG_TOML: &str = include_str!("../../configs/netdev.toml");

fn load_config() -> Result<AppConfig> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => load_config_from_path(&path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => load_config_from_toml_str(DEFAULT_CONFIG_TOML).context("Built-in config is invalid"),
    }
}

fn build_registry(config: &AppConfig) -> Result<CapabilityRegistry> {
    let mut builder = config.registry_builder()?;
    // 插件初始化：在第一次调用任何能力之前完成绑定
    if let Some(plugin) = create_wifi_plugin() {
        let bound = builder.install_plugin(plugin);
        tracing::info!("🔌 Wi-Fi plugin bound to {} device(s)", bound);
    }
    Ok(builder.build())
}

async fn run() -> Result<()> {
    let config = load_config()?;
    if !DiagnosticThrottle::init_global(config.diagnostics.mode) {
        tracing::warn!("Diagnostic throttle was already initialised; keeping its mode");
    }

    let registry = build_registry(&config)?;
    tracing::info!("🚀 Managing {} device(s)", registry.len());

    let dispatcher = FallbackDispatcher::new(&registry);
    let reports = runner::activate_devices(&dispatcher);
    tracing::info!("📋 Device status: {}", serde_json::to_string(&reports)?);

    tracing::info!("Daemon running (terminate with Ctrl+C)");
    tokio::signal::ctrl_c().await?;
    tracing::info!("🛑 Shutting down.");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. 初始化日志（这是入口点的职责）
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // 2. 处理顶层错误
    if let Err(e) = run().await {
        tracing::error!("❌ netdev-daemon failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
