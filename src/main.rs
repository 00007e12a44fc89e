mod common;
mod events;
mod http_client;
mod model;
mod upstream;
mod viewer;

use std::num::NonZeroUsize;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use events::{EventPipeline, PipelineOptions};
use model::config::Config;
use upstream::HttpEventSource;
use viewer::{ViewerState, create_viewer_router};

/// 案件事件查看服务
#[derive(Parser, Debug)]
#[command(name = "event-viewer", version, about)]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 监听地址（覆盖配置文件）
    #[arg(long)]
    host: Option<String>,

    /// 监听端口（覆盖配置文件）
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    // .env 中可设置 RUST_LOG
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        tracing::error!("服务启动失败: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config_path = args
        .config
        .unwrap_or_else(|| Config::default_config_path().to_string());
    let mut config = Config::load(&config_path)?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.validate().context("配置校验失败")?;
    if let Some(path) = config.config_path() {
        tracing::info!("已加载配置: {}", path.display());
    }

    let client = http_client::build_client(&config)?;
    let source = HttpEventSource::from_config(client, &config);
    tracing::info!("元数据服务: {}", config.meta_url_template);
    tracing::info!("详情服务: {}", config.detail_url_template);

    let options = PipelineOptions {
        batch_size: NonZeroUsize::new(config.batch_size).context("batchSize 必须大于 0")?,
        max_in_flight: config.detail_concurrency.and_then(NonZeroUsize::new),
    };
    let pipeline = EventPipeline::new(Arc::new(source), options);
    let app = create_viewer_router(ViewerState::new(pipeline, config.default_env.clone()));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("绑定地址失败: {}", addr))?;
    tracing::info!("服务已启动: http://{}/view/<caseId>?env={}", addr, config.default_env);

    axum::serve(listener, app).await?;
    Ok(())
}
