use anyhow::anyhow;
use gatecast::{config, logger, server, Secrets};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load_config(None)?;
    logger::init_logging(&config.logging.level);

    let secrets = Secrets::from_env();

    server::serve(config, secrets)
        .await
        .map_err(|e| anyhow!("网关启动失败: {}", e))
}
