use bloomsky::config::{AppConfig, CONFIG_FILE};
use env_logger::{Builder, WriteStyle};
use log::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first (without logging)
    let config = AppConfig::load_or_init(CONFIG_FILE)?;

    // Initialise logger with a configured log level
    Builder::new()
        .filter_level(config.get_log_level())
        .write_style(WriteStyle::Always)
        .format_timestamp_secs()
        .init();

    if let Err(e) = bloomsky::run(config).await {
        error!("Application error: {}", e);
        return Err(e);
    }
    Ok(())
}
