use critterdex_backend::config;
use critterdex_backend::module::handler::CommandHandler;
use critterdex_backend::service::Session;

use anyhow::Result;
use tokio::io::{AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::read_config()?;

    // Initialize logging
    let _logging_guard = critterdex_backend::logging::init_logging(
        &config.log_dir,
        "critterdex",
        &config.log_level,
    )?;

    tracing::info!("Critterdex starting...");
    tracing::info!("Data directory: {}", config.data_dir);

    let session = Session::open(config).await?;
    let mut handler = CommandHandler::new(session);

    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"Type /help for commands, /quit to exit\n").await?;
    stdout.flush().await?;

    handler
        .serve(BufReader::new(tokio::io::stdin()), &mut stdout)
        .await?;

    tracing::info!("Critterdex stopped");
    Ok(())
}
