use tracing::{error, info};
use vote_verify::{BrowserConfig, BrowserSession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("Launching headless browser");
    let browser = BrowserSession::new(BrowserConfig::default()).await?;

    // Close the browser on both outcomes before propagating the result
    let outcome = vote_verify::verify::run(&browser).await;
    browser.close();

    match outcome {
        Ok(()) => {
            info!("Vote verification passed");
            Ok(())
        }
        Err(e) => {
            error!("Vote verification failed: {}", e);
            Err(e.into())
        }
    }
}
