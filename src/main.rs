#[tokio::main]
async fn main() -> pollbot::error::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("pollbot=info,serenity=warn"),
    )
    .init();
    log::info!("Starting pollbot Discord bot");

    match pollbot::run().await {
        Ok(_) => {
            log::info!("Bot shut down successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Bot encountered an error: {}", e);
            Err(e)
        }
    }
}
