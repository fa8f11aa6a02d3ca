#[tokio::main]
async fn main() -> snowbot::error::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("snowbot=info,serenity=warn"),
    )
    .init();
    log::info!("Starting snowbot Discord bot");

    match snowbot::run().await {
        Ok(()) => {
            log::info!("Bot shut down successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Bot encountered an error: {e}");
            Err(e)
        }
    }
}
