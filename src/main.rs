use anyhow::Result;
use character_batch::logging::init_logging;
use character_batch::{run, Config, FixedInterval, GeminiGenerator};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // a missing .env is normal
    let _ = dotenvy::dotenv();
    init_logging();

    let config = Config::from_env().inspect_err(|err| error!("{err}"))?;

    info!("--- Starting batch image generation with character reference ---");

    let generator = GeminiGenerator::from_config(&config).inspect_err(|err| {
        error!("Error configuring API or model: {err}");
        error!("Please check your GOOGLE_API_KEY and model name.");
    })?;
    let limiter = FixedInterval::new(config.request_interval);

    let summary = run(&config, &generator, &limiter)
        .await
        .inspect_err(|err| error!("{err}"))?;

    info!("--- BATCH PROCESS COMPLETE ---");
    info!(
        "Processed {} prompts ({} saved, {} without image, {} failed). Images are in '{}'.",
        summary.total(),
        summary.saved(),
        summary.no_image(),
        summary.failed(),
        summary.output_dir.display()
    );
    Ok(())
}
