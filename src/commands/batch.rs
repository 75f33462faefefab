use std::path::Path;

use tracing::{error, info, warn};

use crate::commands::generate::generate_for_prompt;
use crate::commands::prompts::prompt_preview;
use crate::config::Config;
use crate::error::StartupError;
use crate::fs_utils::{ensure_output_dir, read_prompt_file};
use crate::generator::ImageGenerator;
use crate::models::{BatchSummary, PromptEntry, PromptOutcome, PromptReport};
use crate::rate_limit::RateLimiter;
use crate::reference::ReferenceImages;

/// Full run: startup checks, then one pass over every prompt.
///
/// Startup failures come back as `Err`. Once the loop starts, every prompt
/// is attempted and the run always completes with a summary.
pub async fn run(
    config: &Config,
    generator: &dyn ImageGenerator,
    limiter: &dyn RateLimiter,
) -> Result<BatchSummary, StartupError> {
    info!("Using {} backend with model {}", generator.name(), generator.model());
    if config.preflight {
        generator.preflight_check().await?;
    } else {
        info!("Skipping model check for {}", generator.model());
    }

    let output_dir = ensure_output_dir(&config.output_dir).await?;

    let prompts = read_prompt_file(&config.prompt_file).await?;
    info!(
        "Successfully read {} prompts from '{}'.",
        prompts.len(),
        config.prompt_file.display()
    );

    let references = ReferenceImages::load(&config.reference_images).await?;

    Ok(run_prompts(generator, limiter, &references, &prompts, &output_dir).await)
}

/// Processes prompts strictly in order, pausing after each one.
pub async fn run_prompts(
    generator: &dyn ImageGenerator,
    limiter: &dyn RateLimiter,
    references: &ReferenceImages,
    prompts: &[PromptEntry],
    output_dir: &Path,
) -> BatchSummary {
    let total = prompts.len();
    let mut reports: Vec<PromptReport> = Vec::with_capacity(total);

    for prompt in prompts {
        info!(
            "[{}/{}] Processing prompt: \"{}...\"",
            prompt.index,
            total,
            prompt_preview(&prompt.text)
        );

        let report = generate_for_prompt(generator, references, prompt, output_dir).await;
        log_outcome(&report);
        reports.push(report);

        limiter.wait().await;
    }

    let summary = BatchSummary {
        output_dir: output_dir.to_path_buf(),
        reports,
    };
    info!(
        total = summary.total(),
        saved = summary.saved(),
        no_image = summary.no_image(),
        failed = summary.failed(),
        "Batch complete. Images are in '{}'.",
        summary.output_dir.display()
    );
    summary
}

fn log_outcome(report: &PromptReport) {
    let preview = prompt_preview(&report.prompt.text);
    match &report.outcome {
        PromptOutcome::Saved { path } => {
            info!("  -> Success! Image saved to: {}", path.display());
        }
        PromptOutcome::NoImage { feedback } => {
            warn!(prompt = %preview, "  -> No image data received for this prompt.");
            if let Some(feedback) = feedback {
                warn!(prompt = %preview, "  -> API feedback: {}", feedback);
            }
        }
        PromptOutcome::Failed { error: err } => {
            error!(
                prompt = %preview,
                kind = err.kind(),
                "  -> Skipping prompt after error: {}",
                err
            );
        }
    }
}
