//! Classify command implementation.

use crate::cli::ClassifyArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use curator_classifier::Classifier;
use curator_llm::OllamaProvider;
use curator_pipeline::{load_articles, CancellationToken, Pipeline, PipelineConfig, RunSummary};
use tracing::info;

/// Execute the classify command.
///
/// The pipeline blocks on every inference call, so it runs on a blocking
/// worker. Ctrl+C cancels it; the current document is finished first.
pub async fn execute_classify(
    args: ClassifyArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    if !config.app.enable_classification {
        println!(
            "{}",
            formatter.warning("Classification is disabled (app.enable_classification = false)")
        );
        return Ok(());
    }

    let policy = config.load_policy(args.policy.as_deref())?;
    let inference = config.inference.clone();
    let pipeline_config = pipeline_config(&args, config);
    pipeline_config.validate().map_err(CliError::InvalidInput)?;

    let source = args
        .source
        .clone()
        .unwrap_or_else(|| config.app.output_folder.clone());
    let destination = config.library_folder(args.dest.clone());
    let articles = match &args.articles {
        Some(path) => load_articles(path)?,
        None => Vec::new(),
    };

    info!(
        "Classifying {} into {} with {}",
        source.display(),
        destination.display(),
        inference.model_id
    );

    let token = CancellationToken::new();
    let worker_token = token.clone();

    let mut worker = tokio::task::spawn_blocking(move || -> Result<RunSummary> {
        let provider = OllamaProvider::new(
            &inference.endpoint_url,
            &inference.model_id,
            inference.timeout(),
        )?;
        let classifier = Classifier::new(provider, inference, policy)?;
        let pipeline =
            Pipeline::new(classifier, pipeline_config)?.with_cancellation(worker_token);
        Ok(pipeline.classify_directory(&source, &articles, &destination)?)
    });

    let joined = tokio::select! {
        result = &mut worker => result,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("{}", formatter.warning("Stopping after the current document..."));
            token.cancel();
            worker.await
        }
    };

    let summary = joined.map_err(|e| CliError::Task(e.to_string()))??;
    println!("{}", formatter.format_run_summary(&summary)?);
    Ok(())
}

fn pipeline_config(args: &ClassifyArgs, config: &Config) -> PipelineConfig {
    let mut pipeline = config.pipeline_config();
    if args.remove_irrelevant {
        pipeline.remove_irrelevant_sources = true;
    }
    if let Some(batch_size) = args.batch_size {
        pipeline.batch_size = batch_size;
    }
    if let Some(cooldown) = args.cooldown {
        pipeline.cooldown_seconds = cooldown;
    }
    pipeline
}
