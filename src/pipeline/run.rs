// src/pipeline/run.rs

//! Top-level hunter run: permission probe, company list, batch.

use crate::error::{AppError, Result};
use crate::models::{Company, Config};
use crate::pipeline::batch::{BatchSummary, run_batch};
use crate::pipeline::company::CompanyPipeline;
use crate::pipeline::interrupt::InterruptFlag;
use crate::services::HunterClient;
use crate::storage::{CompanySource, ResultSink};
use crate::utils::console;

/// Verify the API key with the fixed probe query.
pub async fn run_check(client: &HunterClient) -> Result<()> {
    log::info!("Testing Hunter API permission...");
    client.check_permission().await?;
    log::info!("Hunter API permission verified");
    Ok(())
}

/// Run the full batch.
///
/// Fatal before any company is processed: a rejected API key, an unreadable
/// company list, an empty company list, or outputs that cannot be created.
pub async fn run_hunter(
    config: &Config,
    client: &HunterClient,
    source: &dyn CompanySource,
    sink: &dyn ResultSink,
    interrupt: &InterruptFlag,
) -> Result<BatchSummary> {
    console::header("Company asset batch query (Hunter)");

    console::step(1, 3, "Checking API permission");
    run_check(client).await?;

    console::step(2, 3, "Loading company list");
    let companies: Vec<Company> = source
        .list_companies()?
        .into_iter()
        .map(|(row, name)| Company::new(row, name, &config.names.corporate_suffixes))
        .collect();
    if companies.is_empty() {
        return Err(AppError::company_source("no valid company names found"));
    }
    sink.init(companies.len()).await?;

    console::step(3, 3, "Querying companies");
    let pipeline = CompanyPipeline::new(config, client, sink);
    log::debug!(
        "Secondary pass uses {} keyword groups",
        pipeline.keyword_groups().len()
    );
    let summary = run_batch(&pipeline, &companies, interrupt).await?;

    console::summary(
        "Batch finished",
        &[
            ("Companies", summary.progress.to_string()),
            ("Primary assets saved", summary.primary_saved.to_string()),
            (
                "Admin/login surfaces saved",
                summary.secondary_saved.to_string(),
            ),
            ("Skipped queries", summary.skipped_queries.to_string()),
        ],
    );

    Ok(summary)
}
