// src/pipeline/company.rs

//! Per-company query-and-triage pipeline.
//!
//! For one company the stages run strictly in order:
//!
//! 1. primary query (one call), filter, save when `total > size_threshold`
//! 2. one secondary query per keyword group, results concatenated
//! 3. dedup by IP then URL, filter, save when anything survives
//!
//! A failing stage degrades to an empty result and the next stage runs.

use crate::models::{Asset, Company, Config, QueryResult};
use crate::services::{
    ContentFilter, HunterClient, Pass, QueryExpression, QueryOutcome, chunk_keywords,
    dedup_assets,
};
use crate::storage::ResultSink;

/// Counts gathered while processing one company.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyReport {
    /// Total the primary query reported
    pub primary_total: u64,
    /// Primary assets handed to the sink (0 when below threshold)
    pub primary_saved: usize,
    /// Secondary assets across all keyword groups, before dedup
    pub secondary_found: usize,
    /// Secondary assets after dedup
    pub secondary_unique: usize,
    /// Secondary assets handed to the sink
    pub secondary_saved: usize,
    /// Queries skipped because they could not be encoded
    pub skipped_queries: usize,
}

/// Runs both passes for a company and forwards survivors to the sink.
pub struct CompanyPipeline<'a> {
    config: &'a Config,
    client: &'a HunterClient,
    sink: &'a dyn ResultSink,
    filter: ContentFilter,
    keyword_groups: Vec<Vec<String>>,
}

impl<'a> CompanyPipeline<'a> {
    pub fn new(config: &'a Config, client: &'a HunterClient, sink: &'a dyn ResultSink) -> Self {
        Self {
            config,
            client,
            sink,
            filter: ContentFilter::new(&config.filter),
            keyword_groups: chunk_keywords(
                &config.query.sensitive_keywords,
                config.query.keyword_group_size,
            ),
        }
    }

    /// Keyword groups used for the secondary pass.
    pub fn keyword_groups(&self) -> &[Vec<String>] {
        &self.keyword_groups
    }

    /// Process one company. `position` is `(1-based index, total)` for logging.
    pub async fn process(&self, company: &Company, position: (usize, usize)) -> CompanyReport {
        let mut report = CompanyReport::default();
        self.primary_pass(company, position, &mut report).await;
        self.secondary_pass(company, position, &mut report).await;
        report
    }

    async fn primary_pass(
        &self,
        company: &Company,
        (idx, total): (usize, usize),
        report: &mut CompanyReport,
    ) {
        let pass = Pass::Primary;
        log::info!(
            "{pass} [{idx}/{total}] Querying company: {} (row {})",
            company.raw_name,
            company.source_row
        );

        let query = match QueryExpression::primary(
            &company.formatted_name,
            &self.config.query.country_code,
        ) {
            Ok(query) => query,
            Err(e) => {
                log::error!("{pass} Skipping query for {}: {e}", company.raw_name);
                report.skipped_queries += 1;
                return;
            }
        };
        log::info!("{pass} Query: {query}");

        let result = self.run_query(pass, query).await;
        report.primary_total = result.total;
        log::info!("{pass} Found {} assets", result.total);

        if result.total <= self.config.query.size_threshold {
            log::info!(
                "{pass} {} assets is not above the threshold of {}; nothing saved",
                result.total,
                self.config.query.size_threshold
            );
            return;
        }

        let kept = self.filter.retain(pass, result.assets);
        match self.sink.append_primary(company, &kept).await {
            Ok(()) => report.primary_saved = kept.len(),
            Err(e) => log::warn!("{pass} Failed to save results for {}: {e}", company.raw_name),
        }
    }

    async fn secondary_pass(
        &self,
        company: &Company,
        (idx, total): (usize, usize),
        report: &mut CompanyReport,
    ) {
        let pass = Pass::Secondary;
        log::info!(
            "{pass} [{idx}/{total}] Screening {} for admin/login surfaces",
            company.raw_name
        );

        let group_count = self.keyword_groups.len();
        let mut found: Vec<Asset> = Vec::new();
        for (i, group) in self.keyword_groups.iter().enumerate() {
            log::info!(
                "{pass} Subquery {}/{group_count}, keywords: {}",
                i + 1,
                group.join(", ")
            );

            let query = match QueryExpression::secondary(
                &company.formatted_name,
                group,
                &self.config.query.country_code,
            ) {
                Ok(query) => query,
                Err(e) => {
                    log::error!("{pass} Skipping subquery {}: {e}", i + 1);
                    report.skipped_queries += 1;
                    continue;
                }
            };

            let result = self.run_query(pass, query).await;
            if !result.assets.is_empty() {
                log::info!("{pass} Subquery returned {} assets", result.assets.len());
            }
            found.extend(result.assets);
        }
        report.secondary_found = found.len();

        let unique = dedup_assets(found);
        report.secondary_unique = unique.len();

        let kept = self.filter.retain(pass, unique);
        if kept.is_empty() {
            log::info!(
                "{pass} Screening done: no admin/login surfaces kept for {}",
                company.raw_name
            );
            return;
        }

        log::info!(
            "{pass} Screening done: {} unique admin/login surfaces for {}",
            kept.len(),
            company.raw_name
        );
        match self.sink.append_secondary(company, &kept).await {
            Ok(()) => report.secondary_saved = kept.len(),
            Err(e) => log::warn!("{pass} Failed to save results for {}: {e}", company.raw_name),
        }
    }

    /// Encode and send one query, degrading every failure to an empty result.
    async fn run_query(&self, pass: Pass, query: QueryExpression) -> QueryResult {
        let outcome = self.client.search(&query.encode()).await;
        match &outcome {
            QueryOutcome::Success(_) => {}
            QueryOutcome::TransportFailure { .. } => {
                log::error!("{pass} Query failed: {outcome}");
            }
            QueryOutcome::ProtocolFailure { .. } => {
                log::error!("{pass} Query error: {outcome}");
            }
            QueryOutcome::RemoteFailure { .. } => {
                log::warn!("{pass} No results or API error: {outcome}");
            }
        }
        outcome.into_result()
    }
}
