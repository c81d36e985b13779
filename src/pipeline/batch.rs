// src/pipeline/batch.rs

//! Batch driver: runs the company pipeline over the whole list.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::error::{AppError, Result};
use crate::models::{Company, RunProgress};
use crate::pipeline::company::{CompanyPipeline, CompanyReport};
use crate::pipeline::interrupt::InterruptFlag;
use crate::utils::console;

/// How a batch ended without a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    Completed,
    Interrupted,
}

/// Totals over the companies that finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub outcome: BatchOutcome,
    pub progress: RunProgress,
    pub primary_saved: usize,
    pub secondary_saved: usize,
    pub skipped_queries: usize,
}

impl BatchSummary {
    fn new(total: usize) -> Self {
        Self {
            outcome: BatchOutcome::Completed,
            progress: RunProgress::new(total),
            primary_saved: 0,
            secondary_saved: 0,
            skipped_queries: 0,
        }
    }

    fn record(&mut self, report: &CompanyReport) {
        self.primary_saved += report.primary_saved;
        self.secondary_saved += report.secondary_saved;
        self.skipped_queries += report.skipped_queries;
        self.progress.advance();
    }
}

/// Process `companies` one at a time.
///
/// The interrupt flag is checked before each company. A panic while
/// processing a company ends the run with [`AppError::Fatal`] after the
/// progress count is logged.
pub async fn run_batch(
    pipeline: &CompanyPipeline<'_>,
    companies: &[Company],
    interrupt: &InterruptFlag,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::new(companies.len());

    for (i, company) in companies.iter().enumerate() {
        if interrupt.is_set() {
            report_interrupt(&summary.progress);
            summary.outcome = BatchOutcome::Interrupted;
            return Ok(summary);
        }

        let position = (i + 1, summary.progress.total);
        match AssertUnwindSafe(pipeline.process(company, position))
            .catch_unwind()
            .await
        {
            Ok(report) => summary.record(&report),
            Err(payload) => {
                let message = format!(
                    "unexpected failure while processing {}: {}",
                    company.raw_name,
                    panic_message(payload.as_ref())
                );
                report_fatal(&summary.progress, &message);
                return Err(AppError::Fatal {
                    message,
                    completed: summary.progress.completed,
                    total: summary.progress.total,
                });
            }
        }

        log::info!(
            "--- [{}/{}] Both passes complete for {} ---",
            i + 1,
            summary.progress.total,
            company.raw_name
        );
    }

    Ok(summary)
}

/// Log an interrupted batch.
pub fn report_interrupt(progress: &RunProgress) {
    console::separator();
    log::warn!(
        "Stopped by interrupt. Fully processed {} companies.",
        progress
    );
    console::separator();
}

/// Log a batch aborted by an unhandled failure.
pub fn report_fatal(progress: &RunProgress, message: &str) {
    log::error!("Global error: {message}");
    log::error!("Fully processed {} companies.", progress);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
