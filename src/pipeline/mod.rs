//! Pipeline entry points for hunter operations.
//!
//! - `run_check`: Verify the API key with the permission probe
//! - `run_hunter`: Probe, load companies, then run the batch
//! - `CompanyPipeline`: Primary and secondary passes for one company
//! - `run_batch`: Sequential driver with interrupt and fatal-error reporting

pub mod batch;
pub mod company;
pub mod interrupt;
pub mod run;

pub use batch::{BatchOutcome, BatchSummary, report_fatal, report_interrupt, run_batch};
pub use company::{CompanyPipeline, CompanyReport};
pub use interrupt::InterruptFlag;
pub use run::{run_check, run_hunter};
