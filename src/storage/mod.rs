//! Input and output collaborators of the pipeline.
//!
//! The pipeline only sees two narrow interfaces:
//! - [`CompanySource`]: yields `(row, name)` pairs to enumerate
//! - [`ResultSink`]: durably records filtered assets per company
//!
//! ## Output Layout
//!
//! ```text
//! {output_dir}/
//! ├── hunter_results.txt        # Primary pass, human-readable report
//! ├── hunter_results.csv        # Primary pass, one row per asset
//! └── sensitive_systems.csv     # Secondary pass, one row per asset
//! ```

pub mod csv_source;
pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Asset, Company};

// Re-export for convenience
pub use csv_source::CsvCompanySource;
pub use local::LocalResultSink;

/// Source of company names.
pub trait CompanySource {
    /// List `(row, name)` pairs whose trimmed name has at least two characters.
    ///
    /// Failing to open the source or to find the name column is fatal.
    fn list_companies(&self) -> Result<Vec<(usize, String)>>;
}

/// Append-only destination for filtered assets.
///
/// Each append is independently durable; assets are written in the order given.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Create or truncate the outputs and write their headers.
    async fn init(&self, company_count: usize) -> Result<()>;

    /// Record primary-pass assets for one company.
    async fn append_primary(&self, company: &Company, assets: &[Asset]) -> Result<()>;

    /// Record secondary-pass (admin/login surface) assets for one company.
    async fn append_secondary(&self, company: &Company, assets: &[Asset]) -> Result<()>;
}
