//! Local filesystem result sink.
//!
//! Every append reopens its file in append mode and closes it again, so a
//! crash mid-batch loses at most the company being written.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{Asset, Company};
use crate::storage::ResultSink;

pub const PRIMARY_TXT: &str = "hunter_results.txt";
pub const PRIMARY_CSV: &str = "hunter_results.csv";
pub const SECONDARY_CSV: &str = "sensitive_systems.csv";

const COLUMNS: [&str; 7] = [
    "company",
    "title",
    "domain",
    "ip",
    "port",
    "status_code",
    "response_time",
];

/// One CSV row.
#[derive(Debug, Serialize)]
struct AssetRow<'a> {
    company: &'a str,
    title: String,
    domain: &'a str,
    ip: &'a str,
    port: &'a str,
    status_code: &'a str,
    response_time: String,
}

impl<'a> AssetRow<'a> {
    fn new(company: &'a Company, asset: &'a Asset) -> Self {
        Self {
            company: &company.raw_name,
            title: asset.cleaned_title(),
            domain: &asset.domain,
            ip: &asset.ip,
            port: &asset.port,
            status_code: &asset.status_code,
            response_time: asset.response_time_display(),
        }
    }
}

/// Writes results as CSV tables plus a plain-text report.
#[derive(Debug, Clone)]
pub struct LocalResultSink {
    root_dir: PathBuf,
}

impl LocalResultSink {
    /// Create a sink writing into the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a file name.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root_dir.join(name)
    }

    /// Truncate `name` and write `bytes`.
    async fn write_fresh(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| Self::sink_error(&path, e))
    }

    /// Append `bytes` to `name`, creating it if needed.
    async fn append_bytes(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(name);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| Self::sink_error(&path, e))?;
        file.write_all(bytes)
            .await
            .map_err(|e| Self::sink_error(&path, e))?;
        file.flush().await.map_err(|e| Self::sink_error(&path, e))?;
        Ok(())
    }

    fn sink_error(path: &Path, error: impl std::fmt::Display) -> AppError {
        AppError::sink(path.display().to_string(), error)
    }

    fn csv_header() -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(COLUMNS)?;
        Self::finish_csv(writer)
    }

    fn csv_rows(company: &Company, assets: &[Asset]) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        for asset in assets {
            writer.serialize(AssetRow::new(company, asset))?;
        }
        Self::finish_csv(writer)
    }

    fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
        writer
            .into_inner()
            .map_err(|e| AppError::sink("csv buffer", e.error()))
    }

    fn report_header(company_count: usize) -> String {
        format!(
            "Hunter batch query results\nQuery time: {}\nCompanies: {}\n{}\n\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            company_count,
            "=".repeat(80)
        )
    }

    fn report_block(company: &Company, assets: &[Asset]) -> String {
        let rule = "-".repeat(80);
        let mut block = format!("===== Company: {} =====\n{}\n", company.raw_name, rule);
        for asset in assets {
            let row = AssetRow::new(company, asset);
            block.push_str(&format!(
                "Title: {}\nDomain: {}\nIP: {}\nPort: {}\nStatus: {}\nResponse time: {}\n{}\n",
                row.title, row.domain, row.ip, row.port, row.status_code, row.response_time, rule
            ));
        }
        block.push_str(&format!("\n{}\n\n", "=".repeat(80)));
        block
    }
}

#[async_trait]
impl ResultSink for LocalResultSink {
    async fn init(&self, company_count: usize) -> Result<()> {
        tokio::fs::create_dir_all(&self.root_dir)
            .await
            .map_err(|e| Self::sink_error(&self.root_dir, e))?;

        self.write_fresh(PRIMARY_TXT, Self::report_header(company_count).as_bytes())
            .await?;
        let header = Self::csv_header()?;
        self.write_fresh(PRIMARY_CSV, &header).await?;
        self.write_fresh(SECONDARY_CSV, &header).await?;

        log::info!("Result files initialized in {}", self.root_dir.display());
        Ok(())
    }

    async fn append_primary(&self, company: &Company, assets: &[Asset]) -> Result<()> {
        let rows = Self::csv_rows(company, assets)?;
        self.append_bytes(PRIMARY_TXT, Self::report_block(company, assets).as_bytes())
            .await?;
        self.append_bytes(PRIMARY_CSV, &rows).await?;

        for asset in assets {
            log::info!(
                "[primary] Saved asset: {} ({} | {}:{})",
                asset.cleaned_title(),
                asset.domain,
                asset.ip,
                asset.port
            );
        }
        Ok(())
    }

    async fn append_secondary(&self, company: &Company, assets: &[Asset]) -> Result<()> {
        let rows = Self::csv_rows(company, assets)?;
        self.append_bytes(SECONDARY_CSV, &rows).await?;

        for asset in assets {
            log::info!(
                "[secondary] Found and saved: {} ({})",
                asset.cleaned_title(),
                asset.domain
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn company() -> Company {
        Company {
            source_row: 2,
            raw_name: "阿尔法科技有限公司".to_string(),
            formatted_name: "阿尔法".to_string(),
        }
    }

    fn asset(title: &str, ip: &str) -> Asset {
        Asset {
            title: title.to_string(),
            domain: "alpha.example.cn".to_string(),
            ip: ip.to_string(),
            port: "443".to_string(),
            status_code: "200".to_string(),
            response_time: Some(12.0),
            url: format!("https://{ip}"),
        }
    }

    #[tokio::test]
    async fn test_init_writes_headers() {
        let tmp = TempDir::new().unwrap();
        let sink = LocalResultSink::new(tmp.path().join("out"));
        sink.init(3).await.unwrap();

        let csv = std::fs::read_to_string(sink.path(PRIMARY_CSV)).unwrap();
        assert_eq!(
            csv,
            "company,title,domain,ip,port,status_code,response_time\n"
        );
        let txt = std::fs::read_to_string(sink.path(PRIMARY_TXT)).unwrap();
        assert!(txt.contains("Companies: 3"));
        assert!(sink.path(SECONDARY_CSV).exists());
    }

    #[tokio::test]
    async fn test_appends_accumulate_in_order() {
        let tmp = TempDir::new().unwrap();
        let sink = LocalResultSink::new(tmp.path());
        sink.init(1).await.unwrap();

        let company = company();
        sink.append_primary(&company, &[asset("OA\n系统", "1.1.1.1")])
            .await
            .unwrap();
        sink.append_primary(&company, &[asset("门户", "2.2.2.2")])
            .await
            .unwrap();

        let csv = std::fs::read_to_string(sink.path(PRIMARY_CSV)).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "阿尔法科技有限公司,OA系统,alpha.example.cn,1.1.1.1,443,200,12ms"
        );
        assert!(lines[2].contains("2.2.2.2"));

        let txt = std::fs::read_to_string(sink.path(PRIMARY_TXT)).unwrap();
        assert_eq!(txt.matches("===== Company: 阿尔法科技有限公司 =====").count(), 2);
    }

    #[tokio::test]
    async fn test_secondary_goes_to_its_own_file() {
        let tmp = TempDir::new().unwrap();
        let sink = LocalResultSink::new(tmp.path());
        sink.init(1).await.unwrap();

        sink.append_secondary(&company(), &[asset("后台登录", "3.3.3.3")])
            .await
            .unwrap();

        let secondary = std::fs::read_to_string(sink.path(SECONDARY_CSV)).unwrap();
        assert_eq!(secondary.lines().count(), 2);
        let primary = std::fs::read_to_string(sink.path(PRIMARY_CSV)).unwrap();
        assert_eq!(primary.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_failed_report_write_leaves_csv_untouched() {
        let tmp = TempDir::new().unwrap();
        let sink = LocalResultSink::new(tmp.path());
        std::fs::create_dir(sink.path(PRIMARY_TXT)).unwrap();

        let err = sink
            .append_primary(&company(), &[asset("门户", "5.5.5.5")])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Sink { .. }));
        assert!(!sink.path(PRIMARY_CSV).exists());
    }

    #[tokio::test]
    async fn test_missing_directory_is_a_sink_error() {
        let tmp = TempDir::new().unwrap();
        let sink = LocalResultSink::new(tmp.path().join("never-created"));

        let err = sink
            .append_secondary(&company(), &[asset("后台", "4.4.4.4")])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Sink { .. }));
    }
}
