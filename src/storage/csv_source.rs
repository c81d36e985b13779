//! Company list read from a CSV export.

use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::storage::CompanySource;

/// Log a progress line every this many rows.
const PROGRESS_EVERY: usize = 1000;

/// Minimum name length, in characters.
const MIN_NAME_CHARS: usize = 2;

/// Reads company names from a CSV file with a header row.
///
/// The name column is the first header cell containing `column` as a
/// substring. Data rows are numbered from 2, as in the spreadsheet the CSV
/// was exported from.
#[derive(Debug, Clone)]
pub struct CsvCompanySource {
    path: PathBuf,
    column: String,
}

impl CsvCompanySource {
    pub fn new(path: impl Into<PathBuf>, column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            column: column.into(),
        }
    }
}

impl CompanySource for CsvCompanySource {
    fn list_companies(&self) -> Result<Vec<(usize, String)>> {
        log::info!("Reading company list from {}", self.path.display());
        if !self.path.exists() {
            return Err(AppError::company_source(format!(
                "file {} does not exist",
                self.path.display()
            )));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        let column = headers
            .iter()
            .position(|cell| cell.contains(self.column.as_str()))
            .ok_or_else(|| {
                AppError::company_source(format!(
                    "no \"{}\" column in {}",
                    self.column,
                    self.path.display()
                ))
            })?;
        log::info!(
            "Found company name column {} ({})",
            column + 1,
            &headers[column]
        );

        let mut companies = Vec::new();
        for (offset, record) in reader.records().enumerate() {
            let row = offset + 2;
            let record = record?;
            let name = record.get(column).unwrap_or("").trim();
            if name.chars().count() >= MIN_NAME_CHARS {
                companies.push((row, name.to_string()));
            }
            if row % PROGRESS_EVERY == 0 {
                log::info!(
                    "Read {} rows, {} valid company names so far",
                    row,
                    companies.len()
                );
            }
        }

        log::info!("Company list loaded: {} valid names", companies.len());
        Ok(companies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("companies.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_reads_named_column_with_row_numbers() {
        let tmp = TempDir::new().unwrap();
        let path = write_csv(
            &tmp,
            "序号,公司名称（全称）,法人\n1, 阿尔法科技有限公司 ,张三\n2,甲,李四\n3,,王五\n4,贝塔集团,赵六\n",
        );

        let companies = CsvCompanySource::new(&path, "公司名称")
            .list_companies()
            .unwrap();

        assert_eq!(
            companies,
            vec![
                (2, "阿尔法科技有限公司".to_string()),
                (5, "贝塔集团".to_string())
            ]
        );
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let path = write_csv(&tmp, "id,company name\n1\n2,Alpha Ltd\n");

        let companies = CsvCompanySource::new(&path, "company name")
            .list_companies()
            .unwrap();
        assert_eq!(companies, vec![(3, "Alpha Ltd".to_string())]);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let path = write_csv(&tmp, "id,name\n1,Alpha\n");

        let err = CsvCompanySource::new(&path, "公司名称")
            .list_companies()
            .unwrap_err();
        assert!(matches!(err, AppError::Source(_)));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let err = CsvCompanySource::new(tmp.path().join("nope.csv"), "公司名称")
            .list_companies()
            .unwrap_err();
        assert!(matches!(err, AppError::Source(_)));
    }
}
