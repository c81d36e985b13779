//! Company records read from the input list.

use crate::services::format_company_name;

/// One company to enumerate, as read from the input list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    /// Spreadsheet row the name came from (data rows start at 2)
    pub source_row: usize,

    /// Name exactly as listed (trimmed)
    pub raw_name: String,

    /// Name with corporate suffixes and ASCII parentheses removed
    pub formatted_name: String,
}

impl Company {
    /// Build a company, formatting its name once with the given suffix list.
    pub fn new(source_row: usize, raw_name: impl Into<String>, suffixes: &[String]) -> Self {
        let raw_name = raw_name.into();
        let formatted_name = format_company_name(&raw_name, suffixes);
        Self {
            source_row,
            raw_name,
            formatted_name,
        }
    }
}
