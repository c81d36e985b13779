//! Application configuration structures.

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable that overrides `hunter.api_key`.
pub const API_KEY_ENV: &str = "HUNTER_API_KEY";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote search endpoint and request parameters
    #[serde(default)]
    pub hunter: HunterConfig,

    /// Inter-request delay
    #[serde(default)]
    pub throttle: ThrottleConfig,

    /// Query construction rules
    #[serde(default)]
    pub query: QueryConfig,

    /// Title filtering rules
    #[serde(default)]
    pub filter: FilterConfig,

    /// Company name normalization rules
    #[serde(default)]
    pub names: NamesConfig,

    /// Input and output locations
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Replace the API key with `HUNTER_API_KEY` when that variable is set.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.hunter.api_key = key.trim().to_string();
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.hunter.api_key.trim().is_empty() {
            return Err(AppError::validation(format!(
                "hunter.api_key is empty (set it in the config file or {API_KEY_ENV})"
            )));
        }
        if self.hunter.endpoint.trim().is_empty() {
            return Err(AppError::validation("hunter.endpoint is empty"));
        }
        url::Url::parse(&self.hunter.endpoint)?;
        if self.hunter.page == 0 {
            return Err(AppError::validation("hunter.page must be > 0"));
        }
        if self.hunter.page_size == 0 {
            return Err(AppError::validation("hunter.page_size must be > 0"));
        }
        if self.hunter.timeout_secs == 0 {
            return Err(AppError::validation("hunter.timeout_secs must be > 0"));
        }
        if self.throttle.delay_min_secs > self.throttle.delay_max_secs {
            return Err(AppError::validation(
                "throttle.delay_min_secs must not exceed throttle.delay_max_secs",
            ));
        }
        if self.query.keyword_group_size == 0 {
            return Err(AppError::validation("query.keyword_group_size must be > 0"));
        }
        if self.query.sensitive_keywords.is_empty() {
            return Err(AppError::validation("No sensitive keywords defined"));
        }
        for keyword in &self.query.sensitive_keywords {
            if keyword.is_empty() || keyword.contains('"') {
                return Err(AppError::validation(format!(
                    "query.sensitive_keywords entry {keyword:?} cannot appear in a title match"
                )));
            }
        }
        if self.query.country_code.trim().is_empty() {
            return Err(AppError::validation("query.country_code is empty"));
        }
        Ok(())
    }
}

/// Remote search endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HunterConfig {
    /// Pre-provisioned API key
    #[serde(default)]
    pub api_key: String,

    /// Search endpoint URL
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// Result page requested (only one page is consumed per query)
    #[serde(default = "defaults::page")]
    pub page: u32,

    /// Results per page
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// Ask the service to drop assets on filtered ports
    #[serde(default)]
    pub port_filter: bool,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for HunterConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: defaults::endpoint(),
            page: defaults::page(),
            page_size: defaults::page_size(),
            port_filter: false,
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
            accept_invalid_certs: false,
        }
    }
}

/// Randomized inter-request delay, in whole seconds (inclusive bounds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    #[serde(default = "defaults::delay_min")]
    pub delay_min_secs: u64,

    #[serde(default = "defaults::delay_max")]
    pub delay_max_secs: u64,
}

impl ThrottleConfig {
    pub fn range(&self) -> RangeInclusive<u64> {
        self.delay_min_secs..=self.delay_max_secs
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            delay_min_secs: defaults::delay_min(),
            delay_max_secs: defaults::delay_max(),
        }
    }
}

/// Query construction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Country filter applied to every query (`ip.country`)
    #[serde(default = "defaults::country_code")]
    pub country_code: String,

    /// Primary results are saved only when the reported total exceeds this
    #[serde(default = "defaults::size_threshold")]
    pub size_threshold: u64,

    /// Maximum keywords OR-joined into one secondary subquery
    #[serde(default = "defaults::keyword_group_size")]
    pub keyword_group_size: usize,

    /// Title keywords that mark admin/login surfaces
    #[serde(default = "defaults::sensitive_keywords")]
    pub sensitive_keywords: Vec<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            country_code: defaults::country_code(),
            size_threshold: defaults::size_threshold(),
            keyword_group_size: defaults::keyword_group_size(),
            sensitive_keywords: defaults::sensitive_keywords(),
        }
    }
}

/// Title substrings that discard an asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Gambling and adult-content markers
    #[serde(default = "defaults::harmful_title_substrings")]
    pub harmful_title_substrings: Vec<String>,

    /// Irrelevant sites (video mirrors and the like)
    #[serde(default = "defaults::banned_title_substrings")]
    pub banned_title_substrings: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            harmful_title_substrings: defaults::harmful_title_substrings(),
            banned_title_substrings: defaults::banned_title_substrings(),
        }
    }
}

/// Company name normalization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamesConfig {
    /// Substrings removed from company names, in order
    #[serde(default = "defaults::corporate_suffixes")]
    pub corporate_suffixes: Vec<String>,
}

impl Default for NamesConfig {
    fn default() -> Self {
        Self {
            corporate_suffixes: defaults::corporate_suffixes(),
        }
    }
}

/// File locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Company list (CSV with a header row)
    #[serde(default = "defaults::input_file")]
    pub input_file: String,

    /// Header cell text identifying the company name column
    #[serde(default = "defaults::company_column")]
    pub company_column: String,

    /// Directory receiving the result files
    #[serde(default = "defaults::output_dir")]
    pub output_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_file: defaults::input_file(),
            company_column: defaults::company_column(),
            output_dir: defaults::output_dir(),
        }
    }
}

mod defaults {
    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // Hunter defaults
    pub fn endpoint() -> String {
        "https://hunter.qianxin.com/openApi/search".into()
    }
    pub fn page() -> u32 {
        1
    }
    pub fn page_size() -> u32 {
        20
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; asset-hunter/0.1)".into()
    }

    // Throttle defaults
    pub fn delay_min() -> u64 {
        15
    }
    pub fn delay_max() -> u64 {
        25
    }

    // Query defaults
    pub fn country_code() -> String {
        "CN".into()
    }
    pub fn size_threshold() -> u64 {
        10
    }
    pub fn keyword_group_size() -> usize {
        5
    }
    pub fn sensitive_keywords() -> Vec<String> {
        strings(&[
            "登录", "管理系统", "后台管理", "后台", "控制系统", "系统", "平台", "admin", "login",
            "manage", "control", "system", "platform",
        ])
    }

    // Filter defaults
    pub fn harmful_title_substrings() -> Vec<String> {
        strings(&[
            "真人视讯", "视讯", "彩票", "彩票投注", "棋牌", "棋牌游戏", "赌博", "赌博网站",
            "赌场", "网赌", "博彩", "电竞投注", "捕鱼", "打鱼", "老虎机", "百家乐", "牛牛",
            "炸金花",
        ])
    }
    pub fn banned_title_substrings() -> Vec<String> {
        strings(&[
            "手机免费在线观看", "伦理", "高清完整版", "成人视频", "香蕉娱乐", "威尼斯",
        ])
    }

    // Name defaults
    pub fn corporate_suffixes() -> Vec<String> {
        strings(&[
            "有限公司", "有限责任公司", "股份有限公司", "技术", "科技", "集团", "控股", "投资",
            "发展",
        ])
    }

    // Path defaults
    pub fn input_file() -> String {
        "companies.csv".into()
    }
    pub fn company_column() -> String {
        "公司名称".into()
    }
    pub fn output_dir() -> String {
        "hunter_results".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.hunter.api_key = "test-key".to_string();
        config
    }

    #[test]
    fn validate_default_config_with_key_ok() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_api_key() {
        assert!(Config::default().validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_delay_bounds() {
        let mut config = valid_config();
        config.throttle.delay_min_secs = 30;
        config.throttle.delay_max_secs = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_group_size() {
        let mut config = valid_config();
        config.query.keyword_group_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unusable_keywords() {
        let mut config = valid_config();
        config.query.sensitive_keywords = vec!["登录".into(), "".into(), "admin".into()];
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));

        config.query.sensitive_keywords = vec!["登录".into(), "say \"hi\"".into()];
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn validate_rejects_bad_endpoint() {
        let mut config = valid_config();
        config.hunter.endpoint = "not a url".to_string();
        assert!(matches!(config.validate(), Err(AppError::Url(_))));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [hunter]
            api_key = "abc"
            page_size = 50

            [throttle]
            delay_min_secs = 1
            delay_max_secs = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.hunter.api_key, "abc");
        assert_eq!(config.hunter.page_size, 50);
        assert_eq!(config.hunter.page, 1);
        assert_eq!(config.throttle.range(), 1..=2);
        assert_eq!(config.query.keyword_group_size, 5);
        assert_eq!(config.query.sensitive_keywords.len(), 13);
        assert_eq!(config.paths.company_column, "公司名称");
    }
}
