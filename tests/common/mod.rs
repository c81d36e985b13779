#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use asset_hunter::error::{AppError, Result};
use asset_hunter::models::{Asset, Company, Config};
use asset_hunter::services::QueryExpression;
use asset_hunter::storage::{CompanySource, ResultSink};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_PATH: &str = "/openApi/search";
pub const API_KEY: &str = "test-key";

/// Config pointed at the mock server, with no throttling.
pub fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.hunter.api_key = API_KEY.to_string();
    config.hunter.endpoint = format!("{}{}", server.uri(), API_PATH);
    config.hunter.timeout_secs = 5;
    config.throttle.delay_min_secs = 0;
    config.throttle.delay_max_secs = 0;
    config.query.size_threshold = 10;
    config.query.keyword_group_size = 2;
    config.query.sensitive_keywords = vec!["登录".into(), "admin".into(), "login".into()];
    config.filter.harmful_title_substrings = vec!["博彩".into()];
    config.filter.banned_title_substrings = vec!["在线观看".into()];
    config.names.corporate_suffixes = vec!["科技".into(), "有限公司".into()];
    config
}

pub fn asset_json(title: &str, ip: &str, url: &str) -> Value {
    json!({
        "web_title": title,
        "domain": "alpha.example.cn",
        "ip": ip,
        "port": 443,
        "status_code": 200,
        "response_time": 20,
        "url": url,
    })
}

pub fn success_body(total: u64, assets: Vec<Value>) -> Value {
    json!({ "code": 200, "message": "success", "data": { "total": total, "arr": assets } })
}

/// Encoded `search` parameter for a query expression.
pub fn encoded(query: QueryExpression) -> String {
    query.encode().as_str().to_string()
}

/// Answer the permission probe with success.
pub async fn mount_probe_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param(
            "search",
            encoded(QueryExpression::permission_probe()),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(0, vec![])))
        .mount(server)
        .await;
}

/// Answer one specific query.
pub async fn mount_query(server: &MockServer, query: QueryExpression, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("api-key", API_KEY))
        .and(query_param("search", encoded(query)))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Sink that records every append in memory.
#[derive(Default)]
pub struct RecordingSink {
    pub init_calls: Mutex<Vec<usize>>,
    pub primary: Mutex<Vec<(String, Vec<Asset>)>>,
    pub secondary: Mutex<Vec<(String, Vec<Asset>)>>,
    pub fail_primary: bool,
    pub panic_on_primary: Option<String>,
}

impl RecordingSink {
    pub fn primary_ips(&self) -> Vec<Vec<String>> {
        Self::ips(&self.primary.lock().unwrap())
    }

    pub fn secondary_ips(&self) -> Vec<Vec<String>> {
        Self::ips(&self.secondary.lock().unwrap())
    }

    fn ips(entries: &[(String, Vec<Asset>)]) -> Vec<Vec<String>> {
        entries
            .iter()
            .map(|(_, assets)| assets.iter().map(|a| a.ip.clone()).collect())
            .collect()
    }
}

#[async_trait]
impl ResultSink for RecordingSink {
    async fn init(&self, company_count: usize) -> Result<()> {
        self.init_calls.lock().unwrap().push(company_count);
        Ok(())
    }

    async fn append_primary(&self, company: &Company, assets: &[Asset]) -> Result<()> {
        if self.panic_on_primary.as_deref() == Some(company.raw_name.as_str()) {
            panic!("sink blew up on {}", company.raw_name);
        }
        if self.fail_primary {
            return Err(AppError::sink("primary", "disk full"));
        }
        self.primary
            .lock()
            .unwrap()
            .push((company.raw_name.clone(), assets.to_vec()));
        Ok(())
    }

    async fn append_secondary(&self, company: &Company, assets: &[Asset]) -> Result<()> {
        self.secondary
            .lock()
            .unwrap()
            .push((company.raw_name.clone(), assets.to_vec()));
        Ok(())
    }
}

/// In-memory company list.
pub struct StaticSource(pub Vec<(usize, String)>);

impl CompanySource for StaticSource {
    fn list_companies(&self) -> Result<Vec<(usize, String)>> {
        Ok(self.0.clone())
    }
}
