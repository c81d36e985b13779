// src/services/client.rs

//! Rate-limited client for the Hunter search API.
//!
//! Every call sleeps a random whole number of seconds from the configured
//! throttle range before it is sent, then validates the response in order:
//! HTTP status, JSON envelope, envelope `code`. Failures are reported as
//! [`QueryOutcome`] arms and never escape as errors.

use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{Asset, Config, HunterConfig, QueryResult};
use crate::services::query::{EncodedQuery, QueryExpression};
use crate::utils::http;

/// Envelope `code` that marks a successful search.
pub const SUCCESS_CODE: i64 = 200;

/// Result of one search call.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Envelope reported success
    Success(QueryResult),
    /// Request failed or returned a non-200 HTTP status
    TransportFailure {
        status: Option<u16>,
        reason: String,
    },
    /// Body was not the expected JSON envelope
    ProtocolFailure { reason: String },
    /// Envelope was well formed but reported a failure code
    RemoteFailure { code: i64, message: String },
}

impl QueryOutcome {
    /// Degrade any failure to an empty result.
    pub fn into_result(self) -> QueryResult {
        match self {
            Self::Success(result) => result,
            _ => QueryResult::empty(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl fmt::Display for QueryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(result) => write!(
                f,
                "success (total {}, {} on page)",
                result.total,
                result.assets.len()
            ),
            Self::TransportFailure {
                status: Some(status),
                ..
            } => write!(f, "HTTP status {status}"),
            Self::TransportFailure {
                status: None,
                reason,
            } => write!(f, "request failed: {reason}"),
            Self::ProtocolFailure { reason } => write!(f, "unreadable response: {reason}"),
            Self::RemoteFailure { code, message } => {
                write!(f, "API error (code={code}): {message}")
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    code: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<EnvelopeData>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeData {
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    arr: Option<Vec<Asset>>,
}

/// Randomized pause taken before every remote call.
#[derive(Debug, Clone)]
pub struct Throttle {
    range: RangeInclusive<u64>,
}

impl Throttle {
    pub fn new(range: RangeInclusive<u64>) -> Self {
        Self { range }
    }

    /// Draw a delay uniformly from the configured range.
    pub fn next_delay(&self) -> Duration {
        let (min, max) = (*self.range.start(), *self.range.end());
        let secs = if min >= max {
            min
        } else {
            rand::rng().random_range(min..=max)
        };
        Duration::from_secs(secs)
    }

    pub async fn wait(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            log::debug!("Throttling for {}s before next query", delay.as_secs());
            tokio::time::sleep(delay).await;
        }
    }
}

/// Client for the search endpoint. One request at a time.
pub struct HunterClient {
    client: Client,
    config: HunterConfig,
    throttle: Throttle,
}

impl HunterClient {
    /// Create a client from the application configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: http::create_client(&config.hunter)?,
            config: config.hunter.clone(),
            throttle: Throttle::new(config.throttle.range()),
        })
    }

    /// Run one search with the configured page and port filter.
    pub async fn search(&self, query: &EncodedQuery) -> QueryOutcome {
        self.send(query, self.config.page, self.config.port_filter)
            .await
    }

    /// Check that the API key is accepted, using the fixed probe query.
    pub async fn check_permission(&self) -> Result<()> {
        let probe = QueryExpression::permission_probe().encode();
        match self.send(&probe, 1, false).await {
            QueryOutcome::Success(_) => Ok(()),
            failure => Err(AppError::auth(failure)),
        }
    }

    async fn send(&self, query: &EncodedQuery, page: u32, port_filter: bool) -> QueryOutcome {
        self.throttle.wait().await;

        let params = [
            ("api-key", self.config.api_key.clone()),
            ("search", query.as_str().to_string()),
            ("page", page.to_string()),
            ("page_size", self.config.page_size.to_string()),
            ("port_filter", port_filter.to_string()),
        ];

        let response = match self
            .client
            .get(&self.config.endpoint)
            .query(&params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return QueryOutcome::TransportFailure {
                    status: None,
                    reason: e.to_string(),
                };
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            return QueryOutcome::TransportFailure {
                status: Some(status.as_u16()),
                reason: status.to_string(),
            };
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return QueryOutcome::TransportFailure {
                    status: Some(status.as_u16()),
                    reason: e.to_string(),
                };
            }
        };

        Self::parse_envelope(&body)
    }

    fn parse_envelope(body: &str) -> QueryOutcome {
        let envelope: Envelope = match serde_json::from_str(body) {
            Ok(envelope) => envelope,
            Err(e) => {
                return QueryOutcome::ProtocolFailure {
                    reason: e.to_string(),
                };
            }
        };

        if envelope.code != SUCCESS_CODE {
            return QueryOutcome::RemoteFailure {
                code: envelope.code,
                message: envelope
                    .message
                    .unwrap_or_else(|| "no description".to_string()),
            };
        }

        let (total, assets) = envelope
            .data
            .map(|data| (data.total.unwrap_or(0), data.arr.unwrap_or_default()))
            .unwrap_or_default();

        QueryOutcome::Success(QueryResult { total, assets })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success_envelope() {
        let body = r#"{"code":200,"message":"success","data":{"total":42,"arr":[{"web_title":"Login","ip":"1.1.1.1","port":443}]}}"#;
        match HunterClient::parse_envelope(body) {
            QueryOutcome::Success(result) => {
                assert_eq!(result.total, 42);
                assert_eq!(result.assets.len(), 1);
                assert_eq!(result.assets[0].port, "443");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_parse_missing_arr_is_empty_success() {
        let body = r#"{"code":200,"data":{"total":0,"arr":null}}"#;
        assert_eq!(
            HunterClient::parse_envelope(body),
            QueryOutcome::Success(QueryResult::empty())
        );
    }

    #[test]
    fn test_parse_remote_failure_keeps_message() {
        let body = r#"{"code":401,"message":"令牌过期"}"#;
        assert_eq!(
            HunterClient::parse_envelope(body),
            QueryOutcome::RemoteFailure {
                code: 401,
                message: "令牌过期".to_string()
            }
        );
    }

    #[test]
    fn test_parse_garbage_is_protocol_failure() {
        assert!(matches!(
            HunterClient::parse_envelope("<html>busy</html>"),
            QueryOutcome::ProtocolFailure { .. }
        ));
    }

    #[test]
    fn test_failures_degrade_to_empty() {
        let outcome = QueryOutcome::TransportFailure {
            status: Some(503),
            reason: "503 Service Unavailable".to_string(),
        };
        assert!(!outcome.is_success());
        assert_eq!(outcome.into_result(), QueryResult::empty());
    }

    #[test]
    fn test_throttle_stays_in_range() {
        let throttle = Throttle::new(3..=5);
        for _ in 0..50 {
            let secs = throttle.next_delay().as_secs();
            assert!((3..=5).contains(&secs));
        }
        assert!(Throttle::new(0..=0).next_delay().is_zero());
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_wait_sleeps_for_drawn_delay() {
        let start = tokio::time::Instant::now();
        Throttle::new(5..=5).wait().await;
        assert!(start.elapsed() >= Duration::from_secs(5));

        let start = tokio::time::Instant::now();
        Throttle::new(0..=0).wait().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
