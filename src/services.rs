//! Backend access for the report desk: the window-limit setting and the
//! report directory. Payloads keep the dashboard API's wire shape, so the
//! fixture-backed directory used by the demo exercises the same decoding
//! path a live backend would.

use std::sync::{Arc, Mutex, mpsc};
use std::thread::{self, JoinHandle};

use serde::Deserialize;
use thiserror::Error;

use crate::constants::{DEFAULT_MAX_WINDOWS, MAX_WINDOWS_CEIL, MAX_WINDOWS_FLOOR};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("backend request failed: {0}")]
    Backend(String),
    #[error("malformed backend response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unknown report: {0}")]
    UnknownReport(String),
    #[error("window limit must be between 1 and 10, got {0}")]
    LimitOutOfRange(usize),
}

#[derive(Debug, Deserialize)]
pub struct ConfigResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<ConfigData>,
}

/// The limit travels as a stringified integer, a quirk of the settings
/// store it comes out of.
#[derive(Debug, Deserialize)]
pub struct ConfigData {
    #[serde(default)]
    pub max_report_windows: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<ReportData>,
}

#[derive(Debug, Deserialize)]
pub struct ReportData {
    pub report: ReportDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportDescriptor {
    pub id: String,
    pub name: String,
    pub embed_url: String,
    #[serde(default)]
    pub can_export: bool,
}

/// Decode a config response body into a usable window limit. Out-of-range
/// values are clamped here; only the admin update path rejects them.
pub fn parse_max_windows(body: &str) -> Result<usize, ServiceError> {
    let response: ConfigResponse = serde_json::from_str(body)?;
    if !response.success {
        return Err(ServiceError::Backend(
            "config endpoint reported failure".to_string(),
        ));
    }
    let raw = response
        .data
        .and_then(|data| data.max_report_windows)
        .ok_or_else(|| ServiceError::Backend("config payload has no window limit".to_string()))?;
    let value: usize = raw
        .trim()
        .parse()
        .map_err(|_| ServiceError::Backend(format!("window limit is not a number: {raw:?}")))?;
    Ok(value.clamp(MAX_WINDOWS_FLOOR, MAX_WINDOWS_CEIL))
}

pub fn parse_report(body: &str) -> Result<ReportDescriptor, ServiceError> {
    let response: ReportResponse = serde_json::from_str(body)?;
    if !response.success {
        return Err(ServiceError::Backend(
            "report endpoint reported failure".to_string(),
        ));
    }
    response
        .data
        .map(|data| data.report)
        .ok_or_else(|| ServiceError::Backend("report payload has no report".to_string()))
}

pub trait ConfigService {
    fn fetch_max_windows(&self) -> Result<usize, ServiceError>;

    /// Persist a new limit. Unlike the load path this rejects out-of-range
    /// values instead of clamping them.
    fn update_max_windows(&self, limit: usize) -> Result<usize, ServiceError>;
}

pub trait ReportService {
    fn list_reports(&self) -> Vec<ReportDescriptor>;
    fn resolve(&self, report_id: &str) -> Result<ReportDescriptor, ServiceError>;
}

/// Fixture-backed stand-in for the dashboard backend, used by the demo
/// binary and the tests.
pub struct StaticDirectory {
    config_body: String,
    report_bodies: Vec<String>,
    stored_limit: Mutex<Option<usize>>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::with_config_body(indoc::indoc! {r#"
            {
              "success": true,
              "data": {
                "max_report_windows": "5"
              }
            }
        "#})
    }

    pub fn with_config_body(config_body: &str) -> Self {
        Self {
            config_body: config_body.to_string(),
            report_bodies: demo_report_bodies(),
            stored_limit: Mutex::new(None),
        }
    }
}

impl Default for StaticDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigService for StaticDirectory {
    fn fetch_max_windows(&self) -> Result<usize, ServiceError> {
        let stored = self
            .stored_limit
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        if let Some(limit) = *stored {
            return Ok(limit);
        }
        parse_max_windows(&self.config_body)
    }

    fn update_max_windows(&self, limit: usize) -> Result<usize, ServiceError> {
        if !(MAX_WINDOWS_FLOOR..=MAX_WINDOWS_CEIL).contains(&limit) {
            return Err(ServiceError::LimitOutOfRange(limit));
        }
        let mut stored = self
            .stored_limit
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        *stored = Some(limit);
        tracing::info!(limit, "window limit updated");
        Ok(limit)
    }
}

impl ReportService for StaticDirectory {
    fn list_reports(&self) -> Vec<ReportDescriptor> {
        self.report_bodies
            .iter()
            .filter_map(|body| match parse_report(body) {
                Ok(report) => Some(report),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping undecodable report fixture");
                    None
                }
            })
            .collect()
    }

    fn resolve(&self, report_id: &str) -> Result<ReportDescriptor, ServiceError> {
        self.list_reports()
            .into_iter()
            .find(|report| report.id == report_id)
            .ok_or_else(|| ServiceError::UnknownReport(report_id.to_string()))
    }
}

/// One-shot background load of the configured window limit, so startup
/// never blocks the UI thread on the backend.
pub struct ConfigFetch {
    receiver: mpsc::Receiver<usize>,
    _worker: JoinHandle<()>,
}

impl ConfigFetch {
    pub fn spawn<C>(service: Arc<C>) -> Self
    where
        C: ConfigService + Send + Sync + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let worker = thread::spawn(move || {
            let _ = sender.send(resolve_limit(service.as_ref()));
        });
        Self {
            receiver,
            _worker: worker,
        }
    }

    /// Non-blocking poll; yields the fetched limit exactly once.
    pub fn try_recv(&self) -> Option<usize> {
        self.receiver.try_recv().ok()
    }
}

fn resolve_limit<C: ConfigService + ?Sized>(service: &C) -> usize {
    match service.fetch_max_windows() {
        Ok(limit) => {
            tracing::info!(limit, "loaded window limit");
            limit
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load window limit, using default");
            DEFAULT_MAX_WINDOWS
        }
    }
}

fn demo_report_bodies() -> Vec<String> {
    let bodies = [
        indoc::indoc! {r#"
            {
              "success": true,
              "data": {
                "report": {
                  "id": "sales-overview",
                  "name": "Sales Overview",
                  "embed_url": "https://bi.example/embed/sales-overview",
                  "can_export": true
                }
              }
            }
        "#},
        indoc::indoc! {r#"
            {
              "success": true,
              "data": {
                "report": {
                  "id": "revenue-by-region",
                  "name": "Revenue by Region",
                  "embed_url": "https://bi.example/embed/revenue-by-region",
                  "can_export": true
                }
              }
            }
        "#},
        indoc::indoc! {r#"
            {
              "success": true,
              "data": {
                "report": {
                  "id": "churn-cohorts",
                  "name": "Churn Cohorts",
                  "embed_url": "https://bi.example/embed/churn-cohorts"
                }
              }
            }
        "#},
        indoc::indoc! {r#"
            {
              "success": true,
              "data": {
                "report": {
                  "id": "pipeline-forecast",
                  "name": "Pipeline Forecast",
                  "embed_url": "https://bi.example/embed/pipeline-forecast",
                  "can_export": true
                }
              }
            }
        "#},
        indoc::indoc! {r#"
            {
              "success": true,
              "data": {
                "report": {
                  "id": "support-queue",
                  "name": "Support Queue Health",
                  "embed_url": "https://bi.example/embed/support-queue"
                }
              }
            }
        "#},
        indoc::indoc! {r#"
            {
              "success": true,
              "data": {
                "report": {
                  "id": "marketing-funnel",
                  "name": "Marketing Funnel",
                  "embed_url": "https://bi.example/embed/marketing-funnel"
                }
              }
            }
        "#},
        indoc::indoc! {r#"
            {
              "success": true,
              "data": {
                "report": {
                  "id": "inventory-aging",
                  "name": "Inventory Aging",
                  "embed_url": "https://bi.example/embed/inventory-aging",
                  "can_export": true
                }
              }
            }
        "#},
    ];
    bodies.iter().map(|body| body.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug)]
    struct FailingConfig;

    impl ConfigService for FailingConfig {
        fn fetch_max_windows(&self) -> Result<usize, ServiceError> {
            Err(ServiceError::Backend("connection refused".to_string()))
        }

        fn update_max_windows(&self, _limit: usize) -> Result<usize, ServiceError> {
            Err(ServiceError::Backend("connection refused".to_string()))
        }
    }

    #[test]
    fn parse_max_windows_reads_stringified_value() {
        let body = r#"{"success": true, "data": {"max_report_windows": "7"}}"#;
        assert_eq!(parse_max_windows(body).unwrap(), 7);
    }

    #[test]
    fn parse_max_windows_clamps_out_of_range_values() {
        let high = r#"{"success": true, "data": {"max_report_windows": "25"}}"#;
        assert_eq!(parse_max_windows(high).unwrap(), 10);
        let low = r#"{"success": true, "data": {"max_report_windows": "0"}}"#;
        assert_eq!(parse_max_windows(low).unwrap(), 1);
    }

    #[test]
    fn parse_max_windows_rejects_bad_payloads() {
        assert!(parse_max_windows("not json").is_err());
        assert!(parse_max_windows(r#"{"success": false}"#).is_err());
        assert!(parse_max_windows(r#"{"success": true}"#).is_err());
        assert!(
            parse_max_windows(r#"{"success": true, "data": {"max_report_windows": "many"}}"#)
                .is_err()
        );
    }

    #[test]
    fn parse_report_reads_descriptor_and_defaults_can_export() {
        let body = r#"{
            "success": true,
            "data": {
                "report": {
                    "id": "r1",
                    "name": "Quarterly",
                    "embed_url": "https://bi.example/embed/r1"
                }
            }
        }"#;
        let report = parse_report(body).unwrap();
        assert_eq!(report.id, "r1");
        assert_eq!(report.name, "Quarterly");
        assert!(!report.can_export);
    }

    #[test]
    fn static_directory_lists_and_resolves_reports() {
        let directory = StaticDirectory::new();
        let reports = directory.list_reports();
        assert!(reports.len() >= 6);
        let found = directory.resolve("churn-cohorts").unwrap();
        assert_eq!(found.name, "Churn Cohorts");
        assert!(matches!(
            directory.resolve("no-such-report"),
            Err(ServiceError::UnknownReport(_))
        ));
    }

    #[test]
    fn static_directory_serves_configured_limit() {
        let directory = StaticDirectory::new();
        assert_eq!(directory.fetch_max_windows().unwrap(), 5);
    }

    #[test]
    fn update_rejects_out_of_range_and_persists_valid_limits() {
        let directory = StaticDirectory::new();
        assert!(matches!(
            directory.update_max_windows(0),
            Err(ServiceError::LimitOutOfRange(0))
        ));
        assert!(matches!(
            directory.update_max_windows(11),
            Err(ServiceError::LimitOutOfRange(11))
        ));
        assert_eq!(directory.update_max_windows(8).unwrap(), 8);
        assert_eq!(directory.fetch_max_windows().unwrap(), 8);
    }

    #[test]
    fn resolve_limit_falls_back_to_default_on_error() {
        assert_eq!(resolve_limit(&FailingConfig), DEFAULT_MAX_WINDOWS);
        assert_eq!(resolve_limit(&StaticDirectory::new()), 5);
    }

    #[test]
    fn config_fetch_delivers_in_background() {
        let fetch = ConfigFetch::spawn(Arc::new(StaticDirectory::new()));
        let mut received = None;
        for _ in 0..200 {
            if let Some(limit) = fetch.try_recv() {
                received = Some(limit);
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(received, Some(5));
        assert_eq!(fetch.try_recv(), None);
    }
}
