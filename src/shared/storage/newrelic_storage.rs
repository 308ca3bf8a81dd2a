use crate::features::bmx::models::Metric;
use crate::shared::config::Settings;
use crate::shared::error::{ConfigError, StorageError};
use crate::shared::traits::MetricSink;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

pub const AGENT_GUID: &str = "com.gopivotal.newrelic.extensions.httpd_mod_bmx";
pub const AGENT_VERSION: &str = "0.0.1";

#[derive(Debug, Serialize)]
struct AgentInfo {
    host: String,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct Component {
    name: String,
    guid: &'static str,
    duration: i64,
    metrics: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
struct Payload {
    agent: AgentInfo,
    components: Vec<Component>,
}

/// Batches metrics per cycle and posts them to the New Relic plugin API.
pub struct NewRelicSink {
    agent: ureq::Agent,
    endpoint: String,
    license_key: String,
    host: String,
    component: String,
    pending: Mutex<BTreeMap<String, f64>>,
    last_success: Mutex<DateTime<Utc>>,
}

impl NewRelicSink {
    pub fn new(
        endpoint: &str,
        license_key: &str,
        component: &str,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Self {
        let poll = ChronoDuration::from_std(poll_interval).unwrap_or_else(|_| ChronoDuration::seconds(60));
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            endpoint: endpoint.to_string(),
            license_key: license_key.to_string(),
            host: whoami::hostname(),
            component: component.to_string(),
            pending: Mutex::new(BTreeMap::new()),
            last_success: Mutex::new(Utc::now() - poll),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let license_key = settings
            .newrelic
            .license_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::Validation("license_key is required".to_string()))?;

        Ok(Self::new(
            &settings.newrelic.endpoint,
            license_key,
            &settings.agent.label(),
            settings.newrelic.poll_interval(),
            settings.agent.request_timeout(),
        ))
    }

    /// Metric name in the plugin API's `Component/<path>[<unit>]` form.
    pub fn metric_key(metric: &Metric) -> String {
        format!("Component/{}[{}]", metric.path, metric.unit)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    fn build_payload(&self, metrics: BTreeMap<String, f64>, now: DateTime<Utc>) -> Payload {
        let last = *self.last_success.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let duration = (now - last).num_seconds().max(1);
        Payload {
            agent: AgentInfo {
                host: self.host.clone(),
                version: AGENT_VERSION,
            },
            components: vec![Component {
                name: self.component.clone(),
                guid: AGENT_GUID,
                duration,
                metrics,
            }],
        }
    }

    fn post(&self, body: &str) -> Result<(), StorageError> {
        let result = self
            .agent
            .post(&self.endpoint)
            .set("X-License-Key", &self.license_key)
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
            .send_string(body);

        match result {
            Ok(response) if (200..300).contains(&response.status()) => Ok(()),
            Ok(response) => Err(StorageError::Rejected(response.status())),
            Err(ureq::Error::Status(code, _)) => Err(StorageError::Rejected(code)),
            Err(e) => Err(StorageError::Connection(e.to_string())),
        }
    }
}

impl MetricSink for NewRelicSink {
    fn report(&self, metric: &Metric) -> Result<(), StorageError> {
        match metric.value.as_f64() {
            Some(value) => {
                let mut pending = self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                pending.insert(Self::metric_key(metric), value);
            }
            None => debug!("Dropping non-numeric metric {} = {}", metric.path, metric.value),
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), StorageError> {
        let metrics = self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone();
        if metrics.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let count = metrics.len();
        let payload = self.build_payload(metrics, now);
        let body = serde_json::to_string(&payload)?;

        debug!("Posting {} metrics to {}", count, self.endpoint);
        self.post(&body)?;

        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clear();
        *self.last_success.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = now;
        info!("Successfully delivered {} metrics for {}", count, self.component);
        Ok(())
    }
}
