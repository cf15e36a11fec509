//! Langfuse ingestion collector.
//!
//! Each record becomes a `span-create` event. Root records also produce a
//! `trace-create` event so the trace carries the top-level input and
//! output. Events are posted as `{"batch": [...]}` to
//! `{host}/api/public/ingestion` with basic auth.

use async_trait::async_trait;
use promptrail_core::{generate_observation_id, now_utc, LangfuseConfig, TracingDeliveryError};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::collector::TraceCollector;
use crate::record::TraceRecord;

#[derive(Debug, Default, Deserialize)]
struct IngestionResponse {
    #[serde(default)]
    errors: Vec<IngestionError>,
}

#[derive(Debug, Deserialize)]
struct IngestionError {
    #[serde(default)]
    id: String,
    #[serde(default)]
    message: Option<String>,
}

/// Collector posting to a Langfuse project.
#[derive(Debug, Clone)]
pub struct LangfuseCollector {
    config: LangfuseConfig,
    client: Client,
}

impl LangfuseCollector {
    /// Create a collector for the given project.
    #[must_use]
    pub fn new(config: LangfuseConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    fn events(record: &TraceRecord) -> Vec<JsonValue> {
        let timestamp = now_utc().to_rfc3339();
        let mut events = Vec::with_capacity(2);

        if record.is_root() {
            events.push(json!({
                "id": generate_observation_id(),
                "timestamp": timestamp,
                "type": "trace-create",
                "body": {
                    "id": record.trace_id,
                    "name": record.name,
                    "timestamp": record.start_time.to_rfc3339(),
                    "input": record.input,
                    "output": record.output,
                }
            }));
        }

        let mut body = json!({
            "id": record.id,
            "traceId": record.trace_id,
            "parentObservationId": record.parent_id,
            "name": record.name,
            "startTime": record.start_time.to_rfc3339(),
            "endTime": record.end_time.to_rfc3339(),
            "input": record.input,
            "output": record.output,
            "level": "DEFAULT",
        });
        if let Some(error) = &record.error {
            body["level"] = json!("ERROR");
            body["statusMessage"] = json!(error);
        }
        events.push(json!({
            "id": generate_observation_id(),
            "timestamp": timestamp,
            "type": "span-create",
            "body": body,
        }));

        events
    }
}

#[async_trait]
impl TraceCollector for LangfuseCollector {
    async fn export(&self, batch: Vec<TraceRecord>) -> Result<(), TracingDeliveryError> {
        let records = batch.len();
        let events: Vec<JsonValue> = batch.iter().flat_map(Self::events).collect();

        let response = self
            .client
            .post(self.config.url("/api/public/ingestion"))
            .basic_auth(&self.config.public_key, Some(&self.config.secret_key))
            .json(&json!({ "batch": events }))
            .send()
            .await
            .map_err(|e| TracingDeliveryError::new(e.to_string(), records))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TracingDeliveryError::new(
                format!("langfuse returned {status}: {body}"),
                records,
            ));
        }

        let parsed: IngestionResponse = response.json().await.unwrap_or_default();
        if let Some(first) = parsed.errors.first() {
            return Err(TracingDeliveryError::new(
                format!(
                    "{} event(s) rejected, first {}: {}",
                    parsed.errors.len(),
                    first.id,
                    first.message.as_deref().unwrap_or("unknown error")
                ),
                records,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn record(id: &str, parent: Option<&str>, error: Option<&str>) -> TraceRecord {
        TraceRecord {
            id: id.into(),
            trace_id: "trace-1".into(),
            parent_id: parent.map(Into::into),
            name: format!("op-{id}"),
            input: json!({"q": "x"}),
            output: error.is_none().then(|| json!("ok")),
            error: error.map(Into::into),
            start_time: Utc::now(),
            end_time: Utc::now(),
        }
    }

    fn collector(server: &MockServer) -> LangfuseCollector {
        LangfuseCollector::new(LangfuseConfig::new("pk", "sk").with_host(server.uri()))
    }

    #[test]
    fn test_root_record_creates_trace_and_span() {
        let events = LangfuseCollector::events(&record("root", None, None));
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["type"], "trace-create");
        assert_eq!(events[0]["body"]["id"], "trace-1");
        assert_eq!(events[1]["type"], "span-create");
        assert_eq!(events[1]["body"]["traceId"], "trace-1");
    }

    #[test]
    fn test_failed_child_is_error_span() {
        let events = LangfuseCollector::events(&record("child", Some("root"), Some("boom")));
        assert_eq!(events.len(), 1);
        let body = &events[0]["body"];
        assert_eq!(body["parentObservationId"], "root");
        assert_eq!(body["level"], "ERROR");
        assert_eq!(body["statusMessage"], "boom");
    }

    #[tokio::test]
    async fn test_export_posts_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/public/ingestion"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(207).set_body_json(json!({"successes": [], "errors": []})))
            .expect(1)
            .mount(&server)
            .await;

        collector(&server)
            .export(vec![record("root", None, None), record("child", Some("root"), None)])
            .await
            .unwrap();

        let received: Vec<Request> = server.received_requests().await.unwrap();
        let body: JsonValue = serde_json::from_slice(&received[0].body).unwrap();
        assert_eq!(body["batch"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_partial_rejection_is_delivery_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(207).set_body_json(json!({
                "successes": [],
                "errors": [{"id": "e1", "status": 400, "message": "invalid body"}]
            })))
            .mount(&server)
            .await;

        let err = collector(&server)
            .export(vec![record("root", None, None)])
            .await
            .unwrap_err();
        assert_eq!(err.records, 1);
        assert!(err.message.contains("invalid body"));
    }

    #[tokio::test]
    async fn test_unauthorized_is_delivery_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let err = collector(&server)
            .export(vec![record("root", None, None)])
            .await
            .unwrap_err();
        assert!(err.message.contains("401"));
    }
}
