//! Hosted inference client and the remote classifier built on it

use crate::classifier::Classifier;
use crate::config::{InferenceConfig, RequestStyle, RetryPolicy};
use crate::normalize::try_normalize;
use async_trait::async_trait;
use reqwest::StatusCode;
use revlens_core::{AnalysisKind, AnalysisRequest, AnalysisResult, Credential, Error, Result};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Instruction prepended to the review for a generative sentiment model
pub const SENTIMENT_PROMPT: &str = "Classify this review as positive, negative, or neutral: ";

/// Instruction prepended to the review for a generative noun-level model
pub const NOUN_PROMPT: &str =
    "Count the nouns in this review and return only High (>15), Medium (6-15), or Low (<6): ";

/// Longest upstream error text kept in an error message
const MAX_ERROR_TEXT: usize = 200;

/// Outcome of a single HTTP attempt that did not produce a payload
#[derive(Debug)]
enum AttemptError {
    /// Not worth repeating: surfaced statuses, 4xx, undecodable bodies
    Fatal(Error),
    /// Transport errors and 5xx
    Retryable(Error),
    /// 503 carrying the server's estimate of model load time
    WarmingUp { estimated_secs: f64, message: String },
}

/// Thin client for `POST <base_url>/<model>` with bounded retries
#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl InferenceClient {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: config.retry_policy(),
        })
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.base_url, model.trim_start_matches('/'))
    }

    /// Post `body` to `model` and return the decoded JSON payload.
    ///
    /// Retries transport errors and 5xx up to `max_retries` times with a
    /// fixed delay. A 503 with `estimated_time` sleeps for the (capped)
    /// estimate without using a retry, at most `max_warmups` times.
    pub async fn infer(
        &self,
        model: &str,
        body: &Value,
        credential: Option<&Credential>,
    ) -> Result<Value> {
        let url = self.model_url(model);
        let mut retries = 0;
        let mut warmups = 0;

        loop {
            let failure = match self.attempt(&url, body, credential).await {
                Ok(payload) => return Ok(payload),
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Retryable(e)) => e,
                Err(AttemptError::WarmingUp {
                    estimated_secs,
                    message,
                }) => {
                    let wait = self.retry.warmup_wait(estimated_secs);
                    match wait {
                        Some(wait) if warmups < self.retry.max_warmups => {
                            warmups += 1;
                            info!(
                                model,
                                wait_ms = wait.as_millis() as u64,
                                warmup = warmups,
                                "model is loading, waiting"
                            );
                            tokio::time::sleep(wait).await;
                            continue;
                        }
                        _ => Error::remote(format!("HTTP 503: {message}")),
                    }
                }
            };

            if retries >= self.retry.max_retries {
                warn!(model, attempts = retries + 1, error = %failure, "giving up on remote call");
                return Err(failure);
            }

            retries += 1;
            debug!(model, retry = retries, error = %failure, "retrying remote call");
            tokio::time::sleep(self.retry.delay).await;
        }
    }

    async fn attempt(
        &self,
        url: &str,
        body: &Value,
        credential: Option<&Credential>,
    ) -> std::result::Result<Value, AttemptError> {
        let mut request = self.client.post(url).json(body);
        if let Some(credential) = credential {
            request = request.bearer_auth(credential.expose());
        }

        let response = request
            .send()
            .await
            .map_err(|e| AttemptError::Retryable(Error::remote(format!("request failed: {e}"))))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            AttemptError::Retryable(Error::remote(format!("failed to read response: {e}")))
        })?;

        if status.is_success() {
            return serde_json::from_str(&text).map_err(|e| {
                AttemptError::Fatal(Error::remote(format!("response is not JSON: {e}")))
            });
        }

        Err(classify_status(status, &text))
    }
}

fn classify_status(status: StatusCode, text: &str) -> AttemptError {
    let payload: Option<Value> = serde_json::from_str(text).ok();
    let message = error_message(payload.as_ref(), text, status);
    let code = status.as_u16();

    match code {
        402 | 429 => AttemptError::Fatal(Error::RateLimited {
            status: code,
            message,
        }),
        401 | 403 => AttemptError::Fatal(Error::Unauthorized {
            status: code,
            message,
        }),
        503 => match payload
            .as_ref()
            .and_then(|p| p.get("estimated_time"))
            .and_then(Value::as_f64)
        {
            Some(estimated_secs) => AttemptError::WarmingUp {
                estimated_secs,
                message,
            },
            None => AttemptError::Retryable(Error::remote(format!("HTTP {code}: {message}"))),
        },
        _ if status.is_server_error() => {
            AttemptError::Retryable(Error::remote(format!("HTTP {code}: {message}")))
        }
        _ => AttemptError::Fatal(Error::remote(format!("HTTP {code}: {message}"))),
    }
}

/// The `error` field of a JSON body, else the raw body, else the reason phrase
fn error_message(payload: Option<&Value>, text: &str, status: StatusCode) -> String {
    let from_json = payload
        .and_then(|p| p.get("error"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty());

    let message = match from_json {
        Some(message) => message,
        None if !text.trim().is_empty() => text.trim(),
        None => status.canonical_reason().unwrap_or("no details"),
    };

    truncate(message, MAX_ERROR_TEXT)
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Classifier backed by the hosted inference API
pub struct RemoteClassifier {
    name: String,
    client: InferenceClient,
    sentiment_model: String,
    noun_model: String,
    sentiment_style: RequestStyle,
    noun_style: RequestStyle,
    credential: Option<Credential>,
}

impl RemoteClassifier {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        Ok(Self {
            name: "remote".to_string(),
            client: InferenceClient::new(config)?,
            sentiment_model: config.sentiment_model.clone(),
            noun_model: config.noun_model.clone(),
            sentiment_style: config.sentiment_style,
            noun_style: config.noun_style,
            credential: None,
        })
    }

    /// Attach (or drop) the bearer token sent with each request
    pub fn with_credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub fn model_for(&self, kind: AnalysisKind) -> &str {
        match kind {
            AnalysisKind::Sentiment => &self.sentiment_model,
            AnalysisKind::NounLevel => &self.noun_model,
        }
    }

    fn style_for(&self, kind: AnalysisKind) -> RequestStyle {
        match kind {
            AnalysisKind::Sentiment => self.sentiment_style,
            AnalysisKind::NounLevel => self.noun_style,
        }
    }

    /// JSON body for `request` in the configured style
    pub fn request_body(&self, request: &AnalysisRequest) -> Value {
        match self.style_for(request.kind) {
            RequestStyle::Direct => json!({ "inputs": request.text }),
            RequestStyle::Prompt => {
                let prompt = match request.kind {
                    AnalysisKind::Sentiment => SENTIMENT_PROMPT,
                    AnalysisKind::NounLevel => NOUN_PROMPT,
                };
                json!({
                    "inputs": format!("{prompt}{}", request.text),
                    "parameters": { "return_full_text": false },
                })
            }
        }
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let model = self.model_for(request.kind);
        let body = self.request_body(request);

        debug!(model, kind = %request.kind, "calling hosted model");
        let payload = self
            .client
            .infer(model, &body, self.credential.as_ref())
            .await?;

        try_normalize(request.kind, &payload, &request.text)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(style: RequestStyle) -> RemoteClassifier {
        let config = InferenceConfig {
            sentiment_style: style,
            noun_style: style,
            ..InferenceConfig::default()
        };
        RemoteClassifier::new(&config).unwrap()
    }

    #[test]
    fn test_direct_body() {
        let remote = classifier(RequestStyle::Direct);
        let body = remote.request_body(&AnalysisRequest::sentiment("Great taste"));
        assert_eq!(body, json!({"inputs": "Great taste"}));
    }

    #[test]
    fn test_prompt_body() {
        let remote = classifier(RequestStyle::Prompt);
        let body = remote.request_body(&AnalysisRequest::noun_level("The lid broke"));
        assert_eq!(
            body["inputs"],
            json!(format!("{NOUN_PROMPT}The lid broke"))
        );
        assert_eq!(body["parameters"]["return_full_text"], json!(false));
    }

    #[test]
    fn test_model_url() {
        let config = InferenceConfig {
            base_url: "http://127.0.0.1:9000/models/".to_string(),
            ..InferenceConfig::default()
        };
        let client = InferenceClient::new(&config).unwrap();
        assert_eq!(
            client.model_url("vblagoje/bert-english-uncased-finetuned-pos"),
            "http://127.0.0.1:9000/models/vblagoje/bert-english-uncased-finetuned-pos"
        );
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, r#"{"error":"quota"}"#),
            AttemptError::Fatal(Error::RateLimited { status: 429, .. })
        ));
        assert!(matches!(
            classify_status(StatusCode::PAYMENT_REQUIRED, ""),
            AttemptError::Fatal(Error::RateLimited { status: 402, .. })
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, ""),
            AttemptError::Fatal(Error::Unauthorized { status: 403, .. })
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, "Not Found"),
            AttemptError::Fatal(Error::RemoteUnavailable(_))
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, ""),
            AttemptError::Retryable(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE, "{}"),
            AttemptError::Retryable(_)
        ));
        assert!(matches!(
            classify_status(
                StatusCode::SERVICE_UNAVAILABLE,
                r#"{"error":"Model is currently loading","estimated_time":12.5}"#
            ),
            AttemptError::WarmingUp { estimated_secs, .. } if estimated_secs == 12.5
        ));
    }

    #[test]
    fn test_error_message_sources() {
        let payload = json!({"error": "  Model not found  "});
        assert_eq!(
            error_message(Some(&payload), "", StatusCode::NOT_FOUND),
            "Model not found"
        );
        assert_eq!(
            error_message(None, "upstream exploded", StatusCode::BAD_GATEWAY),
            "upstream exploded"
        );
        assert_eq!(
            error_message(None, "", StatusCode::BAD_GATEWAY),
            "Bad Gateway"
        );
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
