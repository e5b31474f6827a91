//! Vision analysis of captured documents via the Gemini `generateContent`
//! endpoint with structured JSON output.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use scanflow_core::{Analysis, AnalysisError, DocumentAnalyzer, EncodedImage};

use crate::schema::{parse_analysis, response_schema, ANALYSIS_INSTRUCTION};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Gemini-backed document analyzer.
pub struct GeminiAnalyzer {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiAnalyzer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Upper bound on the whole call; expiry is reported as
    /// `AnalysisError::Timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn request_body(image: &EncodedImage) -> Value {
        json!({
            "contents": [{ "parts": [
                { "inlineData": { "mimeType": image.mime_type, "data": image.data } },
                { "text": ANALYSIS_INSTRUCTION }
            ]}],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        })
    }

    async fn call(&self, image: &EncodedImage) -> Result<Analysis, AnalysisError> {
        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(image))
            .send()
            .await
            .map_err(|e| AnalysisError::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| AnalysisError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(String::from))
                .unwrap_or(body);
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = extract_text(&body)?;
        debug!(chars = text.len(), "Gemini returned structured output");
        parse_analysis(&text)
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(body: &str) -> Result<String, AnalysisError> {
    let v: Value = serde_json::from_str(body)
        .map_err(|e| AnalysisError::MalformedResponse(format!("response envelope: {e}")))?;

    if let Some(reason) = v["promptFeedback"]["blockReason"].as_str() {
        warn!(reason, "Gemini blocked the prompt");
        return Err(AnalysisError::EmptyResponse);
    }

    let text: String = v["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl DocumentAnalyzer for GeminiAnalyzer {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn analyze(&self, image: &EncodedImage) -> Result<Analysis, AnalysisError> {
        info!(model = %self.model, mime = %image.mime_type, "[Vision] Analyzing document via Gemini");
        match tokio::time::timeout(self.timeout, self.call(image)).await {
            Ok(result) => result,
            Err(_) => Err(AnalysisError::Timeout(self.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanflow_core::Category;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "/v1beta/models/gemini-3-flash-preview:generateContent";

    fn image() -> EncodedImage {
        EncodedImage::from_data_url("data:image/jpeg;base64,/9j/4AAQSkZJRg==").unwrap()
    }

    fn candidate(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    }

    async fn analyzer_for(server: &MockServer) -> GeminiAnalyzer {
        GeminiAnalyzer::new("test-key").with_base_url(server.uri())
    }

    #[test]
    fn request_carries_inline_image_and_schema() {
        let body = GeminiAnalyzer::request_body(&image());
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "/9j/4AAQSkZJRg==");
        assert_eq!(parts[1]["text"], ANALYSIS_INSTRUCTION);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn extract_text_joins_parts() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } }]
        })
        .to_string();
        assert_eq!(extract_text(&body).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn extract_text_reports_blocked_and_empty_responses() {
        let blocked = json!({ "promptFeedback": { "blockReason": "SAFETY" } }).to_string();
        assert!(matches!(extract_text(&blocked), Err(AnalysisError::EmptyResponse)));
        let empty = json!({ "candidates": [] }).to_string();
        assert!(matches!(extract_text(&empty), Err(AnalysisError::EmptyResponse)));
    }

    #[tokio::test]
    async fn analyzes_successful_response() {
        let server = MockServer::start().await;
        let output = json!({
            "title": "Invoice #4412",
            "category": "Receipt",
            "extractedText": "ACME Corp\nTotal: 42.00",
            "summary": "Invoice from ACME Corp.",
            "suggestedFileName": "2024-05-01_ACME_Invoice_4412"
        })
        .to_string();
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate(&output)))
            .expect(1)
            .mount(&server)
            .await;

        let analysis = analyzer_for(&server).await.analyze(&image()).await.unwrap();
        assert_eq!(analysis.title, "Invoice #4412");
        assert_eq!(analysis.category, Category::Receipt);
    }

    #[tokio::test]
    async fn maps_http_errors_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "API key not valid." }
            })))
            .mount(&server)
            .await;

        let err = analyzer_for(&server).await.analyze(&image()).await.unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Api { status: 400, ref message } if message == "API key not valid."
        ));
    }

    #[tokio::test]
    async fn rejects_out_of_set_category() {
        let server = MockServer::start().await;
        let output = json!({
            "title": "Menu",
            "category": "Menu",
            "extractedText": "Soup",
            "summary": "A menu",
            "suggestedFileName": "menu"
        })
        .to_string();
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate(&output)))
            .mount(&server)
            .await;

        let err = analyzer_for(&server).await.analyze(&image()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownCategory(c) if c == "Menu"));
    }

    #[tokio::test]
    async fn rejects_non_json_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = analyzer_for(&server).await.analyze(&image()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn times_out_slow_responses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(candidate("{}"))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let analyzer = analyzer_for(&server)
            .await
            .with_timeout(Duration::from_millis(100));
        let err = analyzer.analyze(&image()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Timeout(d) if d == Duration::from_millis(100)));
    }
}
