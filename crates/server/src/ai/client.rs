//! Anthropic Messages API client for menu ideas and feedback summaries.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::AiConfig;

use super::error::{AiError, ApiErrorResponse};
use super::types::{ChatRequest, ChatResponse, Message, SuggestedItem};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 2048;

const IDEAS_SYSTEM_PROMPT: &str = "You are a corporate-canteen menu planner. \
Respond ONLY with a JSON array, no prose. Each element must have: \
\"name\" (string), \"description\" (string, one sentence), \
\"category\" (one of \"soup\", \"salad\", \"main\", \"side\", \"dessert\", \"drink\"), \
\"calories\" (integer), \"dietary_tags\" (array of strings such as \
\"vegetarian\", \"vegan\", \"gluten-free\").";

const SUMMARY_SYSTEM_PROMPT: &str = "You summarize canteen feedback for the kitchen team. \
Write a short paragraph: overall sentiment first, then recurring themes, then anything \
actionable. Plain prose, no lists, no preamble.";

/// Generative API client.
///
/// Non-streaming only: both features need the complete response before
/// anything is shown.
#[derive(Clone)]
pub struct IdeasClient {
    inner: Arc<IdeasClientInner>,
}

struct IdeasClientInner {
    client: reqwest::Client,
    model: String,
}

impl IdeasClient {
    /// Create a new client.
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(config: &AiConfig) -> Self {
        let api_key = config.api_key.expose_secret();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key).expect("Invalid API key for header"),
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(IdeasClientInner {
                client,
                model: config.model.clone(),
            }),
        }
    }

    /// Ask for `count` menu-item suggestions around a cuisine theme.
    ///
    /// Suggestions that do not conform to the item schema are dropped; a
    /// response with no parsable array yields a parse error the caller is
    /// expected to degrade on.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response contains
    /// no JSON array.
    #[instrument(skip(self), fields(model = %self.inner.model))]
    pub async fn suggest_menu_items(
        &self,
        theme: &str,
        count: usize,
    ) -> Result<Vec<SuggestedItem>, AiError> {
        let prompt = format!(
            "Suggest {count} lunch menu items for the theme \"{theme}\". \
             Spread them across categories where it makes sense."
        );

        let response = self
            .chat(vec![Message::user(prompt)], IDEAS_SYSTEM_PROMPT)
            .await?;
        let text = response.text();
        let json = extract_json_array(&text)
            .ok_or_else(|| AiError::Parse("response contains no JSON array".to_owned()))?;

        // Tolerate single bad elements: parse the array loosely, then each
        // element against the schema.
        let values: Vec<serde_json::Value> = serde_json::from_str(json)
            .map_err(|e| AiError::Parse(format!("invalid JSON array: {e}")))?;
        let items = values
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("dropping malformed suggestion: {e}");
                    None
                }
            })
            .collect();
        Ok(items)
    }

    /// Summarize freeform feedback comments into a short prose paragraph.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, comments), fields(model = %self.inner.model, count = comments.len()))]
    pub async fn summarize_feedback(&self, comments: &[String]) -> Result<String, AiError> {
        let joined = comments
            .iter()
            .map(|c| format!("- {c}"))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!("Summarize this feedback:\n\n{joined}");

        let response = self
            .chat(vec![Message::user(prompt)], SUMMARY_SYSTEM_PROMPT)
            .await?;
        Ok(response.text().trim().to_owned())
    }

    async fn chat(
        &self,
        messages: Vec<Message>,
        system: &str,
    ) -> Result<ChatResponse, AiError> {
        let request = ChatRequest {
            model: self.inner.model.clone(),
            max_tokens: DEFAULT_MAX_TOKENS,
            messages,
            system: Some(system.to_owned()),
        };

        let response = self
            .inner
            .client
            .post(ANTHROPIC_API_URL)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| AiError::Parse(format!("failed to parse response: {e}")))
        } else {
            Err(Self::handle_error_status(status, response).await)
        }
    }

    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> AiError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return AiError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return AiError::Unauthorized("Invalid API key".to_owned());
        }

        match response.text().await {
            Ok(body) => {
                if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                    AiError::Api {
                        error_type: api_error.error.error_type,
                        message: api_error.error.message,
                    }
                } else {
                    AiError::Api {
                        error_type: "unknown".to_owned(),
                        message: body,
                    }
                }
            }
            Err(e) => AiError::Http(e),
        }
    }
}

/// Extract the first JSON array from model output.
///
/// Models wrap JSON in markdown fences often enough that stripping them is
/// table stakes; beyond that, take everything between the first `[` and the
/// last `]`.
fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    text.get(start..=end)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_array_plain() {
        let text = r#"[{"name": "Soup"}]"#;
        assert_eq!(extract_json_array(text), Some(text));
    }

    #[test]
    fn test_extract_json_array_fenced() {
        let text = "Here you go:\n```json\n[{\"name\": \"Soup\"}]\n```\n";
        assert_eq!(extract_json_array(text), Some("[{\"name\": \"Soup\"}]"));
    }

    #[test]
    fn test_extract_json_array_none() {
        assert!(extract_json_array("no json here").is_none());
        assert!(extract_json_array("] backwards [").is_none());
    }

    #[test]
    fn test_ideas_client_is_clone_send_sync() {
        fn assert_clone<T: Clone>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_clone::<IdeasClient>();
        assert_send_sync::<IdeasClient>();
    }
}
