//! Request/response types for the Anthropic Messages API, plus the
//! structured menu-suggestion schema.

use serde::{Deserialize, Serialize};

use lunchline_core::FoodCategory;

/// A chat message.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: &'static str,
    pub content: String,
}

impl Message {
    /// A user-role message.
    #[must_use]
    pub fn user(content: String) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

/// Request body for the Messages API (non-streaming).
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

/// Response body from the Messages API.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub content: Vec<ContentBlock>,
}

impl ChatResponse {
    /// Concatenated text of all text blocks.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// One content block in a response.
#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// A menu suggestion returned by the model.
///
/// The schema mirrors the master-item form: accepted suggestions become
/// catalog entries as-is. `category` is constrained to the closed
/// [`FoodCategory`] set; suggestions outside it fail deserialization and
/// are dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: FoodCategory,
    #[serde(default)]
    pub calories: u32,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
}
