use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{FeedError, Result};
use crate::http::send_checked_json;
use crate::types::{CanonicalRecord, FeedQuery};

/// Generative fallback tier: asked for canonical records directly, so its
/// output needs no normalization pass. Malformed output is a recoverable
/// failure that advances the chain, never a crash.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    fn configured(&self) -> bool {
        true
    }

    async fn generate(&self, query: &FeedQuery) -> Result<Vec<CanonicalRecord>>;
}

/// OpenAI-style chat/completions client producing a JSON array of canonical
/// records from a structured prompt.
#[derive(Clone)]
pub struct OpenAiGenerative {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

impl OpenAiGenerative {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn prompt(query: &FeedQuery) -> String {
        let place = query.location().unwrap_or("the traveller's destination");
        let topic = query.topic().unwrap_or(query.operation());
        format!(
            "List current travel-relevant items about {topic} for {place}. \
             Respond with ONLY a JSON array, no prose. Each element must have: \
             \"title\" (string), \"description\" (string), \
             \"category\" (one of \"safety\", \"weather\", \"health\", \"transport\", \"event\", \"general\"), \
             \"severity\" (one of \"low\", \"medium\", \"high\"), \
             and optionally \"location\" (string)."
        )
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl GenerativeClient for OpenAiGenerative {
    fn configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn generate(&self, query: &FeedQuery) -> Result<Vec<CanonicalRecord>> {
        if !self.configured() {
            return Err(FeedError::NoCredentials);
        }

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: Self::prompt(query),
            }],
            temperature: 0.2,
        };

        let req = self
            .http
            .post(self.chat_completions_url())
            .timeout(self.timeout)
            .bearer_auth(&self.api_key)
            .json(&body);
        let response: ChatResponse = send_checked_json(req).await?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or_else(|| FeedError::MalformedGenerative("empty completion".to_string()))?;

        parse_records(content)
    }
}

/// Extracts the JSON array from the completion text, tolerating code fences
/// and surrounding prose the model was told not to emit but sometimes does.
pub(crate) fn parse_records(content: &str) -> Result<Vec<CanonicalRecord>> {
    let start = content.find('[');
    let end = content.rfind(']');
    let (Some(start), Some(end)) = (start, end) else {
        return Err(FeedError::MalformedGenerative(
            "no JSON array in completion".to_string(),
        ));
    };
    if end < start {
        return Err(FeedError::MalformedGenerative(
            "unbalanced JSON array in completion".to_string(),
        ));
    }

    let records: Vec<CanonicalRecord> = serde_json::from_str(&content[start..=end])
        .map_err(|err| FeedError::MalformedGenerative(err.to_string()))?;
    if records.is_empty() {
        return Err(FeedError::MalformedGenerative(
            "completion contained no records".to_string(),
        ));
    }
    Ok(records)
}
