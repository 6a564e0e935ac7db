use crate::config::Settings;
use crate::domain::contract::LlmRecommendation;
use crate::domain::recommendation::Recommendation;
use crate::llm::error::{ReasoningError, ReasoningErrorKind};
use crate::llm::json;
use crate::llm::prompt::RenderedPrompt;
use crate::llm::{LlmClient, Provider};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-3-5-sonnet-latest";
const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

const TOOL_NAME_EMIT_RECOMMENDATION: &str = "emit_recommendation";

#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_anthropic_api_key()?.to_string();
        let base_url =
            std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let max_tokens = std::env::var("ANTHROPIC_MAX_TOKENS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);

        let timeout_secs = std::env::var("ANTHROPIC_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            http,
            api_key,
            base_url,
            model,
            max_tokens,
        })
    }

    async fn create_message(
        &self,
        req: CreateMessageRequest,
    ) -> anyhow::Result<CreateMessageResponse> {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(&self.api_key)?);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let res = self
            .http
            .post(url)
            .headers(headers)
            .json(&req)
            .send()
            .await
            .map_err(|e| ReasoningError {
                provider: Provider::Anthropic,
                kind: ReasoningErrorKind::Transport,
                detail: format!("request failed: {e}"),
                raw_output: None,
            })?;

        let status = res.status();
        let text = res.text().await.map_err(|e| ReasoningError {
            provider: Provider::Anthropic,
            kind: ReasoningErrorKind::Transport,
            detail: format!("failed to read response body: {e}"),
            raw_output: None,
        })?;

        if !status.is_success() {
            return Err(ReasoningError {
                provider: Provider::Anthropic,
                kind: ReasoningErrorKind::Transport,
                detail: format!("status={status}"),
                raw_output: Some(text),
            }
            .into());
        }

        let parsed =
            serde_json::from_str::<CreateMessageResponse>(&text).map_err(|e| ReasoningError {
                provider: Provider::Anthropic,
                kind: ReasoningErrorKind::Schema,
                detail: format!("failed to decode response envelope: {e}"),
                raw_output: Some(text),
            })?;
        Ok(parsed)
    }

    fn tools() -> Vec<Tool> {
        // Minimal JSON schema for the exact reply contract.
        let schema = serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["recommendation"],
            "properties": {
                "recommendation": {
                    "type": "string",
                    "description": "The recommendation, including whether to buy or sell, and the reasoning behind it"
                }
            }
        });

        vec![Tool {
            name: TOOL_NAME_EMIT_RECOMMENDATION,
            description: "Emit the final recommendation as structured JSON",
            input_schema: schema,
        }]
    }

    fn tool_choice() -> ToolChoice {
        ToolChoice::Tool {
            name: TOOL_NAME_EMIT_RECOMMENDATION,
        }
    }

    fn system_prompt(rendered: &RenderedPrompt) -> String {
        [
            rendered.system.as_str(),
            "",
            "Return ONLY valid JSON with a single \"recommendation\" string key.",
            "Do not wrap in markdown. Do not include any extra keys.",
        ]
        .join("\n")
    }

    fn response_text(res: &CreateMessageResponse) -> String {
        let mut out = String::new();
        for block in &res.content {
            match block {
                ContentBlock::Text { text } => {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(text);
                }
                ContentBlock::ToolUse { .. } => {
                    // Prefer tool output parsing when tools are enabled.
                    // Callers should use `response_tool_recommendation`.
                    continue;
                }
                ContentBlock::Thinking { .. } | ContentBlock::RedactedThinking { .. } => {
                    // Ignore.
                }
                ContentBlock::Unknown => {
                    // Ignore unknown blocks.
                }
            }
        }
        out
    }

    fn response_tool_recommendation(
        res: &CreateMessageResponse,
    ) -> anyhow::Result<Option<LlmRecommendation>> {
        for block in &res.content {
            if let ContentBlock::ToolUse { name, input, .. } = block {
                if name == TOOL_NAME_EMIT_RECOMMENDATION {
                    let parsed = serde_json::from_value::<LlmRecommendation>(input.clone())
                        .map_err(|e| ReasoningError {
                            provider: Provider::Anthropic,
                            kind: ReasoningErrorKind::Schema,
                            detail: format!("failed to decode tool_use.input: {e}"),
                            raw_output: Some(input.to_string()),
                        })?;
                    return Ok(Some(parsed));
                }
            }
        }
        Ok(None)
    }
}

#[async_trait::async_trait]
impl LlmClient for AnthropicClient {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    // One attempt per invocation: no retries, no repair loop.
    async fn generate_recommendation(
        &self,
        prompt: RenderedPrompt,
    ) -> anyhow::Result<Recommendation> {
        let req = CreateMessageRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: Some(Self::system_prompt(&prompt)),
            messages: vec![Message {
                role: "user",
                content: prompt.user,
            }],
            tools: Some(Self::tools()),
            tool_choice: Some(Self::tool_choice()),
        };

        let res = self.create_message(req).await?;

        // Tool output path.
        if let Some(reply) = Self::response_tool_recommendation(&res)? {
            return reply
                .validate_and_into_recommendation()
                .map_err(|e| invalid_reply_error(&e.to_string(), None));
        }

        // Fallback to text (should be rare with a forced tool choice).
        let text = Self::response_text(&res);
        json::parse_recommendation(&text)
            .map_err(|e| invalid_reply_error(&format!("{e:#}"), Some(text)))
    }
}

fn invalid_reply_error(detail: &str, raw_output: Option<String>) -> anyhow::Error {
    ReasoningError {
        provider: Provider::Anthropic,
        kind: ReasoningErrorKind::Schema,
        detail: detail.to_string(),
        raw_output,
    }
    .into()
}

#[derive(Debug, Clone, Serialize)]
struct CreateMessageRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,

    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
}

#[derive(Debug, Clone, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CreateMessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Serialize)]
struct Tool {
    name: &'static str,
    description: &'static str,
    input_schema: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
enum ToolChoice {
    #[serde(rename = "tool")]
    Tool { name: &'static str },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(rename = "tool_use")]
    ToolUse {
        #[serde(default)]
        id: String,
        #[serde(default)]
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },

    #[serde(rename = "thinking")]
    Thinking {
        #[serde(default)]
        thinking: String,
        #[serde(default)]
        signature: String,
    },

    #[serde(rename = "redacted_thinking")]
    RedactedThinking {
        #[serde(default)]
        data: String,
    },

    #[serde(other)]
    Unknown,
}
