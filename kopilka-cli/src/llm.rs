use anyhow::{Context, Result, bail};
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::config::LlmSection;

pub const MISSING_KEY_MESSAGE: &str = "API key not set. Please configure the environment variable.";
pub const EMPTY_REPLY_MESSAGE: &str = "Ошибка";

/// Text in, text out. Anything that can answer a system + user prompt pair.
pub trait Advisor {
    fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

/// OpenAI-compatible `/v1/chat/completions` client
#[derive(Debug, Clone)]
pub struct OpenAiAdvisor {
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
}

impl OpenAiAdvisor {
    pub fn new(api_key: impl Into<String>, cfg: &LlmSection) -> Self {
        Self {
            api_key: api_key.into(),
            model: cfg.model.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            temperature: cfg.temperature,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    async fn complete_async(&self, system: &str, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: MsgOut,
        }

        #[derive(Deserialize)]
        struct MsgOut {
            content: Option<String>,
        }

        let body = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: system,
                },
                Msg {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.chars().count(), "sending completion request");

        let client = reqwest::Client::new();
        let resp = client
            .post(self.endpoint())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .context("openai request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("openai error: {status} {txt}");
        }

        let out: Resp = resp.json().await.context("parse openai response")?;
        let content = out
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(content.trim().to_string())
    }
}

impl Advisor for OpenAiAdvisor {
    fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        // Called from inside #[tokio::main]; a nested runtime's block_on would panic.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| handle.block_on(self.complete_async(system, prompt)))
        } else {
            let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
            rt.block_on(self.complete_async(system, prompt))
        }
    }
}

/// Produces the narrative text for a prompt. Never fails: errors become the text itself.
pub enum Narrator {
    Llm(Box<dyn Advisor>),
    Disabled(String),
}

impl Narrator {
    /// Builds from config + stored/env credentials. A missing key, an unreadable
    /// auth file or an unknown provider disables narration instead of failing.
    pub fn from_config(cfg: &LlmSection) -> Self {
        Self::with_credentials(cfg, auth::resolve_api_key())
    }

    fn with_credentials(cfg: &LlmSection, key: Result<Option<String>>) -> Self {
        if cfg.provider != "openai" {
            tracing::warn!(provider = %cfg.provider, "unsupported llm provider");
            return Narrator::Disabled(format!(
                "An error occurred: unsupported llm provider {} (expected: openai)",
                cfg.provider
            ));
        }
        match key {
            Ok(Some(key)) => Narrator::Llm(Box::new(OpenAiAdvisor::new(key, cfg))),
            Ok(None) => Narrator::Disabled(MISSING_KEY_MESSAGE.to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "could not load credentials");
                Narrator::Disabled(format!("An error occurred: {e:#}"))
            }
        }
    }

    pub fn offline() -> Self {
        Narrator::Disabled("LLM disabled (--offline).".to_string())
    }

    pub fn narrate(&self, system: &str, prompt: &str) -> String {
        match self {
            Narrator::Disabled(msg) => msg.clone(),
            Narrator::Llm(advisor) => match advisor.complete(system, prompt) {
                Ok(text) if text.trim().is_empty() => EMPTY_REPLY_MESSAGE.to_string(),
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(error = %e, "advisor call failed");
                    format!("An error occurred: {e}")
                }
            },
        }
    }
}
