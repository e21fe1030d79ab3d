//! Narrative oracle backed by an OpenAI-compatible chat-completions API.

use std::time::Duration;

use async_trait::async_trait;
use nf_core::{Action, Attributes, Background, GameState, Gender, Race, VampireClass};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::decode::{decode_attributes, decode_outcome};
use super::prompt::{
    action_outcome_prompt, attributes_prompt, chronicle_prompt, memory_summary_prompt,
};
use super::{NarrativeOracle, OracleError, OracleResult};
use crate::config::OracleConfig;
use crate::outcome::ActionOutcome;

const MEMORY_TEMPERATURE: f32 = 0.2;
const CHRONICLE_TEMPERATURE: f32 = 0.75;
const ATTRIBUTES_TEMPERATURE: f32 = 0.7;

/// Client for a `/v1/chat/completions` endpoint.
#[derive(Clone)]
pub struct ChatOracle {
    client: Client,
    config: OracleConfig,
}

impl ChatOracle {
    /// Create a client from the given settings.
    pub fn new(config: OracleConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, config }
    }

    /// Create a client configured from the environment.
    pub fn from_env() -> Self {
        Self::new(OracleConfig::from_env())
    }

    /// The active settings.
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    async fn complete(&self, prompt: String, temperature: f32, json: bool) -> OracleResult<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            temperature,
            response_format: json.then(|| ResponseFormat {
                kind: "json_object".to_string(),
            }),
        };

        let mut builder = self
            .client
            .post(format!("{}/v1/chat/completions", self.config.base_url))
            .json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| OracleError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Request(format!("{status}: {body}")));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Malformed(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| OracleError::Malformed("empty completion".to_string()))
    }
}

#[async_trait]
impl NarrativeOracle for ChatOracle {
    async fn generate_action_outcome(
        &self,
        state: &GameState,
        action: Action,
    ) -> OracleResult<ActionOutcome> {
        let prompt = action_outcome_prompt(state, action);
        let text = self.complete(prompt, self.config.temperature, true).await?;
        decode_outcome(&text)
    }

    async fn generate_memory_summary(
        &self,
        action: Action,
        description: &str,
    ) -> OracleResult<String> {
        let text = self
            .complete(
                memory_summary_prompt(action, description),
                MEMORY_TEMPERATURE,
                false,
            )
            .await?;
        Ok(text.replace('"', ""))
    }

    async fn generate_chronicle_entry(&self, state: &GameState) -> OracleResult<String> {
        self.complete(chronicle_prompt(state), CHRONICLE_TEMPERATURE, false)
            .await
    }

    async fn generate_initial_attributes(
        &self,
        gender: Gender,
        race: Race,
        class: VampireClass,
        background: Background,
    ) -> OracleResult<Attributes> {
        let prompt = attributes_prompt(gender, race, class, background);
        let text = self.complete(prompt, ATTRIBUTES_TEMPERATURE, true).await?;
        decode_attributes(&text)
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_json_mode() {
        let req = ChatRequest {
            model: "m".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
            temperature: 0.5,
            response_format: Some(ResponseFormat {
                kind: "json_object".to_string(),
            }),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn response_parses_first_choice() {
        let body: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":"ok"}}]}"#)
                .unwrap();
        assert_eq!(body.choices[0].message.content.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_request_error() {
        let oracle = ChatOracle::new(OracleConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..OracleConfig::default()
        });
        let err = oracle
            .generate_memory_summary(Action::HuntForBlood, "x")
            .await
            .unwrap_err();
        assert!(matches!(err, OracleError::Request(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_rolls_fallback_attributes() {
        let oracle = ChatOracle::new(OracleConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..OracleConfig::default()
        });
        let attributes = crate::creation::roll_attributes(
            &oracle,
            Gender::Female,
            Race::Sanguine,
            VampireClass::Alchemist,
            Background::OccultScholar,
        )
        .await;
        assert_eq!(attributes, Attributes::fallback());
    }
}
