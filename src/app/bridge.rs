// Cerebro - app/bridge.rs
//
// HTTP implementation of the natural-language query bridge against a
// Gemini-style `generateContent` endpoint.
//
// One attempt per query, bounded by the configured timeout. No retry.

use crate::core::model::QueryDescriptor;
use crate::core::query::{parse_descriptor_json, DisabledBridge, QueryBridge};
use crate::platform::config::BridgeConfig;
use crate::util::error::BridgeError;
use std::time::Duration;

/// Request header carrying the API key. Kept out of the URL so transport
/// errors, which print the URL, never expose it.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Bridge backed by a remote generative-language model.
pub struct GeminiBridge {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiBridge {
    /// Create a bridge from configuration.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if the configured key variable is unset or
    /// empty, or `Http` if the client cannot be built.
    pub fn new(config: &BridgeConfig) -> Result<Self, BridgeError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| BridgeError::MissingApiKey {
                env_var: config.api_key_env.clone(),
            })?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl QueryBridge for GeminiBridge {
    fn translate(&self, text: &str) -> Result<QueryDescriptor, BridgeError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": build_prompt(text) }] }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        let response = self
            .client
            .post(self.url())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().unwrap_or_default();
            return Err(BridgeError::Status {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let json: serde_json::Value = response.json()?;
        let candidate = candidate_text(&json)?;
        parse_descriptor_json(candidate)
    }
}

/// Prompt asking the model for a JSON filter with year/month/text fields.
pub fn build_prompt(query: &str) -> String {
    format!(
        "You are Cerebro. Convert query: \"{query}\" to JSON filter.\n\
         Fields: year(num), month(str), text(str).\n\
         Example: \"1995 issues\" -> {{\"year\": 1995}}\n\
         Example: \"Fall of X\" -> {{\"text\": \"fall of x\"}}\n\
         Example: \"Uncollected\" -> {{\"text\": \"uncollected\"}}\n"
    )
}

/// Pull `candidates[0].content.parts[0].text` out of a response envelope.
pub fn candidate_text(json: &serde_json::Value) -> Result<&str, BridgeError> {
    json.pointer("/candidates/0/content/parts/0/text")
        .and_then(|t| t.as_str())
        .ok_or_else(|| BridgeError::MalformedEnvelope {
            reason: "missing candidates[0].content.parts[0].text".to_string(),
        })
}

/// Build the bridge to use for this run.
///
/// Disabled config, `--offline`, or a missing API key all produce a
/// `DisabledBridge`; queries then resolve locally.
pub fn create_bridge(config: &BridgeConfig, offline: bool) -> Box<dyn QueryBridge> {
    if offline || !config.enabled {
        tracing::debug!(offline, enabled = config.enabled, "Query bridge disabled");
        return Box::new(DisabledBridge);
    }
    match GeminiBridge::new(config) {
        Ok(bridge) => {
            tracing::debug!(model = %config.model, "Query bridge ready");
            Box::new(bridge)
        }
        Err(e) => {
            tracing::info!(reason = %e, "Query bridge unavailable; using substring search");
            Box::new(DisabledBridge)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_text_extracted() {
        let json = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"year\": 1991}" }] } }]
        });
        assert_eq!(candidate_text(&json).unwrap(), "{\"year\": 1991}");
        assert_eq!(
            parse_descriptor_json(candidate_text(&json).unwrap()).unwrap(),
            QueryDescriptor::for_year(1991)
        );
    }

    #[test]
    fn test_candidate_text_missing() {
        for json in [
            serde_json::json!({}),
            serde_json::json!({ "candidates": [] }),
            serde_json::json!({ "candidates": [{ "content": { "parts": [{ "text": 7 }] } }] }),
            serde_json::json!({ "error": { "code": 400 } }),
        ] {
            assert!(matches!(
                candidate_text(&json),
                Err(BridgeError::MalformedEnvelope { .. })
            ));
        }
    }

    #[test]
    fn test_prompt_embeds_query() {
        let prompt = build_prompt("Fall of X");
        assert!(prompt.contains("Convert query: \"Fall of X\""));
        assert!(prompt.contains("{\"year\": 1995}"));
    }

    #[test]
    fn test_missing_api_key_reported() {
        let config = BridgeConfig {
            api_key_env: "CEREBRO_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            GeminiBridge::new(&config),
            Err(BridgeError::MissingApiKey { .. })
        ));
    }

    #[test]
    fn test_unreachable_endpoint_fails_without_panicking() {
        std::env::set_var("CEREBRO_TEST_UNREACHABLE_KEY", "k");
        let config = BridgeConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            api_key_env: "CEREBRO_TEST_UNREACHABLE_KEY".to_string(),
            timeout_secs: 2,
            ..Default::default()
        };
        let bridge = GeminiBridge::new(&config).unwrap();
        assert!(bridge.translate("Fall of X").is_err());
    }

    #[test]
    fn test_transport_error_does_not_leak_api_key() {
        std::env::set_var("CEREBRO_TEST_SECRET_KEY", "SUPERSECRET123");
        let config = BridgeConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            api_key_env: "CEREBRO_TEST_SECRET_KEY".to_string(),
            timeout_secs: 2,
            ..Default::default()
        };
        let bridge = GeminiBridge::new(&config).unwrap();
        let err = bridge.translate("Fall of X").unwrap_err();
        assert!(matches!(err, BridgeError::Http(_)));
        assert!(!err.to_string().contains("SUPERSECRET123"));
        assert!(!format!("{err:?}").contains("SUPERSECRET123"));
        assert!(!err.to_string().contains("127.0.0.1"));
    }

    #[test]
    fn test_offline_forces_disabled_bridge() {
        let bridge = create_bridge(&BridgeConfig::default(), true);
        assert!(matches!(
            bridge.translate("anything"),
            Err(BridgeError::Unconfigured)
        ));
    }
}
