//! HTTP client for the external document-understanding service.
//!
//! The service is a black box that returns a best-effort structured guess,
//! possibly wrong, possibly incomplete. Hard failures here are limited to
//! transport errors and unusable (empty/non-JSON) responses; everything
//! about data quality is left to the reconciler.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::{Value, json};

use finsight_core::RawAnalysis;

use crate::parts::FilePart;
use crate::prompt::{extraction_prompt, extraction_schema};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Client for the extraction model. The API key is passed in explicitly;
/// there is deliberately no ambient default credential.
#[derive(Debug, Clone)]
pub struct ExtractClient {
    pub(crate) api_key: String,
    pub(crate) model: String,
    pub(crate) http: reqwest::Client,
}

impl ExtractClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Ask the model to extract transactions and claimed totals from the
    /// given document parts. `attempt` starts at 1; higher values escalate
    /// the prompt after a failed tally.
    pub async fn analyze_statement(
        &self,
        parts: &[FilePart],
        attempt: u32,
    ) -> Result<RawAnalysis> {
        if parts.is_empty() {
            bail!("no readable document parts to analyze");
        }

        let mut content_parts: Vec<Value> = parts
            .iter()
            .map(|p| {
                json!({
                    "inlineData": { "mimeType": p.mime_type, "data": p.data }
                })
            })
            .collect();
        content_parts.push(json!({ "text": extraction_prompt(attempt) }));

        let body = json!({
            "contents": [{ "parts": content_parts }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": extraction_schema()
            }
        });

        let text = self.generate(&body).await?;
        serde_json::from_str(&text)
            .with_context(|| format!("extraction response was not valid JSON: {text}"))
    }

    /// Issue one generateContent call and return the concatenated text parts.
    pub(crate) async fn generate(&self, body: &Value) -> Result<String> {
        let url = format!("{API_BASE}/{}:generateContent", self.model);
        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .context("extraction request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("extraction service error: {status} {txt}");
        }

        let out: GenerateResponse = resp.json().await.context("parse extraction response")?;
        response_text(out)
    }
}

/// generateContent response envelope: candidates, each carrying text parts.
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    text: Option<String>,
}

/// Concatenate every text part across candidates; an empty result means the
/// service produced nothing usable.
fn response_text(resp: GenerateResponse) -> Result<String> {
    let mut s = String::new();
    for c in resp.candidates {
        for p in c.content.parts {
            if let Some(t) = p.text {
                s.push_str(&t);
            }
        }
    }

    let s = s.trim().to_string();
    if s.is_empty() {
        bail!("extraction service returned no text; the document may be unreadable");
    }
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_holds_explicit_credentials() {
        let client = ExtractClient::new("test-key", DEFAULT_MODEL);
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.model, "gemini-3-flash-preview");
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let resp: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "{\"transactions\"" },
                        { "inlineData": { "mimeType": "image/png", "data": "x" } },
                        { "text": ": []}" }
                    ]
                }
            }]
        }))
        .unwrap();
        assert_eq!(response_text(resp).unwrap(), "{\"transactions\": []}");
    }

    #[test]
    fn test_empty_response_is_an_error() {
        let no_candidates: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        let err = response_text(no_candidates).unwrap_err();
        assert!(err.to_string().contains("no text"));

        let blank: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "   " }] } }]
        }))
        .unwrap();
        assert!(response_text(blank).is_err());
    }
}
