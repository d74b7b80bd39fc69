//! Structured financial-health report generated from normalized transactions.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use finsight_core::Transaction;

use crate::client::ExtractClient;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeepInsight {
    #[serde(rename = "executiveSummary")]
    pub executive_summary: String,
    pub metrics: Vec<InsightMetric>,
    pub tips: Vec<ActionableTip>,
    #[serde(rename = "redFlags")]
    pub red_flags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightMetric {
    pub label: String,
    pub value: String,
    /// Keyword hint for presentation: wallet, trend-up, chart, alert, lightning.
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionableTip {
    pub title: String,
    pub description: String,
    pub priority: TipPriority,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TipPriority {
    High,
    Medium,
    Low,
}

impl ExtractClient {
    /// Generate a spending-health report over an analysis session's
    /// transactions.
    pub async fn deep_insights(&self, transactions: &[Transaction]) -> Result<DeepInsight> {
        let data = serde_json::to_string(transactions).context("serialize transactions")?;
        let prompt = format!(
            "Analyze these transactions and provide a structured financial health report.\n\
             \n\
             Focus on:\n\
             1. Executive summary (concise, high-level observation).\n\
             2. 3-4 key metrics (e.g. daily average, top category %, discretionary vs essential).\n\
             3. Actionable tips (3 specific ways to save money).\n\
             4. Red flags (subscription traps, unusual frequencies, duplicate charges).\n\
             \n\
             Data: {data}"
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                // 8192 is enough thinking for this analysis; larger budgets
                // only slow the call down.
                "thinkingConfig": { "thinkingBudget": 8192 },
                "responseMimeType": "application/json",
                "responseSchema": insights_schema()
            }
        });

        let text = self.generate(&body).await?;
        serde_json::from_str(&text)
            .with_context(|| format!("insights response was not valid JSON: {text}"))
    }
}

fn insights_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "executiveSummary": { "type": "STRING" },
            "metrics": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "label": { "type": "STRING" },
                        "value": { "type": "STRING" },
                        "icon": { "type": "STRING", "description": "Keyword: 'wallet', 'trend-up', 'chart', 'alert', 'lightning'" }
                    },
                    "required": ["label", "value", "icon"]
                }
            },
            "tips": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "priority": { "type": "STRING", "enum": ["High", "Medium", "Low"] }
                    },
                    "required": ["title", "description", "priority"]
                }
            },
            "redFlags": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["executiveSummary", "metrics", "tips", "redFlags"]
    })
}
