//! Prompt and response-schema construction for the extraction call.

use serde_json::{Value, json};

/// Build the extraction instruction text. Attempts after the first get an
/// escalated preamble telling the model its previous pass failed the tally.
pub fn extraction_prompt(attempt: u32) -> String {
    let retry = if attempt > 1 {
        format!(
            "\n\nRETRY ATTEMPT {attempt}: Previous extraction did not match totals.\n\
             - DOUBLE-CHECK every single transaction line\n\
             - Verify you haven't missed any small transactions\n\
             - Ensure decimal points are correct\n\
             - Make sure the reportedTotal matches the GRAND TOTAL on the statement exactly\n\
             - Count transactions carefully - missing even one will cause mismatch\n"
        )
    } else {
        String::new()
    };

    format!(
        "ROLE: ELITE FINANCIAL AUDITOR.\n\
         \n\
         OBJECTIVE: Extract credit card statement data with 100% MATHEMATICAL CONSISTENCY.{retry}\n\
         \n\
         CRITICAL INSTRUCTION - TALLY VERIFICATION:\n\
         1. Extract EVERY line item expense from the statement. Do not skip any.\n\
         2. For each transaction: date (YYYY-MM-DD), description, amount (number), currency (e.g. USD, EUR, PLN), category.\n\
         3. Find \"Total New Balance\", \"Total Purchases\", \"Total Amount Due\" or equivalent on the statement - this is reportedTotal.\n\
         4. The sum of ALL extracted transaction amounts MUST equal reportedTotal. If not, you missed transactions - re-scan line by line.\n\
         \n\
         EXTRACTION RULES:\n\
         - Include ALL expense/debit transactions. Exclude only payments, credits, refunds.\n\
         - Use numeric amount (e.g. 123.45), not strings. Preserve decimals.\n\
         - Currency: use the symbol/code from the statement (USD, EUR, PLN, GBP, etc.).\n\
         \n\
         CATEGORY CLASSIFICATION (choose the most specific):\n\
         1. INSURANCE - insurance premiums and policy payments of any kind.\n\
         2. INSTALLMENT - fixed payment plans (device installments, buy-now-pay-later, loan repayments). NOT subscriptions.\n\
         3. RECURRING - subscriptions and memberships (streaming, software, gyms, utility bills).\n\
         4. FOOD & DINING - restaurants, groceries, delivery.\n\
         5. TRANSPORTATION - fuel, parking, ride-sharing, public transport, flights, hotels.\n\
         6. SHOPPING - retail and online purchases.\n\
         7. ENTERTAINMENT - movies, events, gaming, one-time media purchases.\n\
         8. HEALTHCARE - doctors, pharmacy, dental, prescriptions.\n\
         9. OTHER - anything that doesn't fit above.\n\
         \n\
         OUTPUT JSON:\n\
         {{\n\
           \"transactions\": [{{date, description, amount, currency, category}}],\n\
           \"summaries\": [{{currency, reportedTotal, calculatedTotal}}]\n\
         }}\n\
         IMPORTANT: Return exactly ONE summary per currency. reportedTotal = the GRAND TOTAL printed on the statement (e.g. Total Purchases, Total Amount Due, New Balance) that equals the sum of ALL extracted transactions in that currency."
    )
}

/// Response schema constraining the extraction output to the raw
/// transactions/summaries payload.
pub fn extraction_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "transactions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "date": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "amount": { "type": "NUMBER" },
                        "currency": { "type": "STRING" },
                        "category": { "type": "STRING" }
                    },
                    "required": ["date", "description", "amount", "currency", "category"]
                }
            },
            "summaries": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "currency": { "type": "STRING" },
                        "reportedTotal": { "type": "NUMBER", "description": "The grand total explicitly printed on the document" },
                        "calculatedTotal": { "type": "NUMBER", "description": "The sum of the extracted transactions" }
                    },
                    "required": ["currency", "reportedTotal", "calculatedTotal"]
                }
            }
        },
        "required": ["transactions", "summaries"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_attempt_has_no_retry_block() {
        let p = extraction_prompt(1);
        assert!(!p.contains("RETRY ATTEMPT"));
        assert!(p.contains("TALLY VERIFICATION"));
    }

    #[test]
    fn test_later_attempts_escalate() {
        let p = extraction_prompt(3);
        assert!(p.contains("RETRY ATTEMPT 3"));
        assert!(p.contains("DOUBLE-CHECK"));
    }

    #[test]
    fn test_schema_requires_both_arrays() {
        let schema = extraction_schema();
        assert_eq!(schema["required"], serde_json::json!(["transactions", "summaries"]));
        assert_eq!(
            schema["properties"]["summaries"]["items"]["required"][1],
            "reportedTotal"
        );
    }
}
