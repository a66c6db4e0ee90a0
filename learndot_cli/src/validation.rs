//! Input parsing for CLI arguments.

use anyhow::{anyhow, bail, Result};
use learndot_api::types::RecordId;
use serde_json::Value;

/// Maximum accepted length of an entity name, in bytes.
const MAX_ENTITY_LENGTH: usize = 100;

/// Validate an entity name: trimmed, non-empty, one path segment, no control chars.
pub fn validate_entity(input: &str) -> Result<String> {
    let entity = input.trim();
    if entity.is_empty() {
        bail!("entity name is empty");
    }
    if entity.len() > MAX_ENTITY_LENGTH {
        bail!("entity name exceeds maximum length of {} bytes", MAX_ENTITY_LENGTH);
    }
    if entity.chars().any(|c| c == '/' || c.is_control()) {
        bail!("entity name '{}' must be a single path segment", entity);
    }
    Ok(entity.to_string())
}

/// Parse conditions given as a JSON object.
pub fn parse_conditions(input: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(input)
        .map_err(|e| anyhow!("conditions are not valid JSON: {}", e))?;
    if !value.is_object() {
        bail!("conditions must be a JSON object, e.g. '{{\"name\": \"Jane\"}}'");
    }
    Ok(value)
}

/// Parse a `key=value` query parameter.
pub fn parse_param(input: &str) -> Result<(String, String)> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => bail!("query parameter '{}' must look like key=value", input),
    }
}

/// Pages are 1-indexed.
pub fn validate_page(page: u32) -> Result<u32> {
    if page == 0 {
        bail!("page numbers start at 1");
    }
    Ok(page)
}

/// Integer-looking ids are sent as integers, anything else as a string.
pub fn parse_record_id(input: &str) -> Result<RecordId> {
    let id = input.trim();
    if id.is_empty() {
        bail!("record id is empty");
    }
    Ok(match id.parse::<i64>() {
        Ok(n) => RecordId::Int(n),
        Err(_) => RecordId::Str(id.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entity_is_trimmed() {
        assert_eq!(validate_entity("  contacts ").unwrap(), "contacts");
    }

    #[test]
    fn entity_rejects_slashes_and_blanks() {
        assert!(validate_entity("contacts/42").is_err());
        assert!(validate_entity("   ").is_err());
        assert!(validate_entity("con\ntacts").is_err());
        assert!(validate_entity(&"a".repeat(101)).is_err());
    }

    #[test]
    fn conditions_must_be_object() {
        assert_eq!(
            parse_conditions(r#"{"name": "Jane"}"#).unwrap(),
            json!({"name": "Jane"})
        );
        assert!(parse_conditions("[1, 2]").is_err());
        assert!(parse_conditions("{not json}").is_err());
    }

    #[test]
    fn params_split_on_first_equals() {
        assert_eq!(
            parse_param("filter=a=b").unwrap(),
            ("filter".to_string(), "a=b".to_string())
        );
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=x").is_err());
    }

    #[test]
    fn page_zero_rejected() {
        assert!(validate_page(0).is_err());
        assert_eq!(validate_page(3).unwrap(), 3);
    }

    #[test]
    fn record_ids() {
        assert_eq!(parse_record_id("42").unwrap(), RecordId::Int(42));
        assert_eq!(
            parse_record_id("PUP-101").unwrap(),
            RecordId::Str("PUP-101".to_string())
        );
        assert!(parse_record_id(" ").is_err());
    }
}
