use lazy_static::lazy_static;
use scraper::{Html, Selector};
use serde_json::Value;

lazy_static! {
    static ref JSON_LD: Selector =
        Selector::parse("script[type='application/ld+json']").expect("valid JSON-LD selector");
}

/// Every JSON-LD block in document order, parsed or not.
pub fn blocks(document: &Html) -> Vec<serde_json::Result<Value>> {
    document
        .select(&JSON_LD)
        .map(|script| serde_json::from_str::<Value>(script.text().collect::<String>().trim()))
        .collect()
}

/// The first JSON-LD block, `None` when the page has none.
pub fn first_block(document: &Html) -> Option<serde_json::Result<Value>> {
    blocks(document).into_iter().next()
}

/// First object whose `@type` is `type_name`, looking inside top-level
/// arrays too. Malformed blocks are skipped.
pub fn find_typed(document: &Html, type_name: &str) -> Option<Value> {
    blocks(document)
        .into_iter()
        .filter_map(|block| block.ok())
        .flat_map(|value| match value {
            Value::Array(items) => items,
            other => vec![other],
        })
        .find(|value| has_type(value, type_name))
}

fn has_type(value: &Value, type_name: &str) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t == type_name,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(type_name)),
        _ => false,
    }
}

/// Non-empty string field of a JSON-LD object.
pub fn string_field(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
