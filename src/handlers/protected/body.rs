// handlers/protected/body.rs - JSON request bodies for category/item writes
//
// Bodies are read as raw bytes so an absent or malformed body still gets an
// error envelope instead of the framework's plain-text rejection.

use axum::body::Bytes;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::services::{CategoryInput, ItemInput};

pub fn json_object(body: &Bytes) -> Result<Map<String, Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::bad_request("Request body is empty"));
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::bad_request("Request body must be a JSON object")),
        Err(e) => Err(ApiError::invalid_json(format!("Invalid JSON body: {}", e))),
    }
}

pub fn category_input(body: &Bytes) -> Result<CategoryInput, ApiError> {
    let map = json_object(body)?;
    let input = CategoryInput {
        name: text_field(&map, "name")?,
        description: text_field(&map, "description")?,
    };

    if input.is_empty() {
        return Err(ApiError::bad_request(
            "No recognized fields in request body (expected name, description)",
        ));
    }
    Ok(input)
}

pub fn item_input(body: &Bytes) -> Result<ItemInput, ApiError> {
    let map = json_object(body)?;
    let input = ItemInput {
        name: text_field(&map, "name")?,
        price: price_field(&map)?,
        description: text_field(&map, "description")?,
        category_id: None,
    };

    if input.is_empty() {
        return Err(ApiError::bad_request(
            "No recognized fields in request body (expected name, description, price)",
        ));
    }
    Ok(input)
}

fn text_field(map: &Map<String, Value>, key: &str) -> Result<Option<String>, ApiError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(field_error(key, format!("'{}' must be a string", key))),
    }
}

/// Prices may arrive as JSON strings or numbers. An explicit `null` clears
/// the price, the same as a blank string.
fn price_field(map: &Map<String, Value>) -> Result<Option<String>, ApiError> {
    match map.get("price") {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(String::new())),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(field_error("price", "'price' must be a string or number")),
    }
}

fn field_error(field: &str, message: impl Into<String>) -> ApiError {
    let message = message.into();
    let mut field_errors = std::collections::HashMap::new();
    field_errors.insert(field.to_string(), message.clone());
    ApiError::validation_error(message, Some(field_errors))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(s: &'static str) -> Bytes {
        Bytes::from_static(s.as_bytes())
    }

    #[test]
    fn empty_and_non_object_bodies_are_rejected() {
        assert!(matches!(category_input(&bytes("")), Err(ApiError::BadRequest(_))));
        assert!(matches!(category_input(&bytes("  \n")), Err(ApiError::BadRequest(_))));
        assert!(matches!(category_input(&bytes("[1,2]")), Err(ApiError::BadRequest(_))));
        assert!(matches!(category_input(&bytes("{nope")), Err(ApiError::InvalidJson(_))));
    }

    #[test]
    fn unrecognized_keys_only_is_rejected() {
        assert!(matches!(category_input(&bytes("{}")), Err(ApiError::BadRequest(_))));
        assert!(matches!(
            item_input(&bytes(r#"{"colour": "red"}"#)),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn numeric_price_is_accepted() {
        let input = item_input(&bytes(r#"{"price": 12.5, "extra": true}"#)).unwrap();
        assert_eq!(input.price.as_deref(), Some("12.5"));
        assert_eq!(input.name, None);
    }

    #[test]
    fn null_price_is_submitted_as_blank() {
        let input = item_input(&bytes(r#"{"price": null}"#)).unwrap();
        assert_eq!(input.price.as_deref(), Some(""));
    }

    #[test]
    fn wrongly_typed_field_names_the_field() {
        let err = category_input(&bytes(r#"{"name": 5}"#)).unwrap_err();
        assert_eq!(err.to_json()["field_errors"]["name"], "'name' must be a string");
    }
}
