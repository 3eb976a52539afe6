/*
 * Responsibility
 * - 文字列配列 <-> JSON column の変換
 * - 空配列は必ず "[]" で保存する (NULL にしない)
 * - NULL column は空配列として読む
 */
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonArrayError {
    #[error("failed to encode string array: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode string array: {0}")]
    Decode(#[source] serde_json::Error),
}

/// A raw column value as handed over by a storage driver.
#[derive(Debug, Clone, Copy)]
pub enum ColumnValue<'a> {
    Null,
    Text(&'a str),
    Bytes(&'a [u8]),
}

/// Ordered list of strings stored as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonArray(pub Vec<String>);

impl JsonArray {
    pub fn new(items: Vec<String>) -> Self {
        Self(items)
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    pub fn to_column(&self) -> Result<String, JsonArrayError> {
        if self.0.is_empty() {
            return Ok("[]".to_string());
        }
        serde_json::to_string(&self.0).map_err(JsonArrayError::Encode)
    }

    pub fn from_column(value: ColumnValue<'_>) -> Result<Self, JsonArrayError> {
        let bytes = match value {
            ColumnValue::Null => return Ok(Self::default()),
            ColumnValue::Text(s) => s.as_bytes(),
            ColumnValue::Bytes(b) => b,
        };

        // A JSON `null` literal is read the same way as a NULL column.
        let items: Option<Vec<String>> =
            serde_json::from_slice(bytes).map_err(JsonArrayError::Decode)?;

        Ok(Self(items.unwrap_or_default()))
    }
}

impl From<Vec<String>> for JsonArray {
    fn from(items: Vec<String>) -> Self {
        Self(items)
    }
}

impl std::ops::Deref for JsonArray {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array(items: &[&str]) -> JsonArray {
        items.iter().map(|s| s.to_string()).collect::<Vec<_>>().into()
    }

    #[test]
    fn empty_array_is_stored_as_brackets() {
        assert_eq!(JsonArray::default().to_column().unwrap(), "[]");
    }

    #[test]
    fn items_are_stored_in_order() {
        let column = array(&["b", "a", "c"]).to_column().unwrap();

        assert_eq!(column, r#"["b","a","c"]"#);
    }

    #[test]
    fn null_column_reads_as_empty() {
        let decoded = JsonArray::from_column(ColumnValue::Null).unwrap();

        assert!(decoded.is_empty());
    }

    #[test]
    fn null_literal_reads_as_empty() {
        let decoded = JsonArray::from_column(ColumnValue::Text("null")).unwrap();

        assert!(decoded.is_empty());
    }

    #[test]
    fn text_and_bytes_decode_alike() {
        let from_text = JsonArray::from_column(ColumnValue::Text(r#"["x","y"]"#)).unwrap();
        let from_bytes = JsonArray::from_column(ColumnValue::Bytes(br#"["x","y"]"#)).unwrap();

        assert_eq!(from_text, array(&["x", "y"]));
        assert_eq!(from_text, from_bytes);
    }

    #[test]
    fn malformed_payload_is_rejected() {
        for payload in [r#"{"a":1}"#, r#"[1,2]"#, "[", "", r#""x""#] {
            assert!(
                matches!(
                    JsonArray::from_column(ColumnValue::Text(payload)),
                    Err(JsonArrayError::Decode(_))
                ),
                "{payload:?} should fail"
            );
        }
    }
}
