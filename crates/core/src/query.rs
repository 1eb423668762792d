//! The routing query input

use serde::{Deserialize, Serialize};

/// A single user query to be routed
///
/// One `Query` produces exactly one `RoutingResult`. The optional
/// conversation context is used only for scope disambiguation; the field
/// hint biases context enhancement toward a caller-chosen target variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// Raw query text as typed by the user
    pub text: String,
    /// Prior conversation turns, newest last
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_context: Option<String>,
    /// Caller-supplied target-variable hint (a data field name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_hint: Option<String>,
}

impl Query {
    /// Create a query from raw text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            conversation_context: None,
            field_hint: None,
        }
    }

    /// Attach conversation context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.conversation_context = Some(context.into());
        self
    }

    /// Attach a target-variable hint
    pub fn with_field_hint(mut self, hint: impl Into<String>) -> Self {
        self.field_hint = Some(hint.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let query = Query::new("median income near downtown")
            .with_context("previous: show population density")
            .with_field_hint("median_income");

        assert_eq!(query.text, "median income near downtown");
        assert!(query.conversation_context.is_some());
        assert_eq!(query.field_hint.as_deref(), Some("median_income"));
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let json = serde_json::to_string(&Query::new("test")).unwrap();
        assert!(!json.contains("conversation_context"));
        assert!(!json.contains("field_hint"));
    }
}
