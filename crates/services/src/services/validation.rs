use std::collections::BTreeMap;

use serde::Serialize;

/// Field-level validation messages: every failing field maps to the list of
/// messages reported for it, in the order they were recorded.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    /// Summary line for the response body: the first recorded message.
    pub fn message(&self) -> String {
        self.errors
            .values()
            .flatten()
            .next()
            .cloned()
            .unwrap_or_else(|| "Os dados fornecidos são inválidos.".to_string())
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ValidationErrors {}
