//! Specification types.

use crate::{SpecId, StackEffect};
use serde::{Deserialize, Serialize};

/// A Spec describes one function a remote agent must generate: the target
/// word, the stack effect it must satisfy, the generation pattern to apply,
/// and the acceptance test cases.
///
/// Specs are immutable once created. The coordinator owns a Spec until it is
/// enqueued; ownership then transfers to whichever worker dequeues it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spec {
    /// Unique specification identifier.
    pub id: SpecId,

    /// Name of the word to generate.
    pub word: String,

    /// Stack effect the generated word must satisfy.
    #[serde(rename = "stack_effect")]
    pub effect: StackEffect,

    /// Generation pattern identifier.
    pub pattern_id: String,

    /// Ordered acceptance test cases.
    pub test_cases: Vec<TestCase>,
}

impl Spec {
    /// Create a new Spec with a generated id and no test cases.
    pub fn new(
        word: impl Into<String>,
        effect: StackEffect,
        pattern_id: impl Into<String>,
    ) -> Self {
        Self {
            id: SpecId::generate(),
            word: word.into(),
            effect,
            pattern_id: pattern_id.into(),
            test_cases: Vec::new(),
        }
    }

    /// Builder method to set a specific id (useful for testing).
    pub fn with_id(mut self, id: impl Into<SpecId>) -> Self {
        self.id = id.into();
        self
    }

    /// Builder method to append a test case.
    pub fn with_test_case(mut self, input: Vec<i64>, output: Vec<i64>) -> Self {
        self.test_cases.push(TestCase { input, output });
        self
    }
}

/// One input/output acceptance pair for a Spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Stack contents supplied to the word.
    pub input: Vec<i64>,
    /// Stack contents expected after the word runs.
    pub output: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_effect() -> StackEffect {
        "( n -- n² )".parse().unwrap()
    }

    #[test]
    fn test_builder() {
        let spec = Spec::new("square", square_effect(), "DUP_TRANSFORM_001")
            .with_id("func_0")
            .with_test_case(vec![5], vec![25])
            .with_test_case(vec![0], vec![0]);

        assert_eq!(spec.id.as_str(), "func_0");
        assert_eq!(spec.word, "square");
        assert_eq!(spec.test_cases.len(), 2);
    }

    #[test]
    fn test_missing_effect_field_is_rejected() {
        let json = r#"{"id": "func_9", "word": "square", "pattern_id": "DUP_TRANSFORM_001", "test_cases": []}"#;
        assert!(serde_json::from_str::<Spec>(json).is_err());
    }

    #[test]
    fn test_malformed_effect_field_is_rejected() {
        let json = r#"{"id": "func_9", "word": "square", "stack_effect": "n -- n", "pattern_id": "DUP_TRANSFORM_001", "test_cases": []}"#;
        assert!(serde_json::from_str::<Spec>(json).is_err());
    }

    #[test]
    fn test_wire_shape() {
        let spec = Spec::new("square", square_effect(), "DUP_TRANSFORM_001").with_id("func_0");
        let json = serde_json::to_value(&spec).unwrap();

        assert_eq!(json["id"], "func_0");
        assert_eq!(json["stack_effect"], "( n -- n² )");
        assert_eq!(json["pattern_id"], "DUP_TRANSFORM_001");
        assert!(json["test_cases"].as_array().unwrap().is_empty());
    }
}
