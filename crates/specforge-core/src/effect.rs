//! Stack effect signatures.
//!
//! A stack effect describes the input/output transformation a generated
//! word must perform, written in the canonical `( a b -- c )` form. The
//! structured representation keeps the ordered input and output tokens
//! explicit; the text form is what crosses the wire to agents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error raised when a stack effect string does not have the
/// `( inputs -- outputs )` shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid stack effect '{text}': {reason}")]
pub struct EffectParseError {
    /// The offending text.
    pub text: String,
    /// What was wrong with it.
    pub reason: &'static str,
}

impl EffectParseError {
    fn new(text: &str, reason: &'static str) -> Self {
        Self {
            text: text.to_owned(),
            reason,
        }
    }
}

/// A structured stack effect signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StackEffect {
    /// Ordered tokens consumed from the stack.
    pub inputs: Vec<String>,
    /// Ordered tokens left on the stack.
    pub outputs: Vec<String>,
}

impl StackEffect {
    /// Build a stack effect from input and output token lists.
    pub fn new(
        inputs: impl IntoIterator<Item = impl Into<String>>,
        outputs: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: outputs.into_iter().map(Into::into).collect(),
        }
    }

    /// Net change in stack depth.
    pub fn depth_change(&self) -> isize {
        self.outputs.len() as isize - self.inputs.len() as isize
    }
}

impl fmt::Display for StackEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for token in &self.inputs {
            write!(f, " {}", token)?;
        }
        write!(f, " --")?;
        for token in &self.outputs {
            write!(f, " {}", token)?;
        }
        write!(f, " )")
    }
}

impl FromStr for StackEffect {
    type Err = EffectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| EffectParseError::new(s, "missing surrounding parentheses"))?;

        let (inputs, outputs) = body
            .split_once("--")
            .ok_or_else(|| EffectParseError::new(s, "missing `--` separator"))?;
        if outputs.contains("--") {
            return Err(EffectParseError::new(s, "more than one `--` separator"));
        }

        Ok(Self::new(
            inputs.split_whitespace(),
            outputs.split_whitespace(),
        ))
    }
}

impl TryFrom<String> for StackEffect {
    type Error = EffectParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<StackEffect> for String {
    fn from(effect: StackEffect) -> Self {
        effect.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_inputs_one_output() {
        let effect: StackEffect = "( a b -- c )".parse().unwrap();
        assert_eq!(effect.inputs, vec!["a", "b"]);
        assert_eq!(effect.outputs, vec!["c"]);
        assert_eq!(effect.depth_change(), -1);
    }

    #[test]
    fn test_parse_empty_inputs() {
        let effect: StackEffect = "( -- n )".parse().unwrap();
        assert!(effect.inputs.is_empty());
        assert_eq!(effect.outputs, vec!["n"]);
    }

    #[test]
    fn test_display_round_trip() {
        let effect: StackEffect = "( n -- n² )".parse().unwrap();
        assert_eq!(effect.to_string(), "( n -- n² )");
        let reparsed: StackEffect = effect.to_string().parse().unwrap();
        assert_eq!(reparsed, effect);
    }

    #[test]
    fn test_parse_rejects_missing_parens() {
        assert!("n -- n".parse::<StackEffect>().is_err());
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        assert!("( n n )".parse::<StackEffect>().is_err());
    }

    #[test]
    fn test_serde_uses_text_form() {
        let effect: StackEffect = "( n -- n n )".parse().unwrap();
        let json = serde_json::to_string(&effect).unwrap();
        assert_eq!(json, "\"( n -- n n )\"");
        let back: StackEffect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, effect);
    }
}
