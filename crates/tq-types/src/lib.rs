#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Row comparison operator for `--where` filters. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    Eq,
    Gt,
    Lt,
}

impl ComparisonOp {
    /// Map a raw operator token to its variant. Both `==` and `=` mean
    /// equality. Unrecognized tokens are absence, not an error; the caller
    /// reports an invalid-format condition upstream.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "==" | "=" => Some(Self::Eq),
            ">" => Some(Self::Gt),
            "<" => Some(Self::Lt),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }
}

/// Column reduction requested via `--aggregate`. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateKind {
    Average,
    Minimum,
    Maximum,
}

impl AggregateKind {
    /// Map a raw kind token to its variant, case-insensitively.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "avg" => Some(Self::Average),
            "min" => Some(Self::Minimum),
            "max" => Some(Self::Maximum),
            _ => None,
        }
    }

    /// Lower-case label shown in the `type` column of an aggregate summary.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Average => "avg",
            Self::Minimum => "min",
            Self::Maximum => "max",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AggregateKind, ComparisonOp};

    #[test]
    fn comparison_tokens_map_to_variants() {
        assert_eq!(ComparisonOp::from_token("=="), Some(ComparisonOp::Eq));
        assert_eq!(ComparisonOp::from_token("="), Some(ComparisonOp::Eq));
        assert_eq!(ComparisonOp::from_token(">"), Some(ComparisonOp::Gt));
        assert_eq!(ComparisonOp::from_token("<"), Some(ComparisonOp::Lt));
    }

    #[test]
    fn unknown_comparison_token_is_absent() {
        assert_eq!(ComparisonOp::from_token("!="), None);
        assert_eq!(ComparisonOp::from_token(">="), None);
        assert_eq!(ComparisonOp::from_token(""), None);
    }

    #[test]
    fn aggregate_tokens_are_case_insensitive() {
        assert_eq!(
            AggregateKind::from_token("avg"),
            Some(AggregateKind::Average)
        );
        assert_eq!(
            AggregateKind::from_token("AVG"),
            Some(AggregateKind::Average)
        );
        assert_eq!(
            AggregateKind::from_token("Min"),
            Some(AggregateKind::Minimum)
        );
        assert_eq!(
            AggregateKind::from_token("mAx"),
            Some(AggregateKind::Maximum)
        );
        assert_eq!(AggregateKind::from_token("sum"), None);
    }

    #[test]
    fn aggregate_labels_are_lower_case_tokens() {
        assert_eq!(AggregateKind::Average.label(), "avg");
        assert_eq!(AggregateKind::Minimum.label(), "min");
        assert_eq!(AggregateKind::Maximum.label(), "max");
    }

    #[test]
    fn vocabulary_serializes_as_snake_case() {
        let json = serde_json::to_string(&AggregateKind::Average).expect("serialize");
        assert_eq!(json, "\"average\"");
        let json = serde_json::to_string(&ComparisonOp::Gt).expect("serialize");
        assert_eq!(json, "\"gt\"");
    }
}
