#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tq_types::{AggregateKind, ComparisonOp};

/// Operator tokens in match priority order. The two-character equality
/// token is checked before the single-character one so `==` is never
/// misread as two adjacent `=`. Matching is by substring presence, not
/// leftmost position: an input containing both `<` and `=` resolves to
/// whichever token comes first in this list. Compatibility behavior,
/// keep the order fixed.
const OPERATOR_TOKENS: [&str; 4] = ["==", "=", "<", ">"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExprError {
    #[error("invalid filter expression {raw:?}: expected <column><op><value> with <op> one of ==, =, <, >")]
    InvalidFilter { raw: String },
    #[error("invalid aggregate expression {raw:?}: expected <kind>:<column>")]
    InvalidAggregate { raw: String },
    #[error("unknown aggregation type {token:?}: expected avg, min, or max")]
    UnknownAggregation { token: String },
}

/// One parsed `--where` condition. Column and value are kept as raw,
/// untrimmed text; numeric interpretation happens at comparison time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterExpr {
    pub column: String,
    pub op: ComparisonOp,
    pub value: String,
}

/// One parsed `--aggregate` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateExpr {
    pub kind: AggregateKind,
    pub column: String,
}

/// Parse a raw `--where` value.
///
/// `Ok(None)` means no filter was requested (empty input); `Err` means a
/// filter was requested but does not match the grammar. Keeping the two
/// apart in the type spares the caller from re-deriving the distinction
/// from argument presence.
pub fn parse_filter(raw: &str) -> Result<Option<FilterExpr>, ExprError> {
    if raw.is_empty() {
        return Ok(None);
    }

    for token in OPERATOR_TOKENS {
        let Some((column, value)) = raw.split_once(token) else {
            continue;
        };
        let Some(op) = ComparisonOp::from_token(token) else {
            continue;
        };
        if column.is_empty() || value.is_empty() {
            return Err(ExprError::InvalidFilter {
                raw: raw.to_owned(),
            });
        }
        return Ok(Some(FilterExpr {
            column: column.to_owned(),
            op,
            value: value.to_owned(),
        }));
    }

    Err(ExprError::InvalidFilter {
        raw: raw.to_owned(),
    })
}

/// Parse a raw `--aggregate` value of the form `<kind>:<column>`.
///
/// The split must yield exactly two non-empty parts; an unrecognized kind
/// token is rejected here rather than deferred to the aggregator.
pub fn parse_aggregate(raw: &str) -> Result<AggregateExpr, ExprError> {
    let parts: Vec<&str> = raw.split(':').collect();
    let [kind_token, column] = parts.as_slice() else {
        return Err(ExprError::InvalidAggregate {
            raw: raw.to_owned(),
        });
    };
    if kind_token.is_empty() || column.is_empty() {
        return Err(ExprError::InvalidAggregate {
            raw: raw.to_owned(),
        });
    }

    let Some(kind) = AggregateKind::from_token(kind_token) else {
        return Err(ExprError::UnknownAggregation {
            token: (*kind_token).to_owned(),
        });
    };

    Ok(AggregateExpr {
        kind,
        column: (*column).to_owned(),
    })
}
