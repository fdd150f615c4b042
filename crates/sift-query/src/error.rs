use sift_selector::{Operator, SelectorKind, Value};
use thiserror::Error;

/// Errors raised while building a query.
///
/// `E` is the error type the registered handlers fail with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError<E> {
    /// After `prepare-query` the accumulator is not a container
    #[error("query accumulator must be a container after prepare-query")]
    InvalidAccumulator,

    /// No handler accepted a simple selector and none failed
    #[error("{kind:?} selector is not supported")]
    SelectorNotSupported {
        /// Kind of the rejected selector
        kind: SelectorKind,
    },

    /// A handler failed
    #[error("{0}")]
    Handler(E),
}

/// Errors raised by [`FilterListener`](crate::FilterListener).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// Substring and regex operators need a scalar condition
    #[error("operator {operator} cannot match condition {condition}")]
    InvalidCondition {
        /// The attribute operator
        operator: Operator,
        /// The rejected condition
        condition: Value,
    },

    /// A paging pseudo class needs a non-negative integer
    #[error("pseudo class :{name} expects a count, got {value:?}")]
    InvalidPseudoValue {
        /// Pseudo class name
        name: String,
        /// Raw value, if any
        value: Option<String>,
    },
}
