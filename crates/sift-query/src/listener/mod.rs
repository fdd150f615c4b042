//! Listeners translating selectors into backend queries.

mod filter;

pub use filter::{FilterConfig, FilterListener};
