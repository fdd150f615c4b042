//! Selector language for sift.
//!
//! # Scope
//!
//! This crate implements:
//! - **Scanner**: position-based lookups over a pattern, aware of `\`
//!   escapes and of quote and bracket enclosures
//! - **Parser**: pattern string to [`Selector`]
//!   - Combinators: descendant (` `), child (`>`), adjacent sibling (`+`),
//!     general sibling (`~`)
//!   - Simple selectors: universal, element, id (`#`), role (`$`),
//!     class (`.`), path (`/`), attribute (`[...]`) and pseudo (`:`)
//!   - Typed attribute conditions: strings, integers, floats, booleans,
//!     null and `~=` lists
//!   - Registered pseudo grammars: `:sort(attribute asc|desc)`
//! - **AST**: arena-backed selector chain with canonical `Display` output
//!   and `serde` serialization
//!
//! # Example
//!
//! ```
//! use sift_selector::{Combinator, SimpleSelector, parse};
//!
//! let selector = parse("vehicles>car .crossover").unwrap();
//! assert_eq!(selector.len(), 3);
//!
//! let first = selector.first().unwrap();
//! assert_eq!(selector.child_combinator(first), Some(Combinator::Child));
//! assert_eq!(
//!     selector.last_sequence().unwrap().item(0),
//!     Some(&SimpleSelector::Class("crossover".into()))
//! );
//! ```

/// Parse and construction errors.
pub mod error;
/// Pattern string to AST.
pub mod parser;
/// Escape and enclosure aware character scanner.
pub mod scanner;
/// Selector AST.
pub mod selector;

pub use error::{ParseError, StructureError};
pub use parser::{
    parse, parse_attribute, parse_path, parse_pseudo, parse_sequence, parse_simple_selector,
};
pub use selector::{
    Attribute, Combinator, Operator, Path, PathItem, PathStep, Pseudo, Selector, SelectorKind,
    Sequence, SequenceId, SimpleSelector, SortOrder, Value,
};
