//! Query building for sift selectors.
//!
//! # Scope
//!
//! This crate implements:
//! - **Events**: the named hooks fired while a selector is folded into a
//!   query, and the three-state [`Response`] handlers return
//! - **Registry**: prioritised handler lists with detach tokens and
//!   [`ListenerAggregate`] for listeners that register several handlers
//! - **Builder**: [`QueryBuilder`], which walks a parsed selector from its
//!   innermost sequence outwards and dispatches one event per node
//! - **Filter listener**: a reference [`FilterListener`] that folds
//!   selectors into a JSON document filter
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sift_query::{FilterConfig, FilterListener, ListenerAggregate, QueryBuilder};
//!
//! let mut builder = QueryBuilder::new();
//! let mut listener = FilterListener::new(FilterConfig::default());
//! listener.attach(builder.registry_mut());
//!
//! let selector = sift_selector::parse("$admin.active[age>=18]").unwrap();
//! let filter = builder.build(&selector).unwrap();
//! assert_eq!(
//!     filter,
//!     json!({
//!         "query": {
//!             "roles": { "$in": ["admin"] },
//!             "classes": { "$in": ["active"] },
//!             "age": { "$gte": 18 }
//!         }
//!     })
//! );
//! ```

/// Query builder driving event dispatch over a selector.
pub mod builder;
/// Build and filter errors.
pub mod error;
/// Event kinds, payloads and handler responses.
pub mod event;
/// Reference listeners.
pub mod listener;
/// Handler registry.
pub mod registry;
/// Path root resolution.
pub mod resolver;

pub use builder::{Accumulator, QueryBuilder};
pub use error::{BuildError, FilterError};
pub use event::{Event, EventKind, Response};
pub use listener::{FilterConfig, FilterListener};
pub use registry::{EventRegistry, Handler, ListenerAggregate, ListenerId};
pub use resolver::{PathResolver, StaticPathResolver};
