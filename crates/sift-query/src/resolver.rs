//! Resolution of `#id` and `$role` path roots to stored paths.

use std::collections::HashMap;

use sift_selector::SimpleSelector;

/// Looks up the path of the node a path root selects.
///
/// `/#4e2a1f/children` is rooted at the node with id `4e2a1f`; a resolver
/// returns that node's own path (for example `/news/2024`) so the listener
/// can match `/news/2024/children`.
pub trait PathResolver {
    /// The stored path of the node `root` selects, or `None` if nothing
    /// matches.
    fn resolve(&self, root: &SimpleSelector) -> Option<String>;
}

impl<F> PathResolver for F
where
    F: Fn(&SimpleSelector) -> Option<String>,
{
    fn resolve(&self, root: &SimpleSelector) -> Option<String> {
        self(root)
    }
}

/// In-memory resolver keyed by the canonical text of the root selector.
#[derive(Debug, Clone, Default)]
pub struct StaticPathResolver {
    paths: HashMap<String, String>,
}

impl StaticPathResolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `root` to `path`, returning the previous path.
    pub fn insert(&mut self, root: &SimpleSelector, path: impl Into<String>) -> Option<String> {
        self.paths.insert(root.to_string(), path.into())
    }

    /// Builder form of [`StaticPathResolver::insert`].
    #[must_use]
    pub fn with(mut self, root: &SimpleSelector, path: impl Into<String>) -> Self {
        let _ = self.insert(root, path);
        self
    }

    /// Number of mapped roots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether no root is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl PathResolver for StaticPathResolver {
    fn resolve(&self, root: &SimpleSelector) -> Option<String> {
        self.paths.get(&root.to_string()).cloned()
    }
}
