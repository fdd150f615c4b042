//! Sequences of simple selectors that apply to the same node.

use std::fmt;

use serde::Serialize;

use super::simple::{SelectorKind, SimpleSelector};
use crate::error::StructureError;

/// Ordered simple selectors with no combinator between them.
///
/// Universal, element and path selectors may only appear at index 0, and
/// a path may only be followed by attribute or pseudo selectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Sequence {
    items: Vec<SimpleSelector>,
}

impl Sequence {
    /// An empty sequence.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a sequence by appending every item in order.
    ///
    /// # Errors
    ///
    /// Fails when a leading-only selector is not first.
    pub fn from_items(
        items: impl IntoIterator<Item = SimpleSelector>,
    ) -> Result<Self, StructureError> {
        let mut sequence = Self::new();
        for item in items {
            sequence.append(item)?;
        }
        Ok(sequence)
    }

    /// Append a simple selector.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::NotFirstInSequence`] when a universal,
    /// element or path selector is appended to a non-empty sequence, and
    /// [`StructureError::NotAfterPath`] when anything but an attribute or
    /// pseudo selector is appended right after a path.
    pub fn append(&mut self, selector: SimpleSelector) -> Result<(), StructureError> {
        let kind = selector.kind();
        if kind.is_leading() && !self.items.is_empty() {
            return Err(StructureError::NotFirstInSequence { kind });
        }
        if matches!(self.items.last(), Some(SimpleSelector::Path(_)))
            && !matches!(kind, SelectorKind::Attribute | SelectorKind::Pseudo)
        {
            return Err(StructureError::NotAfterPath { kind });
        }
        self.items.push(selector);
        Ok(())
    }

    /// Remove and return the last item.
    pub fn pop_item(&mut self) -> Option<SimpleSelector> {
        self.items.pop()
    }

    /// Remove and return the first item.
    pub fn shift_item(&mut self) -> Option<SimpleSelector> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    /// Item at `index`.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&SimpleSelector> {
        self.items.get(index)
    }

    /// All items in order.
    #[must_use]
    pub fn items(&self) -> &[SimpleSelector] {
        &self.items
    }

    /// Iterate the items in order.
    pub fn iter(&self) -> std::slice::Iter<'_, SimpleSelector> {
        self.items.iter()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the sequence has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Name of the leading element selector.
    #[must_use]
    pub fn element(&self) -> Option<&str> {
        match self.items.first() {
            Some(SimpleSelector::Element(name)) => Some(name),
            _ => None,
        }
    }

    /// True unless the sequence starts with an element selector.
    #[must_use]
    pub fn is_universal(&self) -> bool {
        self.element().is_none()
    }

    /// True when the sequence starts with `*`.
    #[must_use]
    pub fn is_explicit_universal(&self) -> bool {
        matches!(self.items.first(), Some(SimpleSelector::Universal))
    }

    /// Make the sequence start with the element `name`, returning the
    /// universal, element or path selector it replaced.
    pub fn set_element(&mut self, name: impl Into<String>) -> Option<SimpleSelector> {
        self.replace_leading(SimpleSelector::Element(name.into()))
    }

    /// Make the sequence start with `*`, returning the universal, element or
    /// path selector it replaced.
    pub fn set_universal(&mut self) -> Option<SimpleSelector> {
        self.replace_leading(SimpleSelector::Universal)
    }

    fn replace_leading(&mut self, selector: SimpleSelector) -> Option<SimpleSelector> {
        match self.items.first_mut() {
            Some(first) if first.kind().is_leading() => Some(std::mem::replace(first, selector)),
            _ => {
                self.items.insert(0, selector);
                None
            }
        }
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a SimpleSelector;
    type IntoIter = std::slice::Iter<'a, SimpleSelector>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            item.fmt(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::{Attribute, Path, Pseudo};

    #[test]
    fn test_leading_selectors_must_come_first() {
        let mut sequence = Sequence::new();
        sequence.append(SimpleSelector::Class("a".into())).unwrap();

        for selector in [
            SimpleSelector::Universal,
            SimpleSelector::Element("car".into()),
            SimpleSelector::Path(Path::from_segments(["a"])),
        ] {
            let kind = selector.kind();
            assert_eq!(
                sequence.append(selector),
                Err(StructureError::NotFirstInSequence { kind })
            );
        }
        assert_eq!(sequence.len(), 1);
    }

    #[test]
    fn test_only_attributes_and_pseudos_follow_a_path() {
        let path = || SimpleSelector::Path(Path::from_segments(["a"]));
        for selector in [
            SimpleSelector::Id("x".into()),
            SimpleSelector::Role("x".into()),
            SimpleSelector::Class("b".into()),
        ] {
            let kind = selector.kind();
            assert_eq!(
                Sequence::from_items([path(), selector]),
                Err(StructureError::NotAfterPath { kind })
            );
        }

        let sequence = Sequence::from_items([
            path(),
            SimpleSelector::Attribute(Attribute::exists("x")),
            SimpleSelector::Class("b".into()),
            SimpleSelector::Pseudo(Pseudo::class("limit", Some("2".into()))),
        ])
        .unwrap();
        assert_eq!(sequence.to_string(), "/a[x].b:limit(2)");
    }

    #[test]
    fn test_set_element_replaces_path() {
        let mut sequence = Sequence::from_items([
            SimpleSelector::Path(Path::from_segments(["a"])),
            SimpleSelector::Attribute(Attribute::exists("x")),
        ])
        .unwrap();
        assert!(matches!(sequence.set_element("car"), Some(SimpleSelector::Path(_))));
        assert_eq!(sequence.to_string(), "car[x]");
    }

    #[test]
    fn test_set_element_replaces_leading_item() {
        let mut sequence = Sequence::from_items([
            SimpleSelector::Universal,
            SimpleSelector::Attribute(Attribute::exists("a")),
        ])
        .unwrap();
        assert!(sequence.is_explicit_universal());

        assert_eq!(sequence.set_element("car"), Some(SimpleSelector::Universal));
        assert_eq!(sequence.element(), Some("car"));
        assert!(!sequence.is_universal());
        assert_eq!(sequence.to_string(), "car[a]");
    }

    #[test]
    fn test_set_universal_inserts_when_missing() {
        let mut sequence = Sequence::from_items([SimpleSelector::Id("x".into())]).unwrap();
        assert_eq!(sequence.set_universal(), None);
        assert_eq!(sequence.item(0).map(SimpleSelector::kind), Some(SelectorKind::Universal));
        assert_eq!(sequence.to_string(), "*#x");
    }

    #[test]
    fn test_pop_and_shift() {
        let mut sequence = Sequence::from_items([
            SimpleSelector::Element("a".into()),
            SimpleSelector::Class("b".into()),
        ])
        .unwrap();
        assert_eq!(sequence.shift_item(), Some(SimpleSelector::Element("a".into())));
        assert_eq!(sequence.pop_item(), Some(SimpleSelector::Class("b".into())));
        assert_eq!(sequence.pop_item(), None);
        assert_eq!(sequence.shift_item(), None);
    }
}
