//! Simple selectors: the atomic predicates a sequence is made of.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::StructureError;
use crate::scanner::{WHITESPACE, escape};

/// Characters escaped inside element names, id, role and class values and
/// pseudo class names.
const VALUE_SPECIALS: &[char] = &[
    '>', '+', '~', '*', '#', '$', '.', '/', '[', ']', ':', '(', ')', '"', '\'', '{', '}',
];

/// Characters escaped inside path segments. `*` stays bare so wildcards
/// survive printing.
const PATH_SPECIALS: &[char] = &['>', '+', '~', '[', ':', '/', '"', '\'', '(', '{'];

const ATTRIBUTE_NAME_SPECIALS: &[char] = &[
    '=', '!', '~', '^', '$', '?', '*', '>', '<', '[', ']', '"', '\'', '(', ')', '{', '}',
];

const PSEUDO_VALUE_SPECIALS: &[char] = &['(', ')', '"', '\'', '[', ']', '{', '}'];

fn with_whitespace(specials: &[char]) -> Vec<char> {
    WHITESPACE.iter().chain(specials).copied().collect()
}

fn escape_value(text: &str) -> String {
    escape(text, &with_whitespace(VALUE_SPECIALS))
}

/// The kind of a simple selector, used in event names and error messages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SelectorKind {
    /// `*`
    Universal,
    /// `name`
    Element,
    /// `#value`
    Id,
    /// `$value`
    Role,
    /// `.value`
    Class,
    /// `/segment/segment`
    Path,
    /// `[name op value]`
    Attribute,
    /// `:name(value)`
    Pseudo,
}

impl SelectorKind {
    /// Whether selectors of this kind may only appear first in a sequence.
    #[must_use]
    pub const fn is_leading(self) -> bool {
        matches!(self, Self::Universal | Self::Element | Self::Path)
    }
}

/// A single predicate on a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum SimpleSelector {
    /// Matches every node.
    ///
    /// Example: `*`
    Universal,

    /// Matches nodes of the named type or category.
    ///
    /// Example: `article`
    Element(String),

    /// Matches the node with the given identifier.
    ///
    /// Example: `#4e2a1f`
    Id(String),

    /// Matches nodes carrying the given role.
    ///
    /// Example: `$admin`
    Role(String),

    /// Matches nodes carrying the given class.
    ///
    /// Example: `.published`
    Class(String),

    /// Matches nodes stored under the given path.
    ///
    /// Examples: `/news/2024`, `/#4e2a1f/children`, `/docs/*`
    Path(Path),

    /// Matches nodes by comparing an attribute against a condition.
    ///
    /// Examples: `[age>=18]`, `[name^="Jo"]`, `[tags~=red blue]`
    Attribute(Attribute),

    /// Modifies or narrows the query by name.
    ///
    /// Examples: `:published`, `:limit(10)`, `:sort(name desc)`
    Pseudo(Pseudo),
}

impl SimpleSelector {
    /// The kind of this selector.
    #[must_use]
    pub const fn kind(&self) -> SelectorKind {
        match self {
            Self::Universal => SelectorKind::Universal,
            Self::Element(_) => SelectorKind::Element,
            Self::Id(_) => SelectorKind::Id,
            Self::Role(_) => SelectorKind::Role,
            Self::Class(_) => SelectorKind::Class,
            Self::Path(_) => SelectorKind::Path,
            Self::Attribute(_) => SelectorKind::Attribute,
            Self::Pseudo(_) => SelectorKind::Pseudo,
        }
    }

    /// The plain value of an element, id, role or class selector.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Element(value) | Self::Id(value) | Self::Role(value) | Self::Class(value) => {
                Some(value)
            }
            _ => None,
        }
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universal => f.write_str("*"),
            Self::Element(name) => f.write_str(&escape_value(name)),
            Self::Id(value) => write!(f, "#{}", escape_value(value)),
            Self::Role(value) => write!(f, "${}", escape_value(value)),
            Self::Class(value) => write!(f, ".{}", escape_value(value)),
            Self::Path(path) => path.fmt(f),
            Self::Attribute(attribute) => attribute.fmt(f),
            Self::Pseudo(pseudo) => pseudo.fmt(f),
        }
    }
}

/// Attribute comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter)]
pub enum Operator {
    /// `=`
    #[serde(rename = "=")]
    Equals,
    /// `!=`
    #[serde(rename = "!=")]
    NotEquals,
    /// `~=`, condition is a list
    #[serde(rename = "~=")]
    InList,
    /// `?=`, condition is a regular expression
    #[serde(rename = "?=")]
    RegExp,
    /// `^=`
    #[serde(rename = "^=")]
    SubstrPrefix,
    /// `$=`
    #[serde(rename = "$=")]
    SubstrSuffix,
    /// `*=`
    #[serde(rename = "*=")]
    SubstrMatch,
    /// `>`
    #[serde(rename = ">")]
    Gt,
    /// `>=`
    #[serde(rename = ">=")]
    Gte,
    /// `<`
    #[serde(rename = "<")]
    Lt,
    /// `<=`
    #[serde(rename = "<=")]
    Lte,
}

impl Operator {
    /// First characters of every operator.
    pub const LEAD_CHARS: [char; 9] = ['=', '!', '~', '?', '^', '$', '*', '>', '<'];

    /// The operator as written in a pattern.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::InList => "~=",
            Self::RegExp => "?=",
            Self::SubstrPrefix => "^=",
            Self::SubstrSuffix => "$=",
            Self::SubstrMatch => "*=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }

    /// Look up an operator by its symbol.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::iter().find(|operator| operator.symbol() == symbol)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A typed attribute condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// `null`, also the condition of a presence test
    Null,
    /// `true` or `false`
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Literal with a decimal point or exponent
    Float(f64),
    /// Quoted or otherwise non-literal text
    String(String),
    /// Items of an `~=` condition
    List(Vec<Value>),
}

impl Value {
    /// The string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// Whether this is [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            // Debug keeps the decimal point on whole numbers.
            Self::Float(value) => write!(f, "{value:?}"),
            Self::String(text) => write!(f, "\"{}\"", escape(text, &['"'])),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    item.fmt(f)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::String(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::String(text)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// `[name]` presence test or `[name op condition]` comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    /// Attribute name, unescaped
    pub name: String,
    /// `None` for a presence test
    pub operator: Option<Operator>,
    /// [`Value::Null`] for a presence test
    pub condition: Value,
}

impl Attribute {
    /// A presence test for `name`.
    pub fn exists(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operator: None,
            condition: Value::Null,
        }
    }

    /// A comparison of `name` against `condition`.
    pub fn compare(
        name: impl Into<String>,
        operator: Operator,
        condition: impl Into<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            operator: Some(operator),
            condition: condition.into(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = escape(&self.name, ATTRIBUTE_NAME_SPECIALS);
        match self.operator {
            Some(operator) => write!(f, "[{name}{operator}{}]", self.condition),
            None => write!(f, "[{name}]"),
        }
    }
}

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PathItem {
    /// Literal segment, or [`Path::WILDCARD`]
    Segment(String),
    /// Embedded id or role selector standing for a stored path
    Selector(Box<SimpleSelector>),
}

impl PathItem {
    /// The segment text, if this is a segment.
    #[must_use]
    pub fn as_segment(&self) -> Option<&str> {
        match self {
            Self::Segment(segment) => Some(segment),
            Self::Selector(_) => None,
        }
    }
}

/// A path selector: ordered segments with an optional embedded root.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Path {
    items: Vec<PathItem>,
}

impl Path {
    /// Path separator.
    pub const SEPARATOR: char = '/';

    /// Segment matching any single segment.
    pub const WILDCARD: &'static str = "*";

    /// Build a path from items.
    ///
    /// An embedded selector must be the first item and must be an id or a
    /// role.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::MisplacedPathRoot`] or
    /// [`StructureError::InvalidPathRoot`] when those rules are broken.
    pub fn new(items: Vec<PathItem>) -> Result<Self, StructureError> {
        for (index, item) in items.iter().enumerate() {
            if let PathItem::Selector(selector) = item {
                if index > 0 {
                    return Err(StructureError::MisplacedPathRoot);
                }
                if !matches!(selector.kind(), SelectorKind::Id | SelectorKind::Role) {
                    return Err(StructureError::InvalidPathRoot {
                        kind: selector.kind(),
                    });
                }
            }
        }
        Ok(Self { items })
    }

    /// Build a path from literal segments only.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: segments
                .into_iter()
                .map(|segment| PathItem::Segment(segment.into()))
                .collect(),
        }
    }

    /// All items, root first.
    #[must_use]
    pub fn items(&self) -> &[PathItem] {
        &self.items
    }

    /// The embedded root selector, if any.
    #[must_use]
    pub fn root(&self) -> Option<&SimpleSelector> {
        match self.items.first() {
            Some(PathItem::Selector(selector)) => Some(selector),
            _ => None,
        }
    }

    /// Literal segments after the root.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(PathItem::as_segment)
    }

    /// Whether any segment is [`Path::WILDCARD`].
    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        self.segments().any(|segment| segment == Self::WILDCARD)
    }

    /// Whether the path has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The segments joined with `/`, with a leading `/`. The root, if
    /// any, is left out.
    #[must_use]
    pub fn literal(&self) -> String {
        let mut out = String::new();
        for segment in self.segments() {
            out.push(Self::SEPARATOR);
            out.push_str(segment);
        }
        if out.is_empty() {
            out.push(Self::SEPARATOR);
        }
        out
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let specials = with_whitespace(PATH_SPECIALS);
        f.write_str("/")?;
        for (index, item) in self.items.iter().enumerate() {
            if index > 0 {
                f.write_str("/")?;
            }
            match item {
                PathItem::Selector(selector) => selector.fmt(f)?,
                PathItem::Segment(segment) => {
                    // A literal first segment must not read back as a root.
                    if index == 0 && segment.starts_with(['#', '$']) {
                        f.write_str("\\")?;
                    }
                    f.write_str(&escape(segment, &specials))?;
                }
            }
        }
        Ok(())
    }
}

/// Sort direction of `:sort`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

/// A pseudo selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Pseudo {
    /// Generic `:name` or `:name(value)`; interpretation is left to the
    /// query backend.
    Class {
        /// Class name
        name: String,
        /// Value between the parentheses; `None` when absent or empty
        value: Option<String>,
    },

    /// `:sort(attribute order)`
    Sort {
        /// Attribute to order by
        attribute: String,
        /// Direction, `asc` when omitted
        order: SortOrder,
    },
}

impl Pseudo {
    /// Generic pseudo class.
    pub fn class(name: impl Into<String>, value: Option<String>) -> Self {
        Self::Class {
            name: name.into(),
            value: value.filter(|value| !value.is_empty()),
        }
    }

    /// The pseudo class name.
    #[must_use]
    pub fn class_name(&self) -> &str {
        match self {
            Self::Class { name, .. } => name,
            Self::Sort { .. } => "sort",
        }
    }

    /// The pseudo class value as it would be written between parentheses.
    #[must_use]
    pub fn class_value(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Class { value, .. } => value.as_deref().map(Cow::Borrowed),
            Self::Sort { attribute, order } => Some(Cow::Owned(format!("{attribute} {order}"))),
        }
    }
}

impl fmt::Display for Pseudo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", escape_value(self.class_name()))?;
        if let Some(value) = self.class_value() {
            write!(f, "({})", escape(&value, PSEUDO_VALUE_SPECIALS))?;
        }
        Ok(())
    }
}
