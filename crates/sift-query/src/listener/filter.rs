//! Document filter listener.
//!
//! Folds selectors into a JSON filter document of the shape
//!
//! ```json
//! { "query": { "<field>": <condition> }, "sort": { "<field>": 1 }, "limit": 10, "skip": 20 }
//! ```
//!
//! where a condition is either a plain value (equality) or an object of
//! `$`-prefixed commands such as `{"$gte": 18}`. Combinators are ignored:
//! every sequence constrains the same flat document set.

use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json, json};
use sift_selector::{
    Attribute, Operator, Path, Pseudo, SelectorKind, SimpleSelector, SortOrder, Value,
};
use strum::IntoEnumIterator;
use tracing::{trace, warn};

use crate::error::FilterError;
use crate::event::{EventKind, Response};
use crate::registry::{EventRegistry, ListenerAggregate, ListenerId};
use crate::resolver::{PathResolver, StaticPathResolver};

/// Leading inline flags of a `?=` pattern, e.g. `(?im)`.
static INLINE_FLAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\(\?([imxs]+)\)(.*)$").expect("inline flag pattern"));

/// Pseudo classes that set the number of documents to skip.
const SKIP_ALIASES: [&str; 3] = ["skip", "offset", "startingFrom"];

/// Document fields the selectors map to.
///
/// A `null` role, class or path field leaves that selector unhandled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Field matched by `#id`
    pub id_field: String,
    /// Array field matched by `$role`
    pub role_field: Option<String>,
    /// Array field matched by `.class`
    pub class_field: Option<String>,
    /// Field holding each document's path
    pub path_field: Option<String>,
    /// Field matched by element names; elements are unhandled without it
    pub element_field: Option<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            id_field: "_id".to_string(),
            role_field: Some("roles".to_string()),
            class_field: Some("classes".to_string()),
            path_field: Some("path".to_string()),
            element_field: None,
        }
    }
}

/// Translates selectors into a JSON document filter.
pub struct FilterListener {
    filter: Rc<Filter>,
    priority: i32,
    listeners: Vec<ListenerId>,
}

impl fmt::Debug for FilterListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterListener")
            .field("config", &self.filter.config)
            .field("priority", &self.priority)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl FilterListener {
    /// Create a listener whose path roots never resolve.
    #[must_use]
    pub fn new(config: FilterConfig) -> Self {
        Self::with_resolver(config, StaticPathResolver::new())
    }

    /// Create a listener resolving path roots through `resolver`.
    #[must_use]
    pub fn with_resolver(config: FilterConfig, resolver: impl PathResolver + 'static) -> Self {
        Self {
            filter: Rc::new(Filter {
                config,
                resolver: Box::new(resolver),
            }),
            priority: 0,
            listeners: Vec::new(),
        }
    }

    /// Priority of the handlers registered by the next `attach`.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// The field configuration.
    #[must_use]
    pub fn config(&self) -> &FilterConfig {
        &self.filter.config
    }

    /// Whether the listener's handlers are registered.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        !self.listeners.is_empty()
    }
}

impl ListenerAggregate<Json, FilterError> for FilterListener {
    fn attach(&mut self, registry: &mut EventRegistry<Json, FilterError>) {
        let priority = self.priority;

        self.listeners
            .push(registry.attach(EventKind::PrepareQuery, priority, |event| {
                let _ = terms(event.accumulator_mut());
                Response::Handled
            }));

        for kind in SelectorKind::iter() {
            let filter = Rc::clone(&self.filter);
            self.listeners.push(registry.attach(
                EventKind::for_selector(kind),
                priority,
                move |event| match event.simple_selector() {
                    Some(simple) => filter.apply(simple, event.accumulator_mut()),
                    None => Response::Unhandled,
                },
            ));
        }

        self.listeners
            .push(registry.attach(EventKind::CombineSequence, priority, |event| {
                trace!(combinator = ?event.combinator(), "combinator ignored by document filter");
                Response::Handled
            }));
    }

    fn detach(&mut self, registry: &mut EventRegistry<Json, FilterError>) {
        for id in self.listeners.drain(..) {
            let _ = registry.detach(id);
        }
    }
}

struct Filter {
    config: FilterConfig,
    resolver: Box<dyn PathResolver>,
}

impl Filter {
    fn apply(&self, simple: &SimpleSelector, query: &mut Json) -> Response<FilterError> {
        let config = &self.config;
        match simple {
            SimpleSelector::Universal => Response::Handled,
            SimpleSelector::Element(name) => match config.element_field.as_deref() {
                Some(field) => {
                    terms(query)[field] = json!(name);
                    Response::Handled
                }
                None => Response::Unhandled,
            },
            SimpleSelector::Id(id) => {
                terms(query)[config.id_field.as_str()] = json!(id);
                Response::Handled
            }
            SimpleSelector::Role(role) => append_in(query, config.role_field.as_deref(), role),
            SimpleSelector::Class(class) => append_in(query, config.class_field.as_deref(), class),
            SimpleSelector::Path(path) => self.apply_path(path, query),
            SimpleSelector::Attribute(attribute) => apply_attribute(attribute, query).into(),
            SimpleSelector::Pseudo(pseudo) => apply_pseudo(pseudo, query),
        }
    }

    fn apply_path(&self, path: &Path, query: &mut Json) -> Response<FilterError> {
        let Some(field) = self.config.path_field.as_deref() else {
            return Response::Unhandled;
        };

        let mut segments = Vec::new();
        if let Some(root) = path.root() {
            let Some(resolved) = self.resolver.resolve(root) else {
                warn!(%root, %path, "path root did not resolve, filter matches nothing");
                terms(query)[field] = json!({ "$exists": false, "$in": [] });
                return Response::Handled;
            };
            segments.extend(
                resolved
                    .split(Path::SEPARATOR)
                    .filter(|segment| !segment.is_empty())
                    .map(str::to_string),
            );
        }
        segments.extend(path.segments().map(str::to_string));

        terms(query)[field] = if segments.iter().any(|segment| segment == Path::WILDCARD) {
            json!({ "$regex": wildcard_pattern(&segments) })
        } else {
            json!(format!("/{}", segments.join("/")))
        };
        Response::Handled
    }
}

/// Anchored regex for a path with `*` segments. A trailing `*` matches
/// any depth, others match exactly one segment.
fn wildcard_pattern(segments: &[String]) -> String {
    let last = segments.len().saturating_sub(1);
    let mut pattern = String::from("^");
    for (index, segment) in segments.iter().enumerate() {
        pattern.push(Path::SEPARATOR);
        match segment.as_str() {
            Path::WILDCARD if index == last => pattern.push_str(".*"),
            Path::WILDCARD => pattern.push_str("[^/]+"),
            literal => pattern.push_str(&regex::escape(literal)),
        }
    }
    pattern.push('$');
    pattern
}

fn append_in(query: &mut Json, field: Option<&str>, value: &str) -> Response<FilterError> {
    let Some(field) = field else {
        return Response::Unhandled;
    };
    match operand(query, field, "$in") {
        Json::Array(items) => items.push(json!(value)),
        slot => *slot = json!([value]),
    }
    Response::Handled
}

fn apply_attribute(attribute: &Attribute, query: &mut Json) -> Result<(), FilterError> {
    let field = attribute.name.as_str();
    let condition = &attribute.condition;

    let Some(operator) = attribute.operator else {
        *operand(query, field, "$exists") = Json::Bool(true);
        return Ok(());
    };

    let (command, value) = match operator {
        Operator::Equals => {
            terms(query)[field] = to_json(condition);
            return Ok(());
        }
        Operator::NotEquals => ("$ne", to_json(condition)),
        Operator::Gt => ("$gt", to_json(condition)),
        Operator::Gte => ("$gte", to_json(condition)),
        Operator::Lt => ("$lt", to_json(condition)),
        Operator::Lte => ("$lte", to_json(condition)),
        Operator::InList => ("$in", Json::Array(list_items(condition))),
        Operator::SubstrMatch => {
            let text = condition_text(operator, condition)?;
            ("$regex", json!(format!(".*{}.*", regex::escape(&text))))
        }
        Operator::SubstrPrefix => {
            let text = condition_text(operator, condition)?;
            ("$regex", json!(format!("^{}", regex::escape(&text))))
        }
        Operator::SubstrSuffix => {
            let text = condition_text(operator, condition)?;
            ("$regex", json!(format!("{}$", regex::escape(&text))))
        }
        Operator::RegExp => {
            let pattern = condition_text(operator, condition)?;
            if let Some(captures) = INLINE_FLAGS.captures(&pattern) {
                *operand(query, field, "$regex") = json!(&captures[2]);
                *operand(query, field, "$options") = json!(&captures[1]);
                return Ok(());
            }
            ("$regex", json!(pattern))
        }
    };

    *operand(query, field, command) = value;
    Ok(())
}

fn apply_pseudo(pseudo: &Pseudo, query: &mut Json) -> Response<FilterError> {
    let (key, value) = match pseudo {
        Pseudo::Sort { attribute, order } => {
            let direction = match order {
                SortOrder::Asc => 1,
                SortOrder::Desc => -1,
            };
            object_entry(document(query), "sort")[attribute.as_str()] = json!(direction);
            return Response::Handled;
        }
        Pseudo::Class { name, value } if name == "limit" => {
            ("limit", count(name, value.as_deref()))
        }
        Pseudo::Class { name, value } if SKIP_ALIASES.contains(&name.as_str()) => {
            ("skip", count(name, value.as_deref()))
        }
        Pseudo::Class { .. } => return Response::Unhandled,
    };

    match value {
        Ok(amount) => {
            document(query)[key] = json!(amount);
            Response::Handled
        }
        Err(error) => Response::Failed(error),
    }
}

fn count(name: &str, value: Option<&str>) -> Result<u64, FilterError> {
    value
        .and_then(|value| value.trim().parse().ok())
        .ok_or_else(|| FilterError::InvalidPseudoValue {
            name: name.to_string(),
            value: value.map(str::to_string),
        })
}

/// The accumulator as an object, replacing anything else.
fn document(query: &mut Json) -> &mut Json {
    if !query.is_object() {
        *query = Json::Object(Map::new());
    }
    query
}

/// The `query` object of the document.
fn terms(query: &mut Json) -> &mut Json {
    object_entry(document(query), "query")
}

/// `parent[key]` as an object. `parent` must be an object.
fn object_entry<'q>(parent: &'q mut Json, key: &str) -> &'q mut Json {
    let slot = &mut parent[key];
    if !slot.is_object() {
        *slot = Json::Object(Map::new());
    }
    slot
}

/// The `command` slot of `field`. An equality already set on the field is
/// kept as `$eq`.
fn operand<'q>(query: &'q mut Json, field: &str, command: &str) -> &'q mut Json {
    let slot = &mut terms(query)[field];
    if !slot.is_object() {
        let previous = slot.take();
        *slot = if previous.is_null() {
            Json::Object(Map::new())
        } else {
            json!({ "$eq": previous })
        };
    }
    &mut slot[command]
}

fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(value) => Json::Bool(*value),
        Value::Int(value) => json!(value),
        Value::Float(value) => {
            serde_json::Number::from_f64(*value).map_or(Json::Null, Json::Number)
        }
        Value::String(text) => json!(text),
        Value::List(items) => Json::Array(items.iter().map(to_json).collect()),
    }
}

/// Items of an `~=` condition. A string is split on whitespace; any other
/// scalar becomes a one item list.
fn list_items(condition: &Value) -> Vec<Json> {
    match condition {
        Value::List(items) => items.iter().map(to_json).collect(),
        Value::String(text) => text.split_whitespace().map(|item| json!(item)).collect(),
        scalar => vec![to_json(scalar)],
    }
}

/// Text form of a scalar condition for the substring and regex operators.
fn condition_text(operator: Operator, condition: &Value) -> Result<String, FilterError> {
    match condition {
        Value::String(text) => Ok(text.clone()),
        Value::Bool(_) | Value::Int(_) | Value::Float(_) => Ok(condition.to_string()),
        Value::Null | Value::List(_) => Err(FilterError::InvalidCondition {
            operator,
            condition: condition.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_pattern() {
        let segments =
            |path: &str| -> Vec<String> { path.split('/').map(str::to_string).collect() };
        assert_eq!(wildcard_pattern(&segments("a/*")), "^/a/.*$");
        assert_eq!(wildcard_pattern(&segments("a/*/c")), "^/a/[^/]+/c$");
        assert_eq!(wildcard_pattern(&segments("F. catus/*")), r"^/F\. catus/.*$");
    }

    #[test]
    fn test_inline_flags() {
        let captures = INLINE_FLAGS.captures("(?im)^jo.*").unwrap();
        assert_eq!(&captures[1], "im");
        assert_eq!(&captures[2], "^jo.*");
        assert!(INLINE_FLAGS.captures("(?q)x").is_none());
    }

    #[test]
    fn test_operand_keeps_previous_equality() {
        let mut query = json!({ "query": { "age": 3 } });
        *operand(&mut query, "age", "$ne") = json!(4);
        assert_eq!(query, json!({ "query": { "age": { "$eq": 3, "$ne": 4 } } }));
    }

    #[test]
    fn test_document_replaces_non_objects() {
        let mut query = json!([1, 2]);
        let _ = terms(&mut query);
        assert_eq!(query, json!({ "query": {} }));
    }

    #[test]
    fn test_count() {
        assert_eq!(count("limit", Some(" 10 ")), Ok(10));
        assert!(count("limit", Some("ten")).is_err());
        assert!(count("limit", Some("-1")).is_err());
        assert!(count("limit", None).is_err());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: FilterConfig =
            serde_json::from_str(r#"{ "id_field": "id", "class_field": null }"#).unwrap();
        assert_eq!(config.id_field, "id");
        assert_eq!(config.class_field, None);
        assert_eq!(config.role_field.as_deref(), Some("roles"));
        assert!(serde_json::from_str::<FilterConfig>(r#"{ "bogus": 1 }"#).is_err());
    }
}
