//! Parsing Canonical Form — converts an Avro schema tree to its canonical text
//!
//! The canonicalizer walks a decoded schema and emits the whitespace-free
//! normalization defined by the Avro specification. Its output feeds schema
//! fingerprinting and textual schema comparison.
//!
//! # Rules
//!
//! - Only `name`, `type`, `fields`, `symbols`, `items`, `values` and `size`
//!   survive; every other attribute (`doc`, `aliases`, `namespace`, ...) is
//!   dropped.
//! - Surviving attributes are emitted in that fixed order.
//! - Names are qualified with the enclosing namespace.
//! - `{"type": "<t>"}` collapses to `"<t>"`.
//! - A string `size` becomes a number.
//!
//! # Guarantees
//!
//! - **Deterministic**: same tree always produces byte-identical output
//! - **Pure**: no I/O, no shared mutable state; safe to call from any thread

use std::collections::BTreeMap;

use crate::value::Value;
use crate::{Error, Result};

/// Attributes kept in canonical form, in output order
pub const FIELD_ORDER: [&str; 7] = [
    "name", "type", "fields", "symbols", "items", "values", "size",
];

/// Precedence of a schema attribute, or `None` if it is stripped
pub fn field_order(key: &str) -> Option<usize> {
    FIELD_ORDER.iter().position(|k| *k == key).map(|i| i + 1)
}

/// Canonicalizer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalizerConfig {
    /// Deepest object/array nesting accepted before failing
    pub max_depth: usize,
}

impl CanonicalizerConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 512;
}

impl Default for CanonicalizerConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

// ── Public API ─────────────────────────────────────────────

/// Compute the Parsing Canonical Form of a schema tree
///
/// # Errors
/// `InvalidSchemaType` for boolean/null nodes, `InvalidSizeValue` for a
/// non-numeric `"size"` string, `DepthLimitExceeded` past the default depth.
pub fn canonicalize(schema: &Value) -> Result<String> {
    canonicalize_with(schema, &CanonicalizerConfig::default())
}

/// Compute the Parsing Canonical Form with explicit settings
pub fn canonicalize_with(schema: &Value, config: &CanonicalizerConfig) -> Result<String> {
    Context::root(config.max_depth).canonicalize(schema)
}

/// Decode JSON schema text and compute its Parsing Canonical Form
///
/// # Errors
/// Returns `ParseError` if `text` is not valid JSON, otherwise as
/// [`canonicalize`].
pub fn canonicalize_str(text: &str) -> Result<String> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    canonicalize(&Value::from(json))
}

// ── Context ────────────────────────────────────────────────

/// Position of a node in the tree, passed by value into every call
///
/// A callee works on its own copy; nothing it changes is seen by its
/// parent or siblings.
#[derive(Debug, Clone, Copy)]
struct Context<'a> {
    namespace: Option<&'a str>,
    /// Node sits in a `"fields"` list
    is_field_name: bool,
    /// Node sits in a `"type"`, `"items"` or `"values"` slot
    is_type: bool,
    depth: usize,
    max_depth: usize,
}

impl<'a> Context<'a> {
    fn root(max_depth: usize) -> Self {
        Self {
            namespace: None,
            is_field_name: false,
            is_type: false,
            depth: 0,
            max_depth,
        }
    }

    /// Non-empty enclosing namespace
    fn namespace(&self) -> Option<&'a str> {
        self.namespace.filter(|ns| !ns.is_empty())
    }

    fn descend(self) -> Result<Self> {
        if self.depth >= self.max_depth {
            return Err(Error::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }
        Ok(Self {
            depth: self.depth + 1,
            ..self
        })
    }

    fn for_key(self, key: &str) -> Self {
        Self {
            is_field_name: key == "fields",
            is_type: matches!(key, "type" | "items" | "values"),
            ..self
        }
    }

    fn canonicalize(self, value: &'a Value) -> Result<String> {
        match value {
            Value::Object(map) => self.descend()?.object(map),
            Value::Array(items) => self.descend()?.array(items),
            Value::String(s) => Ok(self.string(s)),
            Value::Number(n) => Ok(number(*n)),
            Value::Bool(_) | Value::Null => Err(Error::InvalidSchemaType(format!(
                "ought to be object, array, string or number; received {}: {}",
                value.kind(),
                value
            ))),
        }
    }

    fn string(&self, s: &str) -> String {
        match self.namespace() {
            Some(ns) if self.is_type && starts_with_uppercase(s) => quote(&format!("{ns}.{s}")),
            _ => quote(s),
        }
    }

    /// Arrays keep their order and share the parent's context
    fn array(self, items: &'a [Value]) -> Result<String> {
        let parts = items
            .iter()
            .map(|item| self.canonicalize(item))
            .collect::<Result<Vec<_>>>()?;
        Ok(format!("[{}]", parts.join(",")))
    }

    fn object(mut self, map: &'a BTreeMap<String, Value>) -> Result<String> {
        if let Some(Value::String(ns)) = map.get("namespace") {
            self.namespace = Some(ns.as_str());
        }

        // Primitive shorthand
        if map.len() == 1 {
            if let Some(Value::String(t)) = map.get("type") {
                return Ok(quote(t));
            }
        }

        let object_type = map.get("type").and_then(Value::as_str);
        let mut pairs: Vec<(usize, String)> = Vec::with_capacity(map.len());

        for (key, value) in map {
            let Some(order) = field_order(key) else {
                continue;
            };

            let child = self.for_key(key);
            let canonical_key = self.string(key);
            let canonical_value = match (key.as_str(), value, self.namespace()) {
                ("name", Value::String(name), Some(ns))
                    if !self.is_field_name && !name.contains('.') =>
                {
                    child.string(&format!("{ns}.{name}"))
                }
                ("size", Value::String(size), _) => number(parse_size(size)? as f64),
                _ => child.canonicalize(value)?,
            };

            // Named types other than record/enum carry no name in a type slot
            if self.is_type
                && key == "name"
                && object_type.is_some_and(|t| t != "record" && t != "enum")
            {
                continue;
            }

            pairs.push((order, format!("{canonical_key}:{canonical_value}")));
        }

        pairs.sort_by_key(|(order, _)| *order);
        let members: Vec<String> = pairs.into_iter().map(|(_, pair)| pair).collect();
        Ok(format!("{{{}}}", members.join(",")))
    }
}

// ── Scalars ────────────────────────────────────────────────

/// Shortest text that round-trips to the same `f64`
fn number(n: f64) -> String {
    n.to_string()
}

fn quote(s: &str) -> String {
    format!("\"{s}\"")
}

fn starts_with_uppercase(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_uppercase)
}

/// Base-10 unsigned integer, no sign or whitespace
fn parse_size(s: &str) -> Result<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidSizeValue(s.to_string()));
    }
    s.parse::<u64>()
        .map_err(|_| Error::InvalidSizeValue(s.to_string()))
}
