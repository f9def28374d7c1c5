//! Element records, construction options and host-side event handlers.
//!
//! An [`Element`] splits into two halves: the serializable record (`id`,
//! `pos`, `tag`, `innerText`) that crosses the boundary to the renderer, and a
//! local [`EventTable`] of callbacks that never leaves the host.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use log::warn;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::{Error, Result, Vector2d};

/// Callback bound to an element event. Receives the element it fired on.
pub type EventHandler = Arc<dyn Fn(&Element) + Send + Sync>;

/// Id carried by an element that has not been stored in a registry yet
pub const UNASSIGNED_ID: i64 = -1;

/// Event key under which buttons register their click handler
pub const CLICK_EVENT: &str = "click";

/// Handler that does nothing; the default `click` for buttons.
pub fn noop_handler() -> EventHandler {
    Arc::new(|_| {})
}

/// Element variants, selected by the `tag` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Plain element; keeps whatever tag it was given
    Element,
    /// `<button>` with a `click` handler
    Button,
}

impl ElementKind {
    /// Pick the variant for a tag. Unknown and missing tags build a plain element.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("button") => ElementKind::Button,
            _ => ElementKind::Element,
        }
    }

    /// Tag the variant forces onto every element it builds, if any
    pub fn forced_tag(self) -> Option<&'static str> {
        match self {
            ElementKind::Element => None,
            ElementKind::Button => Some("button"),
        }
    }
}

/// A single value in the loosely-typed key/value construction protocol.
#[derive(Clone)]
pub enum OptionValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Vector(Vector2d),
    Handler(EventHandler),
    Json(serde_json::Value),
}

impl OptionValue {
    pub fn handler<F>(f: F) -> Self
    where
        F: Fn(&Element) + Send + Sync + 'static,
    {
        OptionValue::Handler(Arc::new(f))
    }

    fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Text(_) => "text",
            OptionValue::Number(_) => "number",
            OptionValue::Bool(_) => "bool",
            OptionValue::Vector(_) => "vector",
            OptionValue::Handler(_) => "handler",
            OptionValue::Json(_) => "json",
        }
    }

    fn into_text(self) -> Option<String> {
        match self {
            OptionValue::Text(s) => Some(s),
            OptionValue::Json(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    fn into_vector(self) -> Option<Vector2d> {
        match self {
            OptionValue::Vector(v) => Some(v),
            OptionValue::Json(v @ serde_json::Value::Object(_)) => serde_json::from_value(v).ok(),
            _ => None,
        }
    }
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            OptionValue::Number(n) => f.debug_tuple("Number").field(n).finish(),
            OptionValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            OptionValue::Vector(v) => f.debug_tuple("Vector").field(v).finish(),
            OptionValue::Handler(_) => f.write_str("Handler(..)"),
            OptionValue::Json(v) => f.debug_tuple("Json").field(v).finish(),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

impl From<f64> for OptionValue {
    fn from(n: f64) -> Self {
        OptionValue::Number(n)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<Vector2d> for OptionValue {
    fn from(v: Vector2d) -> Self {
        OptionValue::Vector(v)
    }
}

impl From<serde_json::Value> for OptionValue {
    fn from(v: serde_json::Value) -> Self {
        OptionValue::Json(v)
    }
}

/// Options recognized when constructing an element.
///
/// Every field is optional; missing ones fall back to `""`, `(0, 0)` and a
/// no-op click handler. Options no variant understands are kept in `extra`.
///
/// ```
/// use domlog::{ElementOptions, Vector2d};
///
/// let opts = ElementOptions::new()
///     .tag("button")
///     .pos(Vector2d::new(10.0, 20.0))
///     .inner_text("Go");
/// assert_eq!(opts.tag.as_deref(), Some("button"));
/// ```
#[derive(Clone, Default)]
pub struct ElementOptions {
    pub tag: Option<String>,
    pub pos: Option<Vector2d>,
    pub inner_text: Option<String>,
    pub click: Option<EventHandler>,
    pub extra: BTreeMap<String, OptionValue>,
}

impl ElementOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn pos(mut self, pos: Vector2d) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn inner_text(mut self, text: impl Into<String>) -> Self {
        self.inner_text = Some(text.into());
        self
    }

    pub fn click<F>(mut self, f: F) -> Self
    where
        F: Fn(&Element) + Send + Sync + 'static,
    {
        self.click = Some(Arc::new(f));
        self
    }

    /// Build options from parallel key and value lists.
    ///
    /// Keys have all whitespace removed before use (`" inner Text "` becomes
    /// `innerText`). In lenient mode a count mismatch only drops the unpaired
    /// entries, a repeated key keeps the last value of the right type and a
    /// recognized key with the wrong value type is ignored; each case logs a
    /// warning. With `strict` set, all three are [`Error::InvalidConfiguration`].
    pub fn from_pairs<K: AsRef<str>>(keys: &[K], values: Vec<OptionValue>, strict: bool) -> Result<Self> {
        if keys.len() != values.len() {
            let msg = format!("{} keys but {} values", keys.len(), values.len());
            if strict {
                return Err(Error::InvalidConfiguration(msg));
            }
            warn!("element options: {}; unpaired entries are ignored", msg);
        }

        let mut opts = ElementOptions::new();
        let mut seen: Vec<String> = Vec::with_capacity(keys.len());
        for (key, value) in keys.iter().zip(values) {
            let name: String = key.as_ref().chars().filter(|c| !c.is_whitespace()).collect();
            if seen.contains(&name) {
                if strict {
                    return Err(Error::InvalidConfiguration(format!("duplicate option '{}'", name)));
                }
                warn!("element options: '{}' given twice, the last valid value wins", name);
            } else {
                seen.push(name.clone());
            }
            opts.set(name, value, strict)?;
        }
        Ok(opts)
    }

    fn set(&mut self, name: String, value: OptionValue, strict: bool) -> Result<()> {
        let found = value.type_name();
        let applied = match name.as_str() {
            "tag" => {
                if let Some(t) = value.into_text() {
                    self.tag = Some(t);
                    true
                } else {
                    false
                }
            }
            "pos" => {
                if let Some(v) = value.into_vector() {
                    self.pos = Some(v);
                    true
                } else {
                    false
                }
            }
            "innerText" => {
                if let Some(t) = value.into_text() {
                    self.inner_text = Some(t);
                    true
                } else {
                    false
                }
            }
            "click" => {
                if let OptionValue::Handler(h) = value {
                    self.click = Some(h);
                    true
                } else {
                    false
                }
            }
            _ => {
                self.extra.insert(name, value);
                return Ok(());
            }
        };
        if !applied {
            let msg = format!("option '{}' does not accept a {} value", name, found);
            if strict {
                return Err(Error::InvalidConfiguration(msg));
            }
            warn!("element options: {}; using the default", msg);
        }
        Ok(())
    }
}

impl fmt::Debug for ElementOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementOptions")
            .field("tag", &self.tag)
            .field("pos", &self.pos)
            .field("inner_text", &self.inner_text)
            .field("click", &self.click.as_ref().map(|_| ".."))
            .field("extra", &self.extra)
            .finish()
    }
}

/// Host-side event handlers, keyed by event name. Never serialized.
#[derive(Clone, Default)]
pub struct EventTable {
    handlers: BTreeMap<String, EventHandler>,
}

impl EventTable {
    pub fn insert(&mut self, name: impl Into<String>, handler: EventHandler) -> Option<EventHandler> {
        self.handlers.insert(name.into(), handler)
    }

    pub fn get(&self, name: &str) -> Option<&EventHandler> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for EventTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

/// A UI element owned by a [`crate::Registry`].
#[derive(Debug, Clone)]
pub struct Element {
    id: i64,
    kind: ElementKind,
    pub tag: String,
    pub pos: Vector2d,
    pub inner_text: String,
    events: EventTable,
}

impl Element {
    /// Plain element from options. The id stays unassigned until stored.
    pub fn new(options: ElementOptions) -> Self {
        Self::build(ElementKind::Element, options)
    }

    /// Button from options; the tag is always `"button"`.
    pub fn button(options: ElementOptions) -> Self {
        Self::build(ElementKind::Button, options)
    }

    /// Construct the given variant. Forced tags override whatever the options say.
    pub fn build(kind: ElementKind, options: ElementOptions) -> Self {
        let ElementOptions { tag, pos, inner_text, click, extra: _ } = options;
        let tag = match kind.forced_tag() {
            Some(forced) => forced.to_string(),
            None => tag.unwrap_or_default(),
        };

        let mut events = EventTable::default();
        if kind == ElementKind::Button {
            events.insert(CLICK_EVENT, click.unwrap_or_else(noop_handler));
        }

        Element {
            id: UNASSIGNED_ID,
            kind,
            tag,
            pos: pos.unwrap_or_default(),
            inner_text: inner_text.unwrap_or_default(),
            events,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: i64) {
        debug_assert_eq!(self.id, UNASSIGNED_ID, "element ids are assigned once");
        self.id = id;
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn events(&self) -> &EventTable {
        &self.events
    }

    /// Register (or replace) the handler for `name`
    pub fn on<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&Element) + Send + Sync + 'static,
    {
        self.events.insert(name, Arc::new(f));
        self
    }

    pub fn has_event(&self, name: &str) -> bool {
        self.events.contains(name)
    }

    /// Run the handler for `name` on the host. Returns false if none is bound.
    pub fn trigger(&self, name: &str) -> bool {
        match self.events.get(name) {
            Some(handler) => {
                let handler = handler.clone();
                handler(self);
                true
            }
            None => false,
        }
    }

    /// Owned copy of the serializable half of this element
    pub fn record(&self) -> ElementRecord {
        ElementRecord {
            id: self.id,
            pos: self.pos,
            tag: self.tag.clone(),
            inner_text: self.inner_text.clone(),
        }
    }
}

// Written by hand so the event table is left out without cloning into an
// `ElementRecord` first.
impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Element", 4)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("pos", &self.pos)?;
        s.serialize_field("tag", &self.tag)?;
        s.serialize_field("innerText", &self.inner_text)?;
        s.end()
    }
}

/// The part of an element that crosses the boundary to the renderer.
///
/// Decoding ignores unknown fields and defaults missing ones, so payloads from
/// newer writers still parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub id: i64,
    #[serde(default)]
    pub pos: Vector2d,
    #[serde(default)]
    pub tag: String,
    #[serde(default, rename = "innerText")]
    pub inner_text: String,
}
