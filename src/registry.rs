//! Element registry and append-only instruction log.
//!
//! The registry hands out ids, owns every element it creates and records one
//! instruction line per create/update for the renderer to replay. It never
//! talks to the renderer itself; callers ship [`Registry::log`] (or the tail
//! returned by [`Registry::instructions_since`]) however they like.

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use sha2::{Digest, Sha256};

use crate::element::{Element, ElementKind, ElementOptions, OptionValue};
use crate::instruction::Instruction;
use crate::{Error, RegistryConfig, Result};

/// Owns elements and the instruction log describing them.
#[derive(Debug, Default)]
pub struct Registry {
    config: RegistryConfig,
    next_id: i64,
    // Ordered by id, which is also creation order since ids are never reused.
    elements: BTreeMap<i64, Element>,
    log: Vec<String>,
    // Last payload written per element; read only by `update_changed`.
    last_sent: HashMap<i64, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Registry { config, ..Default::default() }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Create an element from parallel key/value lists.
    ///
    /// ```
    /// use domlog::Registry;
    ///
    /// let mut reg = Registry::new();
    /// let button = reg
    ///     .create_element_from_pairs(&["tag", "innerText"], vec!["button".into(), "Go".into()])
    ///     .unwrap();
    /// assert_eq!(button.id(), 0);
    /// assert_eq!(
    ///     reg.log()[0],
    ///     r#"createElement({"id":0,"pos":{"x":0,"y":0},"tag":"button","innerText":"Go"});"#
    /// );
    /// ```
    pub fn create_element_from_pairs<K: AsRef<str>>(&mut self, keys: &[K], values: Vec<OptionValue>) -> Result<&mut Element> {
        let options = ElementOptions::from_pairs(keys, values, self.config.strict_options)?;
        self.create_element(options)
    }

    /// Build the variant selected by `options.tag`, store it under the next
    /// id and append its `createElement` instruction.
    ///
    /// If serialization fails the id is not consumed and nothing is logged.
    pub fn create_element(&mut self, options: ElementOptions) -> Result<&mut Element> {
        let kind = ElementKind::from_tag(options.tag.as_deref());
        let mut element = Element::build(kind, options);
        let id = self.next_id;
        element.assign_id(id);

        let payload = self.serialize(&element)?;
        self.next_id += 1;
        debug!("created element {} ({:?}, tag '{}')", id, kind, element.tag);
        self.instruct(Instruction::Create { payload: payload.clone() }.to_string());
        self.last_sent.insert(id, payload);

        Ok(self.elements.entry(id).or_insert(element))
    }

    /// Append one `updateElement` line for every stored element, changed or not.
    ///
    /// Returns the number of lines appended. Either every element is written
    /// or, on a serialization error, none is.
    pub fn update(&mut self) -> Result<usize> {
        let pending = self
            .elements
            .values()
            .map(|e| -> Result<(i64, String)> { Ok((e.id(), self.serialize(e)?)) })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.emit_updates(pending))
    }

    /// Like [`update`](Self::update), but skips elements whose serialization
    /// matches the last line written for them.
    pub fn update_changed(&mut self) -> Result<usize> {
        let mut pending = Vec::new();
        for e in self.elements.values() {
            let payload = self.serialize(e)?;
            if self.last_sent.get(&e.id()) != Some(&payload) {
                pending.push((e.id(), payload));
            }
        }
        Ok(self.emit_updates(pending))
    }

    fn emit_updates(&mut self, pending: Vec<(i64, String)>) -> usize {
        let count = pending.len();
        for (id, payload) in pending {
            self.instruct(Instruction::Update { id, payload: payload.clone() }.to_string());
            self.last_sent.insert(id, payload);
        }
        debug!("update pass wrote {} of {} elements", count, self.elements.len());
        count
    }

    /// Append a raw line to the log.
    pub fn instruct(&mut self, s: impl Into<String>) {
        self.log.push(s.into());
    }

    /// Trigger a host-side event handler on a stored element.
    pub fn trigger(&self, id: i64, event: &str) -> Result<bool> {
        let element = self.elements.get(&id).ok_or(Error::UnknownElement(id))?;
        Ok(element.trigger(event))
    }

    fn serialize(&self, element: &Element) -> Result<String> {
        if !element.pos.is_finite() {
            if self.config.reject_non_finite {
                return Err(Error::DegenerateVector(format!(
                    "element {} has non-finite position {}",
                    element.id(),
                    element.pos
                )));
            }
            warn!("element {} has non-finite position {}; written as null", element.id(), element.pos);
        }
        Ok(serde_json::to_string(element)?)
    }

    /// Every line written so far, oldest first
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Lines appended after the first `offset` ones. Empty if `offset` is past the end.
    pub fn instructions_since(&self, offset: usize) -> &[String] {
        &self.log[offset.min(self.log.len())..]
    }

    /// Hex SHA-256 over the log, one newline-terminated line at a time.
    pub fn log_digest(&self) -> String {
        let mut hasher = Sha256::new();
        for line in &self.log {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }

    pub fn get(&self, id: i64) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    /// Stored elements in id order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Id the next created element will receive
    pub fn next_id(&self) -> i64 {
        self.next_id
    }
}
