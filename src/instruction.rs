//! Instruction lines exchanged with the renderer.
//!
//! The wire format is one string per instruction:
//!
//! ```text
//! createElement(<json>);
//! updateElement(<id>,<json>);
//! ```
//!
//! Anything else written through [`crate::Registry::instruct`] is passed
//! through untouched and parses back as [`Instruction::Raw`].

use std::fmt;

use crate::{ElementRecord, Error, Result};

const CREATE_PREFIX: &str = "createElement(";
const UPDATE_PREFIX: &str = "updateElement(";
const SUFFIX: &str = ");";

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// A new element; `payload` is its JSON serialization
    Create { payload: String },
    /// Full re-serialization of an existing element
    Update { id: i64, payload: String },
    /// Caller-supplied line outside the create/update vocabulary
    Raw(String),
}

impl Instruction {
    /// Parse a log line.
    ///
    /// Lines that do not start with a known verb are `Raw`. A known verb with
    /// a missing terminator, a bad id or a payload that is not a JSON object is
    /// [`Error::MalformedInstruction`].
    pub fn parse(line: &str) -> Result<Instruction> {
        if let Some(rest) = line.strip_prefix(CREATE_PREFIX) {
            let body = strip_suffix(line, rest)?;
            check_payload(line, body)?;
            return Ok(Instruction::Create { payload: body.to_string() });
        }

        if let Some(rest) = line.strip_prefix(UPDATE_PREFIX) {
            let body = strip_suffix(line, rest)?;
            let (id, payload) = body
                .split_once(',')
                .ok_or_else(|| Error::MalformedInstruction(format!("missing id separator in '{}'", line)))?;
            let id = id
                .trim()
                .parse::<i64>()
                .map_err(|e| Error::MalformedInstruction(format!("bad element id '{}': {}", id, e)))?;
            check_payload(line, payload)?;
            return Ok(Instruction::Update { id, payload: payload.to_string() });
        }

        Ok(Instruction::Raw(line.to_string()))
    }

    /// Element id written in the line itself (update instructions only)
    pub fn target_id(&self) -> Option<i64> {
        match self {
            Instruction::Update { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Decode the element payload. `None` for raw lines.
    pub fn element(&self) -> Result<Option<ElementRecord>> {
        match self {
            Instruction::Create { payload } | Instruction::Update { payload, .. } => {
                Ok(Some(serde_json::from_str(payload)?))
            }
            Instruction::Raw(_) => Ok(None),
        }
    }
}

fn strip_suffix<'a>(line: &str, rest: &'a str) -> Result<&'a str> {
    rest.strip_suffix(SUFFIX)
        .ok_or_else(|| Error::MalformedInstruction(format!("missing '{}' terminator in '{}'", SUFFIX, line)))
}

fn check_payload(line: &str, payload: &str) -> Result<()> {
    match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(serde_json::Value::Object(_)) => Ok(()),
        Ok(_) => Err(Error::MalformedInstruction(format!("payload is not an object in '{}'", line))),
        Err(e) => Err(Error::MalformedInstruction(format!("invalid JSON in '{}': {}", line, e))),
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Create { payload } => write!(f, "{}{}{}", CREATE_PREFIX, payload, SUFFIX),
            Instruction::Update { id, payload } => write!(f, "{}{},{}{}", UPDATE_PREFIX, id, payload, SUFFIX),
            Instruction::Raw(s) => f.write_str(s),
        }
    }
}
