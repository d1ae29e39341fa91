//! Output projection.
//!
//! A selector is resolved once, at invocation start, against the names an
//! operation publishes. Resolution fails before any call is made when the
//! name is unknown.
//!
//! | Selector  | Emits                                   |
//! |-----------|-----------------------------------------|
//! | `*`       | the whole response                      |
//! | `Field`   | one top-level response field            |
//! | `^Param`  | the value of input parameter `Param`    |
//!
//! Names match ASCII case-insensitively and resolve to the canonical
//! spelling, so `^pipelinename` and `^PipelineName` are the same selector.

use serde::Serialize;
use serde_json::Value;

use crate::error::{ProjectionError, ValidationError};

const WHOLE_RESPONSE: &str = "*";
const ECHO_PREFIX: char = '^';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Response,
    Field(&'static str),
    Input(&'static str),
}

impl Selector {
    pub fn resolve(
        operation: &'static str,
        raw: &str,
        fields: &'static [&'static str],
        parameters: &'static [&'static str],
    ) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::EmptySelector);
        }
        if raw == WHOLE_RESPONSE {
            return Ok(Self::Response);
        }
        if let Some(name) = raw.strip_prefix(ECHO_PREFIX) {
            let name = name.trim();
            if name.is_empty() {
                return Err(ValidationError::EmptySelector);
            }
            return canonical(parameters, name).map(Self::Input).ok_or_else(|| {
                ValidationError::UnknownParameter {
                    operation,
                    parameter: name.to_string(),
                }
            });
        }
        canonical(fields, raw)
            .map(Self::Field)
            .ok_or_else(|| ValidationError::UnknownField {
                operation,
                field: raw.to_string(),
                available: fields.to_vec(),
            })
    }

    pub fn is_echo(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

fn canonical(names: &'static [&'static str], wanted: &str) -> Option<&'static str> {
    names
        .iter()
        .copied()
        .find(|name| name.eq_ignore_ascii_case(wanted))
}

/// Applies a resolved [`Selector`] to responses or to the input.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    operation: &'static str,
    selector: Selector,
}

impl Projector {
    pub fn new(operation: &'static str, selector: Selector) -> Self {
        Self {
            operation,
            selector,
        }
    }

    pub fn selector(&self) -> Selector {
        self.selector
    }

    /// Project one response. `None` means nothing to emit: the selected
    /// field is absent or null, or the selector echoes an input.
    pub fn project<R: Serialize>(&self, response: &R) -> Result<Option<Value>, ProjectionError> {
        match self.selector {
            Selector::Input(_) => Ok(None),
            Selector::Response => self.to_value(response).map(Some),
            Selector::Field(name) => {
                let value = self.to_value(response)?;
                Ok(take_field(value, name))
            }
        }
    }

    /// Echo the selected input parameter. `None` when the selector is not
    /// an echo or the parameter was left unset.
    pub fn echo<I: Serialize>(&self, input: &I) -> Result<Option<Value>, ProjectionError> {
        match self.selector {
            Selector::Input(name) => {
                let value = self.to_value(input)?;
                Ok(take_field(value, name))
            }
            _ => Ok(None),
        }
    }

    fn to_value<T: Serialize>(&self, value: &T) -> Result<Value, ProjectionError> {
        serde_json::to_value(value).map_err(|source| ProjectionError {
            operation: self.operation,
            source,
        })
    }
}

fn take_field(value: Value, name: &str) -> Option<Value> {
    match value {
        Value::Object(mut map) => map.remove(name).filter(|v| !v.is_null()),
        _ => None,
    }
}
