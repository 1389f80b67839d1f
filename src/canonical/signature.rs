
//! Declared constructor signatures, and the binding of call-site
//! arguments against them.
//!
//! Binding follows the familiar five-kind parameter model
//! (positional-only, positional-or-keyword, variadic positional,
//! keyword-only, variadic keyword). The result of a successful bind is
//! a [`CanonicalKey`]: every parameter appears under its own name with
//! defaults applied, and any extra keyword arguments are merged into
//! the same flat key rather than nested under the variadic name.

use super::key::{CanonicalKey, KeyValue};
use crate::error::UnitError;

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
  PositionalOnly,
  PositionalOrKeyword,
  VarPositional,
  KeywordOnly,
  VarKeyword,
}

#[derive(Debug, Clone)]
pub struct Parameter {
  pub name: String,
  pub kind: ParameterKind,
  pub default: Option<KeyValue>,
}

#[derive(Debug, Clone, Default)]
pub struct Signature {
  parameters: Vec<Parameter>,
}

/// Arguments supplied at a call site, in the shape they were given.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
  positional: Vec<KeyValue>,
  keyword: Vec<(String, KeyValue)>,
}

impl Signature {
  pub fn new() -> Self {
    Self::default()
  }

  fn with(mut self, name: impl Into<String>, kind: ParameterKind, default: Option<KeyValue>) -> Self {
    self.parameters.push(Parameter { name: name.into(), kind, default });
    self
  }

  pub fn positional_only(self, name: impl Into<String>) -> Self {
    self.with(name, ParameterKind::PositionalOnly, None)
  }

  pub fn positional(self, name: impl Into<String>) -> Self {
    self.with(name, ParameterKind::PositionalOrKeyword, None)
  }

  pub fn positional_with_default(self, name: impl Into<String>, default: impl Into<KeyValue>) -> Self {
    self.with(name, ParameterKind::PositionalOrKeyword, Some(default.into()))
  }

  pub fn var_positional(self, name: impl Into<String>) -> Self {
    self.with(name, ParameterKind::VarPositional, None)
  }

  pub fn keyword_only(self, name: impl Into<String>) -> Self {
    self.with(name, ParameterKind::KeywordOnly, None)
  }

  pub fn keyword_only_with_default(self, name: impl Into<String>, default: impl Into<KeyValue>) -> Self {
    self.with(name, ParameterKind::KeywordOnly, Some(default.into()))
  }

  pub fn var_keyword(self, name: impl Into<String>) -> Self {
    self.with(name, ParameterKind::VarKeyword, None)
  }

  pub fn parameters(&self) -> &[Parameter] {
    &self.parameters
  }

  fn find(&self, kind: ParameterKind) -> Option<&Parameter> {
    self.parameters.iter().find(|p| p.kind == kind)
  }

  /// Binds `args` against this signature, producing the normalized
  /// key under which the constructed value is registered.
  pub fn bind(&self, args: Arguments) -> Result<CanonicalKey, UnitError> {
    let mut bound: BTreeMap<String, KeyValue> = BTreeMap::new();
    let mut extra_positional = Vec::new();
    let mut extra_keyword: Vec<(String, KeyValue)> = Vec::new();

    let mut positional_params = self.parameters.iter()
      .filter(|p| matches!(p.kind, ParameterKind::PositionalOnly | ParameterKind::PositionalOrKeyword));
    for value in args.positional {
      match positional_params.next() {
        Some(param) => {
          bound.insert(param.name.clone(), value);
        }
        None => {
          extra_positional.push(value);
        }
      }
    }
    let var_positional = self.find(ParameterKind::VarPositional);
    if !extra_positional.is_empty() && var_positional.is_none() {
      return Err(UnitError::invalid_construction(
        format!("too many positional arguments ({} unexpected)", extra_positional.len()),
      ));
    }

    let var_keyword = self.find(ParameterKind::VarKeyword);
    for (name, value) in args.keyword {
      let param = self.parameters.iter().find(|p| p.name == name);
      match param.map(|p| p.kind) {
        Some(ParameterKind::PositionalOrKeyword) | Some(ParameterKind::KeywordOnly) => {
          if bound.contains_key(&name) {
            return Err(UnitError::invalid_construction(format!("multiple values for argument '{}'", name)));
          }
          bound.insert(name, value);
        }
        _ => {
          if var_keyword.is_none() {
            return Err(UnitError::invalid_construction(format!("unexpected keyword argument '{}'", name)));
          }
          if extra_keyword.iter().any(|(existing, _)| *existing == name) {
            return Err(UnitError::invalid_construction(format!("multiple values for argument '{}'", name)));
          }
          extra_keyword.push((name, value));
        }
      }
    }

    for param in &self.parameters {
      match param.kind {
        ParameterKind::VarPositional => {
          bound.insert(param.name.clone(), KeyValue::Tuple(std::mem::take(&mut extra_positional)));
        }
        ParameterKind::VarKeyword => {
          // Merged flat below.
        }
        _ => {
          if !bound.contains_key(&param.name) {
            match &param.default {
              Some(default) => {
                bound.insert(param.name.clone(), default.clone());
              }
              None => {
                return Err(UnitError::invalid_construction(format!("missing argument '{}'", param.name)));
              }
            }
          }
        }
      }
    }

    for (name, value) in extra_keyword {
      if bound.contains_key(&name) {
        return Err(UnitError::invalid_construction(
          format!("extra keyword argument '{}' collides with a bound parameter", name),
        ));
      }
      bound.insert(name, value);
    }

    if let Some((name, _)) = bound.iter().find(|(_, value)| !value.is_hashable()) {
      return Err(UnitError::invalid_construction(format!("unhashable value for argument '{}'", name)));
    }
    Ok(CanonicalKey::from_fields(bound))
  }
}

impl Arguments {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn arg(mut self, value: impl Into<KeyValue>) -> Self {
    self.positional.push(value.into());
    self
  }

  pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<KeyValue>) -> Self {
    self.keyword.push((name.into(), value.into()));
    self
  }
}
