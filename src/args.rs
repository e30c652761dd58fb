//! Declarative command-line argument parsing.
//!
//! A grammar is assembled once at startup from [`ArgSpec`] values: named
//! specs match by alias anywhere on the command line (either as `--alias value`
//! or the inline `--alias=value` form), positional specs consume whatever is
//! left, in declaration order. Parsing produces a flat name → value map.

use std::collections::{HashMap, VecDeque};

use crate::error::CliError;

/// A parsed argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Conversion applied to a raw token before it is stored.
///
/// `Str` is the identity conversion and the default for every spec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Cast {
    #[default]
    Str,
    Int,
}

impl Cast {
    fn apply(self, option: &str, raw: &str) -> Result<ArgValue, CliError> {
        match self {
            Self::Str => Ok(ArgValue::Str(raw.to_string())),
            Self::Int => raw
                .parse::<i64>()
                .map(ArgValue::Int)
                .map_err(|_| CliError::InvalidValue {
                    option: option.to_string(),
                    value: raw.to_string(),
                }),
        }
    }
}

/// How a token relates to a named spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgMatch {
    None,
    /// Token equals an alias; the value (if any) follows as the next token.
    Exact,
    /// Token uses the `alias=value` form; the value is embedded.
    Inline,
}

/// Specification of a single argument.
///
/// A spec is either value-taking (the default) or a flag carrying a fixed
/// constant; the two forms are mutually exclusive.
#[derive(Debug, Clone)]
pub struct ArgSpec {
    name: String,
    aliases: Vec<String>,
    const_value: Option<ArgValue>,
    default_value: Option<ArgValue>,
    cast: Cast,
}

impl ArgSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            const_value: None,
            default_value: None,
            cast: Cast::Str,
        }
    }

    /// Register one more recognized spelling for this spec.
    pub fn alias(mut self, key: &str) -> Self {
        self.aliases.push(key.to_string());
        self
    }

    pub fn cast(mut self, cast: Cast) -> Self {
        self.cast = cast;
        self
    }

    pub fn default(mut self, value: ArgValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Turn this spec into a flag that records `value` when present.
    pub fn constant(mut self, value: ArgValue) -> Self {
        self.const_value = Some(value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn takes_value(&self) -> bool {
        self.const_value.is_none()
    }

    /// Test a token against every alias. The `alias=value` form on a flag is
    /// a usage error, not a mismatch, and aborts the whole parse.
    pub fn matches(&self, token: &str) -> Result<ArgMatch, CliError> {
        for key in &self.aliases {
            if token == key {
                return Ok(ArgMatch::Exact);
            }
            if let Some(rest) = token.strip_prefix(key.as_str()) {
                if rest.starts_with('=') {
                    if self.takes_value() {
                        return Ok(ArgMatch::Inline);
                    }
                    return Err(CliError::RejectsValue(self.name.clone()));
                }
            }
        }
        Ok(ArgMatch::None)
    }
}

/// Result of a successful parse: spec name → cast value.
#[derive(Debug, Default)]
pub struct ParsedArgs {
    values: HashMap<String, ArgValue>,
}

impl ParsedArgs {
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ArgValue::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ArgValue::as_int)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An ordered collection of named and positional [`ArgSpec`]s.
#[derive(Debug, Default)]
pub struct CmdlineParser {
    named: Vec<ArgSpec>,
    positional: Vec<ArgSpec>,
}

impl CmdlineParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, spec: ArgSpec) -> Self {
        self.named.push(spec);
        self
    }

    pub fn positional(mut self, spec: ArgSpec) -> Self {
        self.positional.push(spec);
        self
    }

    /// Consume a token list in a single left-to-right pass.
    ///
    /// Named specs are tried in registration order and the first match wins.
    /// Tokens matching no alias fill positional slots in declaration order.
    /// Afterwards, unset specs fall back to their declared defaults; a
    /// positional spec left without value or default fails the parse.
    pub fn parse(&self, items: &[String]) -> Result<ParsedArgs, CliError> {
        let mut values = HashMap::new();
        let mut queue: VecDeque<&str> = items.iter().map(String::as_str).collect();
        let mut pending: VecDeque<&ArgSpec> = self.positional.iter().collect();

        while let Some(item) = queue.pop_front() {
            let mut matched = false;
            for spec in &self.named {
                match spec.matches(item)? {
                    ArgMatch::None => continue,
                    ArgMatch::Inline => {
                        let raw = item.split_once('=').map_or("", |(_, rest)| rest);
                        values.insert(spec.name.clone(), spec.cast.apply(&spec.name, raw)?);
                    }
                    ArgMatch::Exact => match &spec.const_value {
                        Some(constant) => {
                            values.insert(spec.name.clone(), constant.clone());
                        }
                        None => {
                            let raw = queue
                                .pop_front()
                                .ok_or_else(|| CliError::MissingValue(spec.name.clone()))?;
                            values.insert(spec.name.clone(), spec.cast.apply(&spec.name, raw)?);
                        }
                    },
                }
                matched = true;
                break;
            }
            if matched {
                continue;
            }
            match pending.pop_front() {
                Some(spec) => {
                    values.insert(spec.name.clone(), spec.cast.apply(&spec.name, item)?);
                }
                None => return Err(CliError::ExtraArgument(item.to_string())),
            }
        }

        for spec in &self.named {
            if !values.contains_key(&spec.name) {
                if let Some(default) = &spec.default_value {
                    values.insert(spec.name.clone(), default.clone());
                }
            }
        }
        for spec in pending {
            match &spec.default_value {
                Some(default) => {
                    values.insert(spec.name.clone(), default.clone());
                }
                None => return Err(CliError::MissingPositional(spec.name.clone())),
            }
        }

        Ok(ParsedArgs { values })
    }
}
