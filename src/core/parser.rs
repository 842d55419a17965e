//! Response parsing for device-management output.
//!
//! Structured responses are decoded into a `serde_json::Value` tree (object / array /
//! scalar) and walked with explicit matches. Resource paths follow a small grammar:
//! a literal prefix immediately followed by a decimal id, e.g.
//! `/org/freedesktop/ModemManager1/SMS/12`.

use std::collections::BTreeSet;

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::model::SmsResource;
use crate::utils::error::{ModemError, Result};

pub const DEFAULT_SMS_PATH_PREFIX: &str = "/org/freedesktop/ModemManager1/SMS/";

pub const SENDER_KEYS: &[&str] = &["number", "from", "sender", "tel"];
pub const TEXT_KEYS: &[&str] = &["text", "content", "payload"];
pub const TIMESTAMP_KEYS: &[&str] = &["timestamp", "date"];
pub const STATE_KEYS: &[&str] = &["state"];

/// `<prefix><digits>` resource path grammar.
#[derive(Debug, Clone)]
pub struct ResourcePattern {
    prefix: String,
    exact: Regex,
    embedded: Regex,
}

impl ResourcePattern {
    pub fn new(prefix: &str) -> Result<Self> {
        if prefix.is_empty() {
            return Err(ModemError::InvalidConfigValueError {
                field: "sms_path_prefix".to_string(),
                value: prefix.to_string(),
                reason: "Prefix cannot be empty".to_string(),
            });
        }

        let escaped = regex::escape(prefix);
        let build = |source: String| {
            Regex::new(&source).map_err(|e| ModemError::ConfigError {
                message: format!("Invalid resource path pattern '{}': {}", source, e),
            })
        };

        Ok(Self {
            prefix: prefix.to_string(),
            exact: build(format!(r"^{}(\d+)$", escaped))?,
            embedded: build(format!(r"{}(\d+)", escaped))?,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.parse(candidate).is_some()
    }

    /// Parses a whole string as a resource path.
    pub fn parse(&self, candidate: &str) -> Option<SmsResource> {
        let caps = self.exact.captures(candidate)?;
        Some(SmsResource::new(candidate, caps.get(1)?.as_str()))
    }

    /// First resource path embedded anywhere in free-form text.
    pub fn find_first(&self, text: &str) -> Option<SmsResource> {
        let caps = self.embedded.captures(text)?;
        Some(SmsResource::new(caps.get(0)?.as_str(), caps.get(1)?.as_str()))
    }
}

impl Default for ResourcePattern {
    fn default() -> Self {
        Self::new(DEFAULT_SMS_PATH_PREFIX).expect("default SMS path prefix is a valid pattern")
    }
}

/// Collects every string leaf matching `pattern`, at any depth.
///
/// Never fails: scalars and non-matching trees yield an empty set.
pub fn extract_resource_paths(data: &Value, pattern: &ResourcePattern) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut pending = vec![data];

    while let Some(node) = pending.pop() {
        match node {
            Value::Object(map) => pending.extend(map.values()),
            Value::Array(items) => pending.extend(items.iter()),
            Value::String(s) if pattern.matches(s) => {
                found.insert(s.clone());
            }
            _ => {}
        }
    }

    found
}

pub fn extract_first_path_token(text: &str, pattern: &ResourcePattern) -> Option<SmsResource> {
    pattern.find_first(text)
}

/// Value of the first candidate key present in `record`. Null and empty strings count as absent.
pub fn normalize_field<'a>(record: &'a Map<String, Value>, candidate_keys: &[&str]) -> Option<&'a Value> {
    candidate_keys
        .iter()
        .filter_map(|key| record.get(*key))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
}

/// Scalar rendering used for the canonical string fields.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Decodes a JSON response with no nesting limit; deep input grows the stack on the heap.
pub fn parse_structured(output: &str) -> Result<Value> {
    if output.trim().is_empty() {
        return Err(ModemError::ResponseParse {
            message: "empty response".to_string(),
        });
    }

    let mut deserializer = serde_json::Deserializer::from_str(output);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

/// Last non-empty segment of a `/`-separated path, trailing slashes ignored.
pub fn last_path_segment(path: &str) -> Option<&str> {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

/// Parser bound to the configured SMS path grammar.
#[derive(Debug, Clone, Default)]
pub struct ResponseParser {
    sms_pattern: ResourcePattern,
}

impl ResponseParser {
    pub fn new(sms_path_prefix: &str) -> Result<Self> {
        Ok(Self {
            sms_pattern: ResourcePattern::new(sms_path_prefix)?,
        })
    }

    pub fn sms_pattern(&self) -> &ResourcePattern {
        &self.sms_pattern
    }

    pub fn parse(&self, output: &str) -> Result<Value> {
        parse_structured(output)
    }

    pub fn sms_paths(&self, data: &Value) -> BTreeSet<String> {
        extract_resource_paths(data, &self.sms_pattern)
    }

    pub fn first_sms_path(&self, text: &str) -> Option<SmsResource> {
        extract_first_path_token(text, &self.sms_pattern)
    }
}
