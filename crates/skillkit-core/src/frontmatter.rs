//! SKILL.md frontmatter parsing
//!
//! A document is a `---` marker line, a YAML block, a closing `---` line and
//! a markdown body. The YAML block is decoded into plain data only: any tagged
//! node is rejected instead of being handed to a type constructor.

use regex::Regex;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::{Result, SkillError};

#[allow(clippy::expect_used)]
static FRONTMATTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---\s*\n(.+?)\n---\s*(?:\n(.*))?\z")
        .expect("frontmatter pattern is a valid regex")
});

/// Open `metadata` mapping: string keys to arbitrary YAML data
pub type Metadata = BTreeMap<String, Value>;

/// Decoded frontmatter fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    /// `name`
    pub name: Option<String>,
    /// `description`
    pub description: Option<String>,
    /// `license`
    pub license: Option<String>,
    /// `compatibility`
    pub compatibility: Option<String>,
    /// `metadata`, empty when absent
    pub metadata: Metadata,
    /// `allowed-tools`, split into tokens
    pub allowed_tools: Vec<String>,
}

/// Shape of the block before field coercion
#[derive(Debug, Default, Deserialize)]
struct RawFrontmatter {
    #[serde(default)]
    name: Value,
    #[serde(default)]
    description: Value,
    #[serde(default)]
    license: Value,
    #[serde(default)]
    compatibility: Value,
    #[serde(default)]
    metadata: Value,
    #[serde(default, rename = "allowed-tools")]
    allowed_tools: Value,
    #[serde(flatten)]
    unknown: BTreeMap<String, Value>,
}

/// Split a document into its raw YAML block and its trimmed body
pub fn split_document(content: &str) -> Result<(&str, &str)> {
    let captures = FRONTMATTER_RE.captures(content).ok_or_else(|| {
        SkillError::Parse("Invalid SKILL.md format: missing YAML frontmatter".to_string())
    })?;

    let yaml = captures.get(1).map_or("", |m| m.as_str());
    let body = captures.get(2).map_or("", |m| m.as_str());

    Ok((yaml, body.trim()))
}

/// Decode a YAML block into [`Frontmatter`]
pub fn decode_frontmatter(yaml: &str) -> Result<Frontmatter> {
    let value: Value = serde_yaml::from_str(yaml)
        .map_err(|e| SkillError::Parse(format!("Invalid YAML frontmatter: {e}")))?;

    reject_tags(&value)?;

    let raw = match value {
        Value::Null => RawFrontmatter::default(),
        Value::Mapping(_) => serde_yaml::from_value::<RawFrontmatter>(value)
            .map_err(|e| SkillError::Parse(format!("Invalid YAML frontmatter: {e}")))?,
        _ => {
            return Err(SkillError::Parse(
                "Invalid YAML frontmatter: expected a mapping".to_string(),
            ))
        }
    };

    for key in raw.unknown.keys() {
        debug!("Ignoring unknown frontmatter key '{}'", key);
    }

    Ok(Frontmatter {
        name: scalar_text("name", raw.name)?,
        description: scalar_text("description", raw.description)?,
        license: scalar_text("license", raw.license)?,
        compatibility: scalar_text("compatibility", raw.compatibility)?,
        metadata: metadata_map(raw.metadata)?,
        allowed_tools: allowed_tools(raw.allowed_tools)?,
    })
}

/// Walk the decoded tree and fail on the first tagged node
fn reject_tags(value: &Value) -> Result<()> {
    match value {
        Value::Tagged(tagged) => Err(SkillError::Parse(format!(
            "Invalid YAML frontmatter: unsupported tag {}",
            tagged.tag
        ))),
        Value::Sequence(items) => items.iter().try_for_each(reject_tags),
        Value::Mapping(map) => map.iter().try_for_each(|(k, v)| {
            reject_tags(k)?;
            reject_tags(v)
        }),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(()),
    }
}

fn scalar_text(key: &str, value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => Err(SkillError::Parse(
            format!("Invalid YAML frontmatter: '{key}' must be a string"),
        )),
    }
}

fn metadata_map(value: Value) -> Result<Metadata> {
    match value {
        Value::Null => Ok(Metadata::new()),
        Value::Mapping(map) => map
            .into_iter()
            .map(|(k, v)| match k {
                Value::String(key) => Ok((key, v)),
                _ => Err(SkillError::Parse(
                    "Invalid YAML frontmatter: 'metadata' keys must be strings".to_string(),
                )),
            })
            .collect(),
        _ => Err(SkillError::Parse(
            "Invalid YAML frontmatter: 'metadata' must be a mapping".to_string(),
        )),
    }
}

/// `allowed-tools` is normally one whitespace-separated string; an explicit
/// YAML list is taken item by item
fn allowed_tools(value: Value) -> Result<Vec<String>> {
    match value {
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| {
                scalar_text("allowed-tools", item)?.ok_or_else(|| {
                    SkillError::Parse(
                        "Invalid YAML frontmatter: 'allowed-tools' entries must be strings"
                            .to_string(),
                    )
                })
            })
            .collect(),
        Value::Mapping(_) => Err(SkillError::Parse(
            "Invalid YAML frontmatter: 'allowed-tools' must be a string or a list".to_string(),
        )),
        other => Ok(scalar_text("allowed-tools", other)?
            .map(|text| text.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()),
    }
}
