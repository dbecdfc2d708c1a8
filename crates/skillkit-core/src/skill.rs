//! Skill definition and parsing
//!
//! Each skill is a folder containing SKILL.md with YAML frontmatter, plus
//! optional `scripts/`, `references/` and `assets/` subdirectories.

use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, SkillError};
use crate::frontmatter::{decode_frontmatter, split_document, Metadata};

/// Canonical metadata file at the top of every skill directory
pub const SKILL_FILE: &str = "SKILL.md";
/// Subdirectory holding executable helpers
pub const SCRIPTS_DIR: &str = "scripts";
/// Subdirectory holding markdown reference documents
pub const REFERENCES_DIR: &str = "references";
/// Subdirectory holding arbitrary static files
pub const ASSETS_DIR: &str = "assets";

/// A parsed skill
///
/// Immutable once built: obtain one from [`Skill::load`], [`Skill::parse`] or
/// [`Skill::builder`]. File listings are read from disk on every call and are
/// never cached on the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skill {
    location: Option<PathBuf>,
    name: Option<String>,
    description: Option<String>,
    license: Option<String>,
    compatibility: Option<String>,
    metadata: Metadata,
    allowed_tools: Vec<String>,
    body: String,
}

impl Skill {
    /// Start building a skill in memory
    pub fn builder() -> SkillBuilder {
        SkillBuilder::default()
    }

    /// Load a skill from its directory
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let skill_file = dir.join(SKILL_FILE);

        if !skill_file.exists() {
            return Err(SkillError::NotFound(format!(
                "{SKILL_FILE} not found in {}",
                dir.display()
            )));
        }

        debug!("Loading skill from {:?}", skill_file);
        let content = fs::read_to_string(&skill_file)?;

        Self::from_document(&content, Some(dir.to_path_buf()))
    }

    /// Parse SKILL.md content that has no backing directory
    pub fn parse(content: &str) -> Result<Self> {
        Self::from_document(content, None)
    }

    fn from_document(content: &str, location: Option<PathBuf>) -> Result<Self> {
        let (yaml, body) = split_document(content)?;
        let frontmatter = decode_frontmatter(yaml)?;

        Ok(Self {
            location,
            name: frontmatter.name,
            description: frontmatter.description,
            license: frontmatter.license,
            compatibility: frontmatter.compatibility,
            metadata: frontmatter.metadata,
            allowed_tools: frontmatter.allowed_tools,
            body: body.to_string(),
        })
    }

    /// Backing directory, if loaded from disk
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Skill name (slug)
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Skill description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// License
    pub fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }

    /// Environment requirements
    pub fn compatibility(&self) -> Option<&str> {
        self.compatibility.as_deref()
    }

    /// Free-form metadata
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Tools the skill declares it may use, in declaration order
    pub fn allowed_tools(&self) -> &[String] {
        &self.allowed_tools
    }

    /// Markdown instructions following the frontmatter
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Base name of the backing directory
    pub fn directory_name(&self) -> Option<String> {
        self.location.as_deref().and_then(base_name)
    }

    /// Regular files directly under `scripts/`
    pub fn scripts(&self) -> Vec<PathBuf> {
        self.list_files(SCRIPTS_DIR, |_| true)
    }

    /// Markdown files directly under `references/`
    pub fn references(&self) -> Vec<PathBuf> {
        self.list_files(REFERENCES_DIR, |path| {
            path.extension().is_some_and(|ext| ext == "md")
        })
    }

    /// Regular files directly under `assets/`
    pub fn assets(&self) -> Vec<PathBuf> {
        self.list_files(ASSETS_DIR, |_| true)
    }

    fn list_files(&self, subdir: &str, keep: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
        let Some(root) = &self.location else {
            return Vec::new();
        };

        let Ok(entries) = fs::read_dir(root.join(subdir)) else {
            return Vec::new();
        };

        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && !is_hidden(path) && keep(path))
            .collect();

        files.sort();
        files
    }

    /// Render the skill as an XML block for a system prompt
    ///
    /// Values are inserted verbatim; markup characters in the description or
    /// body are not escaped.
    pub fn render_as_prompt(&self) -> String {
        format!(
            "<skill name=\"{}\">\n  <description>{}</description>\n  <instructions>\n{}\n  </instructions>\n</skill>",
            self.name.as_deref().unwrap_or_default(),
            self.description.as_deref().unwrap_or_default(),
            self.body
        )
    }

    /// Key/value view of every field that is present
    ///
    /// `location` is not part of the view.
    pub fn to_mapping(&self) -> Mapping {
        let mut map = Mapping::new();

        let optional = [
            ("name", &self.name),
            ("description", &self.description),
            ("license", &self.license),
            ("compatibility", &self.compatibility),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                map.insert(key.into(), value.clone().into());
            }
        }

        map.insert(
            "metadata".into(),
            Value::Mapping(
                self.metadata
                    .iter()
                    .map(|(k, v)| (Value::from(k.clone()), v.clone()))
                    .collect(),
            ),
        );
        map.insert(
            "allowed_tools".into(),
            Value::Sequence(self.allowed_tools.iter().cloned().map(Value::from).collect()),
        );
        map.insert("body".into(), self.body.clone().into());

        map
    }
}

/// Builder for skills constructed in memory
#[derive(Debug, Clone, Default)]
pub struct SkillBuilder {
    skill: Skill,
}

impl SkillBuilder {
    /// Attach a backing directory
    pub fn location(mut self, location: impl Into<PathBuf>) -> Self {
        self.skill.location = Some(location.into());
        self
    }

    /// Set the name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.skill.name = Some(name.into());
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.skill.description = Some(description.into());
        self
    }

    /// Set the license
    pub fn license(mut self, license: impl Into<String>) -> Self {
        self.skill.license = Some(license.into());
        self
    }

    /// Set the compatibility note
    pub fn compatibility(mut self, compatibility: impl Into<String>) -> Self {
        self.skill.compatibility = Some(compatibility.into());
        self
    }

    /// Add one metadata entry
    pub fn metadata_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.skill.metadata.insert(key.into(), value.into());
        self
    }

    /// Set the allowed tools
    pub fn allowed_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skill.allowed_tools = tools.into_iter().map(Into::into).collect();
        self
    }

    /// Set the body
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.skill.body = body.into();
        self
    }

    /// Finish the skill
    pub fn build(self) -> Skill {
        self.skill
    }
}

/// Final path component, resolving `.` and `..` through the filesystem
pub(crate) fn base_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .or_else(|| {
            path.canonicalize()
                .ok()?
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}
