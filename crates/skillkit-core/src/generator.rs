//! New skill scaffolding

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Result, SkillError};
use crate::skill::{ASSETS_DIR, REFERENCES_DIR, SCRIPTS_DIR, SKILL_FILE};

/// What to scaffold
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Parent directory; the skill lands in `<path>/<name>`
    pub path: PathBuf,
    /// Skill name
    pub name: String,
    /// Skill description
    pub description: String,
    /// Create an empty `scripts/`
    pub with_scripts: bool,
    /// Create an empty `references/`
    pub with_references: bool,
    /// Create an empty `assets/`
    pub with_assets: bool,
}

/// Writes a new skill directory from the built-in template
#[derive(Debug, Clone, Copy, Default)]
pub struct Generator;

impl Generator {
    /// Create the skill directory and return its path
    pub fn create(options: &GenerateOptions) -> Result<PathBuf> {
        if options.name.is_empty() {
            return Err(SkillError::InvalidArgument("name is required".to_string()));
        }
        if options.description.is_empty() {
            return Err(SkillError::InvalidArgument(
                "description is required".to_string(),
            ));
        }

        let skill_path = options.path.join(&options.name);
        fs::create_dir_all(&skill_path)?;

        let optional_dirs = [
            (options.with_scripts, SCRIPTS_DIR),
            (options.with_references, REFERENCES_DIR),
            (options.with_assets, ASSETS_DIR),
        ];
        for (wanted, dir) in optional_dirs {
            if wanted {
                fs::create_dir_all(skill_path.join(dir))?;
            }
        }

        fs::write(skill_path.join(SKILL_FILE), render(options)?)?;

        info!("Created skill '{}' at {:?}", options.name, skill_path);
        Ok(skill_path)
    }
}

fn render(options: &GenerateOptions) -> Result<String> {
    let name = yaml_scalar(&options.name)?;
    let description = yaml_scalar(&options.description)?;
    let title = titleize(&options.name);

    Ok(format!(
        "---
name: {name}
description: {description}
---

# {title}

## Instructions

[Add step-by-step instructions here]

## Examples

### Input
[Example input]

### Output
[Expected output]

## Guidelines

- [Add guidelines here]
"
    ))
}

/// Single-line YAML rendering of a string, quoted only when needed
fn yaml_scalar(value: &str) -> Result<String> {
    let rendered = serde_yaml::to_string(value)
        .map_err(|e| SkillError::InvalidArgument(format!("cannot encode '{value}': {e}")))?;
    let rendered = rendered.trim_end();

    // block scalars span several lines
    if rendered.contains('\n') {
        return Ok(double_quoted(value));
    }
    Ok(rendered.to_string())
}

/// YAML double-quoted scalar with YAML escape sequences
fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' | '\u{2029}' => out.push_str(&format!("\\u{:04X}", u32::from(c))),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `pdf-tools` -> `Pdf Tools`
fn titleize(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when `path` already holds a skill
pub fn is_skill_dir(path: &Path) -> bool {
    path.join(SKILL_FILE).is_file()
}
