//! `SkillKit` core
//!
//! Packaged agent skills: a directory holding a SKILL.md document (YAML
//! frontmatter plus markdown instructions) and optional `scripts/`,
//! `references/` and `assets/` folders.
//!
//! ## Features
//!
//! - Parse SKILL.md into a [`Skill`], decoding frontmatter as plain data only
//! - Validate names, descriptions and compatibility notes against the format rules
//! - Pack a skill directory into a single `.skill` archive and unpack it again
//! - Discover skills under a list of root directories
//! - Scaffold new skills from a template
//!
//! ## Layout
//!
//! ```text
//! my-skill/
//! ├── SKILL.md
//! ├── scripts/
//! ├── references/   (*.md)
//! └── assets/
//! ```

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod archive;
pub mod error;
pub mod frontmatter;
pub mod generator;
pub mod registry;
pub mod skill;
pub mod validator;

pub use archive::{pack, unpack, SKILL_EXTENSION};
pub use error::{ErrorKind, Result, SkillError};
pub use frontmatter::{Frontmatter, Metadata};
pub use generator::{GenerateOptions, Generator};
pub use registry::{default_search_paths, SkillsRegistry};
pub use skill::{Skill, SkillBuilder, SKILL_FILE};
pub use validator::{ValidationReport, Validator};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Skill, SkillError, SkillsRegistry, ValidationReport, Validator};
}
