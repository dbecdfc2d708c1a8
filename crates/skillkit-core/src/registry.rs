//! Skills registry: discovery of skill directories under a set of roots
//!
//! Each root is scanned for `<root>/*/SKILL.md`. A skill that fails to load
//! is logged and skipped; one bad skill never aborts the scan.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::skill::{Skill, SKILL_FILE};

/// Conventional skill roots: `~/.config/claude/skills`, `.claude/skills`
/// and `skills`
pub fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config").join("claude").join("skills"));
    } else {
        warn!("Could not find home directory for personal skills");
    }

    paths.push(PathBuf::from(".claude/skills"));
    paths.push(PathBuf::from("skills"));
    paths
}

/// Skills registry keyed by skill name
#[derive(Debug, Default)]
pub struct SkillsRegistry {
    /// Discovered skills
    skills: BTreeMap<String, Skill>,
    /// Roots to scan, in priority order (later roots win)
    directories: Vec<PathBuf>,
    /// Skill directories that failed to load, with the reason
    errors: Vec<(PathBuf, String)>,
}

impl SkillsRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root directory to scan
    pub fn add_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directories.push(dir.into());
        self
    }

    /// Add several root directories to scan
    pub fn with_directories<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.directories.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Configured roots
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Scan all configured roots, replacing any previous results
    pub fn discover(&mut self) -> &BTreeMap<String, Skill> {
        info!(
            "Starting skills discovery in {} directories",
            self.directories.len()
        );

        self.skills.clear();
        self.errors.clear();

        let directories = self.directories.clone();

        for dir in &directories {
            if !dir.exists() {
                debug!("Skills directory does not exist: {:?}", dir);
                continue;
            }

            if !dir.is_dir() {
                warn!("Skills path is not a directory: {:?}", dir);
                continue;
            }

            self.scan_directory(dir);
        }

        info!("Discovered {} skills", self.skills.len());
        &self.skills
    }

    /// Scan a single root for `*/SKILL.md`
    fn scan_directory(&mut self, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to read directory {:?}: {}", dir, e);
                return;
            }
        };

        let mut candidates: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_dir()
                    && path.join(SKILL_FILE).is_file()
                    && !path
                        .file_name()
                        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
            })
            .collect();
        candidates.sort();

        for path in candidates {
            match Skill::load(&path) {
                Ok(skill) => {
                    let Some(name) = skill.name().map(str::to_string) else {
                        warn!("Skipping skill at {:?}: name is missing", path);
                        self.errors.push((path, "name is required".to_string()));
                        continue;
                    };
                    debug!("Discovered skill: {} at {:?}", name, path);
                    self.skills.insert(name, skill);
                }
                Err(e) => {
                    warn!("Failed to load skill at {:?}: {}", path, e);
                    self.errors.push((path, e.to_string()));
                }
            }
        }
    }

    /// Get a skill by name
    pub fn get(&self, name: &str) -> Option<&Skill> {
        self.skills.get(name)
    }

    /// Skill names in sorted order
    pub fn skill_names(&self) -> impl Iterator<Item = &String> {
        self.skills.keys()
    }

    /// Skills in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Skill)> {
        self.skills.iter()
    }

    /// Skill directories skipped during the last scan
    pub fn errors(&self) -> &[(PathBuf, String)] {
        &self.errors
    }

    /// Get number of skills
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Skills whose name or description contains any word of `query`,
    /// case-insensitively
    pub fn find_relevant(&self, query: &str) -> Vec<&Skill> {
        let keywords: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if keywords.is_empty() {
            return Vec::new();
        }

        self.skills
            .values()
            .filter(|skill| {
                let text = format!(
                    "{} {}",
                    skill.name().unwrap_or_default(),
                    skill.description().unwrap_or_default()
                )
                .to_lowercase();
                keywords.iter().any(|keyword| text.contains(keyword.as_str()))
            })
            .collect()
    }
}
