//! Skill validation against the Agent Skills format rules

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Result, SkillError};
use crate::skill::{base_name, Skill};

/// Maximum allowed name length
pub const MAX_NAME_LENGTH: usize = 64;
/// Maximum allowed description length
pub const MAX_DESCRIPTION_LENGTH: usize = 1024;
/// Maximum allowed compatibility length
pub const MAX_COMPATIBILITY_LENGTH: usize = 500;

#[allow(clippy::expect_used)]
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A[a-z0-9]+(-[a-z0-9]+)*\z").expect("name pattern is a valid regex")
});

/// Outcome of one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<String>,
}

impl ValidationReport {
    /// Violations in check order
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// True when no rule was violated
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Take the violations
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

/// Stateless rule checker
///
/// Every call evaluates all rule groups from scratch; nothing is cached
/// between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// Run every check and collect the violations
    pub fn validate(skill: &Skill) -> ValidationReport {
        let mut errors = Vec::new();

        validate_name(skill, &mut errors);
        validate_description(skill, &mut errors);
        validate_compatibility(skill, &mut errors);
        validate_directory_match(skill, &mut errors);

        ValidationReport { errors }
    }

    /// Return the skill unchanged if valid, otherwise fail with every violation
    pub fn validate_strict(skill: Skill) -> Result<Skill> {
        let report = Self::validate(&skill);
        if report.is_valid() {
            Ok(skill)
        } else {
            Err(SkillError::Validation(report.into_errors()))
        }
    }
}

fn validate_name(skill: &Skill, errors: &mut Vec<String>) {
    let name = skill.name().unwrap_or_default();

    if name.is_empty() {
        errors.push("name is required".to_string());
        return;
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        errors.push(format!("name must be {MAX_NAME_LENGTH} characters or less"));
    }

    if !NAME_RE.is_match(name) {
        errors.push("name must contain only lowercase letters, numbers, and hyphens".to_string());
    }

    if name.starts_with('-') || name.ends_with('-') {
        errors.push("name cannot start or end with a hyphen".to_string());
    }

    if name.contains("--") {
        errors.push("name cannot contain consecutive hyphens".to_string());
    }
}

fn validate_description(skill: &Skill, errors: &mut Vec<String>) {
    let description = skill.description().unwrap_or_default();

    if description.is_empty() {
        errors.push("description is required".to_string());
        return;
    }

    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        errors.push(format!(
            "description must be {MAX_DESCRIPTION_LENGTH} characters or less"
        ));
    }
}

fn validate_compatibility(skill: &Skill, errors: &mut Vec<String>) {
    let Some(compatibility) = skill.compatibility() else {
        return;
    };

    if compatibility.chars().count() > MAX_COMPATIBILITY_LENGTH {
        errors.push(format!(
            "compatibility must be {MAX_COMPATIBILITY_LENGTH} characters or less"
        ));
    }
}

fn validate_directory_match(skill: &Skill, errors: &mut Vec<String>) {
    let Some(location) = skill.location() else {
        return;
    };

    let dir_name = base_name(location).unwrap_or_else(|| location.display().to_string());
    let name = skill.name().unwrap_or_default();

    if dir_name != name {
        errors.push(format!(
            "name '{name}' must match directory name '{dir_name}'"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill_named(name: &str) -> Skill {
        Skill::builder().name(name).description("A test skill").build()
    }

    fn errors_for(skill: &Skill) -> Vec<String> {
        Validator::validate(skill).into_errors()
    }

    #[test]
    fn test_valid_names() {
        for name in ["my-skill", "a", "skill123", "pdf-2-text"] {
            let report = Validator::validate(&skill_named(name));
            assert!(report.is_valid(), "{name}: {:?}", report.errors());
        }
    }

    #[test]
    fn test_name_required() {
        let skill = Skill::builder().description("A test skill").build();
        assert_eq!(errors_for(&skill), vec!["name is required"]);

        let empty = skill_named("");
        assert_eq!(errors_for(&empty), vec!["name is required"]);
    }

    #[test]
    fn test_leading_hyphen() {
        assert_eq!(
            errors_for(&skill_named("-bad")),
            vec![
                "name must contain only lowercase letters, numbers, and hyphens",
                "name cannot start or end with a hyphen",
            ]
        );
    }

    #[test]
    fn test_trailing_hyphen() {
        assert_eq!(
            errors_for(&skill_named("bad-")),
            vec![
                "name must contain only lowercase letters, numbers, and hyphens",
                "name cannot start or end with a hyphen",
            ]
        );
    }

    #[test]
    fn test_consecutive_hyphens() {
        assert_eq!(
            errors_for(&skill_named("bad--name")),
            vec![
                "name must contain only lowercase letters, numbers, and hyphens",
                "name cannot contain consecutive hyphens",
            ]
        );
    }

    #[test]
    fn test_uppercase_and_underscore() {
        assert_eq!(
            errors_for(&skill_named("Bad_Name")),
            vec!["name must contain only lowercase letters, numbers, and hyphens"]
        );
    }

    #[test]
    fn test_multiple_defects_reported_independently() {
        assert_eq!(
            errors_for(&skill_named("-bad--")),
            vec![
                "name must contain only lowercase letters, numbers, and hyphens",
                "name cannot start or end with a hyphen",
                "name cannot contain consecutive hyphens",
            ]
        );
    }

    #[test]
    fn test_name_length_boundary() {
        assert!(Validator::validate(&skill_named(&"a".repeat(64))).is_valid());
        assert_eq!(
            errors_for(&skill_named(&"a".repeat(65))),
            vec!["name must be 64 characters or less"]
        );
    }

    #[test]
    fn test_description_required() {
        let skill = Skill::builder().name("my-skill").build();
        assert_eq!(errors_for(&skill), vec!["description is required"]);
    }

    #[test]
    fn test_description_length_boundary() {
        let ok = Skill::builder().name("my-skill").description("x".repeat(1024)).build();
        assert!(Validator::validate(&ok).is_valid());

        let long = Skill::builder().name("my-skill").description("x".repeat(1025)).build();
        assert_eq!(
            errors_for(&long),
            vec!["description must be 1024 characters or less"]
        );
    }

    #[test]
    fn test_description_length_counts_characters() {
        let skill = Skill::builder().name("my-skill").description("é".repeat(1024)).build();
        assert!(Validator::validate(&skill).is_valid());
    }

    #[test]
    fn test_compatibility_length_boundary() {
        let ok = Skill::builder()
            .name("my-skill")
            .description("d")
            .compatibility("c".repeat(500))
            .build();
        assert!(Validator::validate(&ok).is_valid());

        let long = Skill::builder()
            .name("my-skill")
            .description("d")
            .compatibility("c".repeat(501))
            .build();
        assert_eq!(
            errors_for(&long),
            vec!["compatibility must be 500 characters or less"]
        );
    }

    #[test]
    fn test_directory_mismatch() {
        let skill = Skill::builder()
            .name("my-skill")
            .description("A test skill")
            .location("/tmp/skills/wrong-name")
            .build();
        let errors = errors_for(&skill);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("my-skill"));
        assert!(errors[0].contains("wrong-name"));
    }

    #[test]
    fn test_directory_match() {
        let skill = Skill::builder()
            .name("my-skill")
            .description("A test skill")
            .location("/tmp/skills/my-skill")
            .build();
        assert!(Validator::validate(&skill).is_valid());
    }

    #[test]
    fn test_all_groups_run() {
        let skill = Skill::builder()
            .compatibility("c".repeat(501))
            .location("/tmp/skills/some-dir")
            .build();
        assert_eq!(
            errors_for(&skill),
            vec![
                "name is required",
                "description is required",
                "compatibility must be 500 characters or less",
                "name '' must match directory name 'some-dir'",
            ]
        );
    }

    #[test]
    fn test_name_pattern_compiles() {
        assert!(NAME_RE.is_match("my-skill"));
        assert!(!NAME_RE.is_match("my--skill"));
    }

    #[test]
    fn test_validate_is_idempotent() {
        let skill = skill_named("-bad--");
        assert_eq!(Validator::validate(&skill), Validator::validate(&skill));
    }

    #[test]
    fn test_validate_strict() {
        let skill = skill_named("my-skill");
        assert_eq!(Validator::validate_strict(skill.clone()).unwrap(), skill);

        let err = Validator::validate_strict(Skill::builder().name("x").build()).unwrap_err();
        assert!(matches!(err, SkillError::Validation(_)));
        assert_eq!(err.to_string(), "description is required");

        let err = Validator::validate_strict(Skill::default()).unwrap_err();
        assert_eq!(err.to_string(), "name is required, description is required");
    }
}
