//! Command handlers: call into the core and print the outcome

use anyhow::Result;
use skillkit_core::generator::is_skill_dir;
use skillkit_core::{
    GenerateOptions, Generator, Skill, SkillsRegistry, ValidationReport, Validator,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::warn;

use crate::cli::Commands;
use crate::settings::Settings;

const LIST_DESCRIPTION_WIDTH: usize = 60;

/// Run one subcommand
pub fn execute(command: Commands, settings: &Settings) -> Result<ExitCode> {
    match command {
        Commands::New {
            name,
            description,
            path,
            scripts,
            references,
            assets,
        } => new_skill(GenerateOptions {
            path,
            name,
            description,
            with_scripts: scripts,
            with_references: references,
            with_assets: assets,
        }),
        Commands::Validate { path } => validate(&path),
        Commands::List { path } => {
            let paths = if path.is_empty() {
                settings.discovery.paths.clone()
            } else {
                path
            };
            list(&paths)
        }
        Commands::Info { path, json } => info(&path, json),
        Commands::Pack { path, output } => {
            let output = skillkit_core::pack(&path, output.as_deref())?;
            println!("Created {}", output.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Unpack { file, output } => {
            let extracted = skillkit_core::unpack(&file, &output)?;
            println!("Extracted to {}", extracted.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Version => {
            println!("skillkit {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn new_skill(options: GenerateOptions) -> Result<ExitCode> {
    if is_skill_dir(&options.path.join(&options.name)) {
        warn!("Overwriting existing skill at {:?}", options.path.join(&options.name));
    }

    let path = Generator::create(&options)?;

    println!("Created skill at {}/", path.display());
    println!("  SKILL.md");
    if options.with_scripts {
        println!("  scripts/");
    }
    if options.with_references {
        println!("  references/");
    }
    if options.with_assets {
        println!("  assets/");
    }

    Ok(ExitCode::SUCCESS)
}

fn validate(path: &Path) -> Result<ExitCode> {
    let skill = Skill::load(path)?;
    let report = Validator::validate(&skill);
    let name = display_name(&skill);

    if report.is_valid() {
        println!("{name} is valid");
        return Ok(ExitCode::SUCCESS);
    }

    println!("{name} has errors:");
    for error in report.errors() {
        println!("  - {error}");
    }
    Ok(ExitCode::FAILURE)
}

fn list(paths: &[PathBuf]) -> Result<ExitCode> {
    let mut registry = SkillsRegistry::new().with_directories(paths.iter().cloned());
    registry.discover();

    if registry.is_empty() {
        let searched: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        println!("No skills found in: {}", searched.join(", "));
        return Ok(ExitCode::SUCCESS);
    }

    println!("Found {} skill(s):\n", registry.len());

    for (name, skill) in registry.iter() {
        println!("{name}");
        println!(
            "  {}",
            truncate(skill.description().unwrap_or_default(), LIST_DESCRIPTION_WIDTH)
        );
        if let Some(location) = skill.location() {
            println!("  Path: {}", location.display());
        }
        println!();
    }

    Ok(ExitCode::SUCCESS)
}

fn info(path: &Path, json: bool) -> Result<ExitCode> {
    let skill = Skill::load(path)?;
    let report = Validator::validate(&skill);

    if json {
        println!("{}", to_json(&skill, &report)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("Name:        {}", display_name(&skill));
    println!("Description: {}", skill.description().unwrap_or_default());
    println!(
        "Path:        {}",
        skill
            .location()
            .map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
    );

    if let Some(license) = skill.license() {
        println!("License:     {license}");
    }
    if let Some(compatibility) = skill.compatibility() {
        println!("Compat:      {compatibility}");
    }
    if !skill.allowed_tools().is_empty() {
        println!("Tools:       {}", skill.allowed_tools().join(" "));
    }

    let listings = [
        ("Scripts:     ", skill.scripts()),
        ("References:  ", skill.references()),
        ("Assets:      ", skill.assets()),
    ];
    for (label, files) in listings {
        if !files.is_empty() {
            println!("{label}{}", file_names(&files));
        }
    }

    if report.is_valid() {
        println!("Valid:       Yes");
    } else {
        println!("Valid:       No ({})", report.errors().join(", "));
    }

    Ok(ExitCode::SUCCESS)
}

/// `to_mapping()` plus location and validation status
fn to_json(skill: &Skill, report: &ValidationReport) -> Result<String> {
    let mut map = skill.to_mapping();
    if let Some(location) = skill.location() {
        map.insert("path".into(), location.display().to_string().into());
    }
    map.insert("valid".into(), report.is_valid().into());
    map.insert("errors".into(), report.errors().to_vec().into());

    Ok(serde_json::to_string_pretty(&map)?)
}

fn display_name(skill: &Skill) -> &str {
    skill.name().unwrap_or("(unnamed)")
}

fn file_names(files: &[PathBuf]) -> String {
    files
        .iter()
        .filter_map(|f| f.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Shorten to `length` characters, ending in `...` when cut
fn truncate(text: &str, length: usize) -> String {
    if text.chars().count() <= length {
        return text.to_string();
    }

    let kept: String = text.chars().take(length.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn settings_for(paths: Vec<PathBuf>) -> Settings {
        let mut settings = Settings::default();
        settings.discovery.paths = paths;
        settings
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 60), "short");
        assert_eq!(truncate(&"x".repeat(60), 60), "x".repeat(60));

        let cut = truncate(&"x".repeat(61), 60);
        assert_eq!(cut.chars().count(), 60);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_new_validate_pack_unpack() {
        let tmp = tempdir().unwrap();
        let settings = settings_for(vec![tmp.path().to_path_buf()]);

        let code = execute(
            Commands::New {
                name: "my-skill".to_string(),
                description: "A test skill".to_string(),
                path: tmp.path().to_path_buf(),
                scripts: true,
                references: false,
                assets: false,
            },
            &settings,
        )
        .unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let skill_dir = tmp.path().join("my-skill");
        let code = execute(Commands::Validate { path: skill_dir.clone() }, &settings).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let archive = tmp.path().join("my-skill.skill");
        execute(
            Commands::Pack {
                path: skill_dir.clone(),
                output: Some(archive.clone()),
            },
            &settings,
        )
        .unwrap();
        assert!(archive.exists());

        let out = tmp.path().join("out");
        execute(
            Commands::Unpack {
                file: archive,
                output: out.clone(),
            },
            &settings,
        )
        .unwrap();
        assert!(out.join("my-skill").join("SKILL.md").exists());

        assert_eq!(
            execute(Commands::List { path: Vec::new() }, &settings).unwrap(),
            ExitCode::SUCCESS
        );
        assert_eq!(
            execute(Commands::Info { path: skill_dir, json: true }, &settings).unwrap(),
            ExitCode::SUCCESS
        );
    }

    #[test]
    fn test_validate_reports_failure_code() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("wrong-name");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("SKILL.md"), "---\nname: my-skill\ndescription: d\n---\n").unwrap();

        let code = execute(Commands::Validate { path: dir }, &Settings::default()).unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn test_core_errors_propagate() {
        let tmp = tempdir().unwrap();
        let settings = Settings::default();

        assert!(execute(
            Commands::Validate {
                path: tmp.path().join("missing")
            },
            &settings
        )
        .is_err());
        assert!(execute(
            Commands::Unpack {
                file: tmp.path().join("missing.skill"),
                output: tmp.path().join("out"),
            },
            &settings
        )
        .is_err());
    }
}
