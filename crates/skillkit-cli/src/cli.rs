//! Command-line interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SkillKit - create, validate and package agent skills
#[derive(Parser, Debug)]
#[command(name = "skillkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (replaces the global and local config files)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new skill
    New {
        /// Skill name
        name: String,

        /// Skill description
        #[arg(short, long)]
        description: String,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Include scripts directory
        #[arg(long)]
        scripts: bool,

        /// Include references directory
        #[arg(long)]
        references: bool,

        /// Include assets directory
        #[arg(long)]
        assets: bool,
    },

    /// Validate a skill against the format rules
    Validate {
        /// Skill directory
        path: PathBuf,
    },

    /// List discovered skills
    List {
        /// Paths to search (defaults to the configured discovery paths)
        #[arg(short, long, num_args = 1..)]
        path: Vec<PathBuf>,
    },

    /// Show detailed skill information
    Info {
        /// Skill directory
        path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Package a skill into a .skill file
    Pack {
        /// Skill directory
        path: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract a .skill file
    Unpack {
        /// Archive to extract
        file: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Show version
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_new() {
        let cli = Cli::try_parse_from([
            "skillkit", "new", "my-skill", "-d", "A test skill", "--scripts",
        ])
        .unwrap();

        match cli.command {
            Commands::New {
                name,
                description,
                path,
                scripts,
                references,
                assets,
            } => {
                assert_eq!(name, "my-skill");
                assert_eq!(description, "A test skill");
                assert_eq!(path, PathBuf::from("."));
                assert!(scripts);
                assert!(!references);
                assert!(!assets);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_new_requires_description() {
        assert!(Cli::try_parse_from(["skillkit", "new", "my-skill"]).is_err());
    }

    #[test]
    fn test_parse_list_paths() {
        let cli = Cli::try_parse_from(["skillkit", "list", "-p", "a", "b"]).unwrap();
        match cli.command {
            Commands::List { path } => {
                assert_eq!(path, vec![PathBuf::from("a"), PathBuf::from("b")]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "skillkit", "pack", "my-skill", "-o", "out.skill", "--verbose", "--config", "x.toml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(
            cli.command,
            Commands::Pack { output: Some(_), .. }
        ));
    }
}
