//! `.skill` archive packaging
//!
//! An archive is a zip container holding exactly one top-level directory
//! named after the packed skill directory:
//!
//! ```text
//! my-skill/SKILL.md
//! my-skill/scripts/run.sh
//! my-skill/references/guide.md
//! ```

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Result, SkillError};
use crate::skill::{base_name, Skill, SKILL_FILE};
use crate::validator::Validator;

/// File extension of packaged skills
pub const SKILL_EXTENSION: &str = "skill";

/// Default archive file name for a skill: `<name>.skill`
pub fn default_archive_name(skill_name: &str) -> PathBuf {
    PathBuf::from(format!("{skill_name}.{SKILL_EXTENSION}"))
}

/// Pack a skill directory into an archive and return the archive path
///
/// The skill is loaded and validated first; an invalid skill fails with
/// [`SkillError::Validation`] before anything is written. Without an explicit
/// destination the archive is `<name>.skill` in the current directory. An
/// existing file at the destination is replaced atomically.
pub fn pack(source_dir: impl AsRef<Path>, destination: Option<&Path>) -> Result<PathBuf> {
    let source_dir = source_dir.as_ref();

    if !source_dir.is_dir() {
        return Err(SkillError::NotFound(format!(
            "Skill path not found: {}",
            source_dir.display()
        )));
    }

    if !source_dir.join(SKILL_FILE).exists() {
        return Err(SkillError::NotFound(format!(
            "{SKILL_FILE} not found in {}",
            source_dir.display()
        )));
    }

    let skill = Validator::validate_strict(Skill::load(source_dir)?)?;
    let skill_name = skill.name().unwrap_or_default();

    let destination = destination.map_or_else(|| default_archive_name(skill_name), Path::to_path_buf);
    let root_name = base_name(source_dir).unwrap_or_else(|| skill_name.to_string());

    let files = collect_files(source_dir, &destination)?;
    write_archive(&destination, &root_name, &files)?;

    info!(
        "Packed {} files from {:?} into {:?}",
        files.len(),
        source_dir,
        destination
    );
    Ok(destination)
}

/// Regular files under `source_dir` paired with their archive entry names,
/// sorted by path
fn collect_files(source_dir: &Path, destination: &Path) -> Result<Vec<(PathBuf, String)>> {
    let destination = destination.canonicalize().ok();
    let mut files = Vec::new();

    for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        if destination.is_some() && entry.path().canonicalize().ok() == destination {
            debug!("Skipping archive destination {:?}", entry.path());
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|e| SkillError::Archive(e.to_string()))?;

        files.push((entry.path().to_path_buf(), entry_name(relative)));
    }

    Ok(files)
}

/// Relative path with `/` separators, as zip entries require
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn write_archive(destination: &Path, root_name: &str, files: &[(PathBuf, String)]) -> Result<()> {
    let parent = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = temp_archive(parent)?;

    {
        let mut writer = ZipWriter::new(tmp.as_file_mut());

        for (path, name) in files {
            let options = SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .unix_permissions(file_mode(path)?);

            debug!("Adding {}/{}", root_name, name);
            writer.start_file(format!("{root_name}/{name}"), options)?;

            let mut file = File::open(path)?;
            io::copy(&mut file, &mut writer)?;
        }

        writer.finish()?;
    }

    tmp.persist(destination).map_err(|e| SkillError::Io(e.error))?;
    Ok(())
}

/// Temp file next to the destination, created with the umask-governed mode
/// a plain `File::create` would get
fn temp_archive(parent: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".skillkit-").suffix(".tmp");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    builder.tempfile_in(parent)
}

#[cfg(unix)]
fn file_mode(path: &Path) -> Result<u32> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::metadata(path)?.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn file_mode(path: &Path) -> Result<u32> {
    let readonly = fs::metadata(path)?.permissions().readonly();
    Ok(if readonly { 0o444 } else { 0o644 })
}

/// Extract an archive into `destination` and return the skill directory
///
/// The result is the first top-level directory (in archive order) that has
/// a SKILL.md directly inside it, or `destination` itself when there is none.
/// Existing files are overwritten.
pub fn unpack(archive: impl AsRef<Path>, destination: impl AsRef<Path>) -> Result<PathBuf> {
    let archive = archive.as_ref();
    let destination = destination.as_ref();

    if !archive.exists() {
        return Err(SkillError::NotFound(format!(
            "Skill file not found: {}",
            archive.display()
        )));
    }

    fs::create_dir_all(destination)?;

    let mut zip = ZipArchive::new(File::open(archive)?)?;
    let mut skill_root: Option<PathBuf> = None;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;

        let Some(relative) = entry.enclosed_name() else {
            return Err(SkillError::Archive(format!(
                "unsafe entry path: {}",
                entry.name()
            )));
        };
        let target = destination.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        // a previous extraction may have left a read-only file here
        if fs::symlink_metadata(&target).is_ok_and(|meta| !meta.is_dir()) {
            fs::remove_file(&target)?;
        }

        debug!("Extracting {:?}", target);
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        drop(out);

        restore_mode(&target, entry.unix_mode())?;

        if skill_root.is_none() {
            skill_root = skill_root_of(&relative);
        }
    }

    let extracted = skill_root.map_or_else(|| destination.to_path_buf(), |root| destination.join(root));
    info!("Extracted {:?} to {:?}", archive, extracted);
    Ok(extracted)
}

#[cfg(unix)]
fn restore_mode(path: &Path, mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if let Some(mode) = mode {
        fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o777))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn restore_mode(_path: &Path, _mode: Option<u32>) -> Result<()> {
    Ok(())
}

/// `<dir>` when `relative` is exactly `<dir>/SKILL.md`
fn skill_root_of(relative: &Path) -> Option<PathBuf> {
    let mut components = relative.components();
    let Some(Component::Normal(root)) = components.next() else {
        return None;
    };
    let file = components.next()?;

    (components.next().is_none() && file.as_os_str() == SKILL_FILE).then(|| PathBuf::from(root))
}
