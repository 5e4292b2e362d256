use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use mktree::path::Path as OsPath;
use mktree::{INCLUDE_NAME, Project, Repository, Rule, Toolchain};

use crate::cli::Define;
use crate::runtime::Fs;

/// Sources of the project archive
pub const SRC_DIR: &str = "src";
/// Cloned repositories
pub const LIBS_DIR: &str = "libs";
/// Test sources, never archived
pub const TESTS_DIR: &str = "tests";

const FOLDERS: [&str; 4] = [SRC_DIR, LIBS_DIR, TESTS_DIR, INCLUDE_NAME];

/// Creates `root` with its four folders when it does not exist yet. If any
/// of them cannot be created, nothing is left behind.
pub fn scaffold(root: &Path) -> Result<()> {
    if root.exists() {
        return Ok(());
    }
    tracing::info!(root = %root.display(), "creating project folders");

    fs::create_dir_all(root).with_context(|| format!("Failed to create {}", root.display()))?;
    let created = FOLDERS.iter().try_for_each(|folder| {
        let dir = root.join(folder);
        fs::create_dir(&dir).with_context(|| format!("Failed to create {}", dir.display()))
    });
    if let Err(err) = created {
        if let Err(cleanup) = fs::remove_dir_all(root) {
            tracing::warn!(root = %root.display(), "failed to clean up: {cleanup}");
        }
        return Err(err);
    }
    Ok(())
}

/// Builds the repositories named by `-g`, in order, and hands them their
/// exported files and headers.
pub fn repositories(git: &[Define], export: &[Define], header: &[Define]) -> Result<Vec<Repository>> {
    let mut repositories: Vec<Repository> = Vec::with_capacity(git.len());
    for Define { key, value } in git {
        if repositories.iter().any(|r| r.project() == key) {
            tracing::warn!(project = %key, "repository given more than once, ignoring {value}");
            continue;
        }
        repositories.push(Repository::new(key, value));
    }

    for Define { key, value } in export {
        let path = OsPath::from(value.as_str());
        let dir = path.parent().unwrap_or_default();
        find(&mut repositories, key)?.add_output(path.file_name(), dir.into_string());
    }
    for Define { key, value } in header {
        find(&mut repositories, key)?.add_include_output(value);
    }

    Ok(repositories)
}

fn find<'a>(repositories: &'a mut [Repository], name: &str) -> Result<&'a mut Repository> {
    match repositories.iter_mut().find(|r| r.project() == name) {
        Some(repository) => Ok(repository),
        None => bail!("Unknown repository {name}, add it with -g {name}=<url>"),
    }
}

/// The src/libs/tests/include project rooted at `root`.
///
/// `src` is archived as `<archive>.a` which is then copied to the root,
/// `tests` is compiled but not archived and `libs` holds the repositories,
/// which `make clean` leaves alone.
pub fn project(
    root: &Path,
    archive: &str,
    toolchain: Toolchain,
    repositories: Vec<Repository>,
) -> Result<Project> {
    let mut project = Project::new(Fs, root.to_string_lossy())?.with_toolchain(toolchain);
    let archive_name = format!("{archive}.a");

    let mut libs = project.open_dir(LIBS_DIR)?;
    libs.set_auto_clean(false);
    for repository in repositories {
        repository.attach(&mut libs);
    }

    let mut src = project.open_dir(SRC_DIR)?;
    src.set_archive_name(archive_name.as_str());
    src.populate_full(project.runtime())?;

    let mut tests = project.open_dir(TESTS_DIR)?;
    tests.set_make_archive(false);
    tests.populate_full(project.runtime())?;

    let root = project.root_mut();
    root.add_subdir(libs)?;
    root.add_subdir(src)?;
    root.add_subdir(tests)?;

    let source = OsPath::from(SRC_DIR).join(&archive_name);
    root.add_rule(Rule::copy_file(archive_name, source, [SRC_DIR]));

    Ok(project)
}
