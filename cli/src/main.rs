use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use mktree::path::Path as OsPath;
use mktree::{Project, Toolchain};
use tracing_subscriber::EnvFilter;

mod cli;
mod layout;
mod runtime;

use cli::Command;
use runtime::Fs;

fn main() -> Result<()> {
    let args = cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let toolchain = args.toolchain.resolve();
    check_toolchain(&toolchain);

    match args.command {
        Command::Tree { dir, binary } => tree(&dir, binary, toolchain),
        Command::Project {
            dir,
            archive,
            git,
            export,
            header,
        } => {
            let repositories = layout::repositories(&git, &export, &header)?;
            layout::scaffold(&dir)?;
            layout::project(&dir, &archive, toolchain, repositories)?.generate()
        }
    }
}

fn tree(dir: &Path, binary: Option<String>, toolchain: Toolchain) -> Result<()> {
    if !dir.exists() {
        tracing::info!(dir = %dir.display(), "creating project root");
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let mut project = Project::new(Fs, dir.to_string_lossy())?.with_toolchain(toolchain);
    if binary.is_some() {
        // the binary links the objects directly
        project.root_mut().set_make_archive(false);
    }
    let archives = project.populate_full()?;

    if let Some(name) = binary {
        project
            .root_mut()
            .add_binary(name, archives.into_iter().map(OsPath::into_string));
    }

    project.generate()
}

/// Warns about configured programs that are not on the PATH. The Makefiles
/// are still written, they may be used on another machine.
fn check_toolchain(toolchain: &Toolchain) {
    for command in [&toolchain.cc, &toolchain.cxx, &toolchain.ar] {
        let Some(program) = command.split_whitespace().next() else {
            continue;
        };
        if which::which(program).is_err() {
            tracing::warn!(program, "not found on PATH");
        }
    }
}
