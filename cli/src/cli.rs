use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mktree::Toolchain;

#[derive(Parser, Debug)]
#[command(name = "mktree")]
#[command(about = "Generates a tree of Makefiles for a C/C++ project")]
#[command(version)]
pub struct Args {
    /// Log what is discovered and written
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub toolchain: ToolchainArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate Makefiles for a directory and all of its subdirectories
    Tree {
        /// Project root, created if it does not exist
        dir: PathBuf,

        /// Also link an executable from the objects of the whole tree
        #[arg(long, value_name = "name")]
        binary: Option<String>,
    },

    /// Generate Makefiles for a project laid out in src, libs, tests and include
    Project {
        /// Project root, created with its folders if it does not exist
        dir: PathBuf,

        /// Name of the archive built from src, without extension
        archive: String,

        /// Git repository to clone into libs (can be used multiple times)
        #[arg(short = 'g', long = "git", value_name = "name=url")]
        git: Vec<Define>,

        /// File to copy out of a repository once it is built, given by its
        /// path inside the repository
        #[arg(long, value_name = "name=path")]
        export: Vec<Define>,

        /// Header to copy from a repository's include folder into include
        #[arg(long, value_name = "name=file")]
        header: Vec<Define>,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct ToolchainArgs {
    /// C compiler [default: $CC, then gcc]
    #[arg(long, global = true, value_name = "cmd")]
    pub cc: Option<String>,

    /// C++ compiler [default: $CXX, then g++]
    #[arg(long, global = true, value_name = "cmd")]
    pub cxx: Option<String>,

    /// Archiver [default: ar]
    #[arg(long, global = true, value_name = "cmd")]
    pub ar: Option<String>,

    /// Preprocessor flags other than includes [default: -g -Wall -Wextra -Werror]
    #[arg(long, global = true, value_name = "flags", allow_hyphen_values = true)]
    pub cppflags: Option<String>,
}

impl ToolchainArgs {
    pub fn resolve(&self) -> Toolchain {
        let mut toolchain = Toolchain::default();
        if let Some(cc) = self.cc.clone().or_else(|| env::var("CC").ok()) {
            toolchain = toolchain.cc(cc);
        }
        if let Some(cxx) = self.cxx.clone().or_else(|| env::var("CXX").ok()) {
            toolchain = toolchain.cxx(cxx);
        }
        if let Some(ar) = &self.ar {
            toolchain = toolchain.ar(ar);
        }
        if let Some(cppflags) = &self.cppflags {
            toolchain = toolchain.cppflags(cppflags);
        }
        toolchain
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Define {
    pub key: String,
    pub value: String,
}

impl FromStr for Define {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s.split_once("=").context("Expected name=value")?;
        Ok(Define {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

pub fn parse() -> Args {
    Args::parse()
}
