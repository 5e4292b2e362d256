//! End-to-end runs of the mktree binary on temporary directories.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn mktree() -> Command {
    let mut cmd = cargo_bin_cmd!("mktree");
    cmd.env_remove("CC").env_remove("CXX").env_remove("RUST_LOG");
    cmd
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path.as_ref()).unwrap_or_else(|e| panic!("{}: {e}", path.as_ref().display()))
}

fn touch(path: impl AsRef<Path>) {
    let path = path.as_ref();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

#[test]
fn help_lists_subcommands() {
    mktree()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tree").and(predicate::str::contains("project")));
}

#[test]
fn tree_writes_one_makefile_per_directory() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    touch(root.join("a.c"));
    touch(root.join("b.c"));
    touch(root.join("util").join("x.cpp"));
    touch(root.join("include").join("x.h"));

    mktree().arg("tree").arg(root).assert().success();

    let common = read(root.join("common.mk"));
    assert!(common.contains("CC=gcc\n"));
    assert!(common.contains("%.o: %.cxx\n"));

    let makefile = read(root.join("Makefile"));
    assert!(makefile.starts_with(".PHONY: util\ninclude common.mk\nINCLUDE=-Iinclude\n"));
    assert!(makefile.contains("\nOBJS=a.o b.o\n"));
    assert!(makefile.contains("\nutil:\n\t$(MAKE) -C util\n"));

    let util = read(root.join("util").join("Makefile"));
    assert!(util.contains("include ../common.mk\nINCLUDE=-I../include\n"));
    assert!(util.contains("\nutil.a: x.o\n"));
    assert!(!root.join("include").join("Makefile").exists());
}

#[test]
fn tree_links_binary_with_archives() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    touch(root.join("main.c"));
    touch(root.join("lib").join("l.c"));

    mktree()
        .args(["tree", "--binary", "app", "--cc", "clang"])
        .arg(root)
        .assert()
        .success();

    let makefile = read(root.join("Makefile"));
    assert!(makefile.contains("\napp: main.o lib/lib.a\n\t$(CC) $(CPPFLAGS) -o $@ $^\n"));
    assert!(makefile.contains("\nTARGETS=app\n"));
    assert!(read(root.join("common.mk")).contains("CC=clang\n"));
}

#[test]
fn tree_creates_missing_root() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("new");

    mktree().arg("tree").arg(&root).assert().success();

    assert!(root.join("Makefile").is_file());
    assert!(root.join("common.mk").is_file());
}

#[test]
fn project_scaffolds_layout() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("proj");

    mktree().arg("project").arg(&root).arg("mylib").assert().success();

    for folder in ["src", "libs", "tests", "include"] {
        assert!(root.join(folder).is_dir(), "missing {folder}");
    }
    let makefile = read(root.join("Makefile"));
    assert!(makefile.contains("\nSUBDIRS=libs src tests\n"));
    assert!(makefile.contains("\nmylib.a: src\n\t$(CP) src/mylib.a mylib.a\n"));
    assert!(makefile.contains("\t$(MAKE) -C src clean\n"));
    assert!(!makefile.contains("-C libs clean"));

    assert!(read(root.join("src").join("Makefile")).contains("\nTARGETS=mylib.a\n"));
    assert!(read(root.join("tests").join("Makefile")).contains("\nTARGETS=\n"));
}

#[test]
fn project_attaches_repositories_to_libs() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("proj");

    mktree()
        .arg("project")
        .arg(&root)
        .arg("mylib")
        .args(["-g", "CommonC=https://example.com/CommonC.git"])
        .args(["--export", "CommonC=commonc.a", "--header", "CommonC=logger.h"])
        .assert()
        .success();

    let libs = read(root.join("libs").join("Makefile"));
    assert!(libs.contains("\nGIT_CMD=git clone\n"));
    assert!(libs.contains("\nCommonC:\n\t$(GIT_CMD) https://example.com/CommonC.git CommonC\n"));
    assert!(libs.contains("\ncommonc.a: CommonC\n\t$(MAKE) -C CommonC\n\t$(CP) CommonC/commonc.a commonc.a\n"));
    assert!(libs.contains("\n../include/logger.h: CommonC\n\t$(CP) CommonC/include/logger.h ../include/logger.h\n"));
}

#[test]
fn project_without_src_fails() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("libs")).unwrap();
    fs::create_dir(temp.path().join("tests")).unwrap();

    mktree()
        .arg("project")
        .arg(temp.path())
        .arg("mylib")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));

    assert!(!temp.path().join("Makefile").exists());
}

#[test]
fn export_for_unknown_repository_fails() {
    let temp = TempDir::new().unwrap();

    mktree()
        .arg("project")
        .arg(temp.path().join("proj"))
        .arg("mylib")
        .args(["--export", "Missing=lib.a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown repository Missing"));

    assert!(!temp.path().join("proj").exists());
}
