use alloc::borrow::ToOwned as _;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use anyhow::bail;
use hashbrown::HashMap;

use crate::error::Error;
use crate::path::Path;
use crate::project::{COMMON_NAME, INCLUDE_NAME, MAKEFILE_NAME, Project};
use crate::rule::{MAKE_SWITCH_FLAG, Rule};
use crate::runtime::{DirEntry, Result, Runtime};
use crate::source::{ARCHIVE_EXT, Language, Source};
use crate::toolchain::{
    CPPFLAGS_VAR, INCLUDE_VAR, MAKE_VAR, RM_FLAGS_VAR, RM_VAR, STATIC_CPPFLAGS_VAR,
};
use crate::writer::{MakeWriter, list, use_var};

pub const SUBDIRS_VAR: &str = "SUBDIRS";
pub const OBJECTS_VAR: &str = "OBJS";
/// Targets that will be used outside of the directory
pub const TARGETS_VAR: &str = "TARGETS";

pub const MAKE_ALL_RULE: &str = "all";
pub const MAKE_CLEAN_RULE: &str = "clean";
/// Keeps make from mistaking the subdirectory rules for files
pub const PHONY_DECL: &str = ".PHONY";
pub const INCLUDE_CMD: &str = "include";
/// Preprocessor flag in front of a directory to include
pub const INCLUDE_FLAG: &str = "-I";

const NO_DEPENDENCIES: [&str; 0] = [];

/// Makefile data for one directory of the project.
///
/// Population fills in the objects to compile from the sources found on
/// disk, an archive rule over them, and recursively the subdirectories.
/// Generation then writes one Makefile per directory.
#[derive(Debug, Clone)]
pub struct Directory {
    path: Path,
    objects: Vec<String>,
    /// Do all the classified sources compile with the C compiler?
    all_c: bool,
    rules: Vec<Rule>,
    children: Vec<Directory>,
    assignments: Vec<(String, String)>,
    assignment_index: HashMap<String, usize>,
    /// Archive named after the directory unless set
    custom_archive_name: Option<String>,
    make_archive: bool,
    /// Should the parent's `clean` rule recurse into this directory?
    auto_clean: bool,
    populated: bool,
}

impl Directory {
    /// Opens `path`, which must be an existing directory, and records its
    /// canonical location.
    pub fn open(runtime: &dyn Runtime, path: &Path) -> Result<Self> {
        if !runtime.is_dir(path)? {
            bail!(Error::NotADirectory { path: path.clone() });
        }
        let path = runtime.canonicalize(path)?;

        Ok(Self {
            path,
            objects: Vec::new(),
            all_c: true,
            rules: Vec::new(),
            children: Vec::new(),
            assignments: Vec::new(),
            assignment_index: HashMap::new(),
            custom_archive_name: None,
            make_archive: true,
            auto_clean: true,
            populated: false,
        })
    }

    /// Opens the subdirectory `name` without adding it.
    pub fn open_child(&self, runtime: &dyn Runtime, name: &str) -> Result<Self> {
        Self::open(runtime, &self.path.join(name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.path.file_name()
    }

    pub fn objects(&self) -> &[String] {
        &self.objects
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn children(&self) -> &[Directory] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&Directory> {
        self.children.iter().find(|c| c.name() == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Directory> {
        self.children.iter_mut().find(|c| c.name() == name)
    }

    pub fn assignments(&self) -> &[(String, String)] {
        &self.assignments
    }

    pub fn is_all_c(&self) -> bool {
        self.all_c
    }

    pub fn make_archive(&self) -> bool {
        self.make_archive
    }

    pub fn auto_clean(&self) -> bool {
        self.auto_clean
    }

    pub fn set_archive_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.custom_archive_name = Some(name.into());
        self
    }

    pub fn set_make_archive(&mut self, make_archive: bool) -> &mut Self {
        self.make_archive = make_archive;
        self
    }

    pub fn set_auto_clean(&mut self, auto_clean: bool) -> &mut Self {
        self.auto_clean = auto_clean;
        self
    }

    pub fn archive_name(&self) -> String {
        match &self.custom_archive_name {
            Some(name) => name.clone(),
            None => format!("{}.{ARCHIVE_EXT}", self.name()),
        }
    }

    pub fn add_object(&mut self, object: impl Into<String>) {
        self.objects.push(object.into());
    }

    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Extra `name=value` line. Assigning a name again replaces its value
    /// but keeps its position.
    pub fn assign(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.assignment_index.get(&name) {
            Some(&i) => self.assignments[i].1 = value,
            None => {
                self.assignment_index.insert(name.clone(), self.assignments.len());
                self.assignments.push((name, value));
            }
        }
    }

    /// Adds a subdirectory, which must be directly inside this one.
    pub fn add_subdir(&mut self, subdir: Directory) -> Result<&mut Directory> {
        if subdir.path.parent().as_ref() != Some(&self.path) {
            bail!(Error::NotDescendant {
                path: subdir.path,
                root: self.path.clone(),
            });
        }
        if self.child(subdir.name()).is_some() {
            bail!(Error::DuplicateSubdir {
                name: subdir.name().to_owned(),
            });
        }
        let i = self.children.len();
        self.children.push(subdir);
        Ok(&mut self.children[i])
    }

    /// Links this directory's objects and `extra` (usually archive paths
    /// returned by population) into the executable `name`.
    pub fn add_binary<I, S>(&mut self, name: impl Into<String>, extra: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dependencies = self.objects.clone();
        dependencies.extend(extra.into_iter().map(Into::into));
        let rule = Rule::binary(name, dependencies, self.all_c);
        self.add_rule(rule);
    }

    /// Populates with the named subdirectories, recursively with all of
    /// theirs, and with the sources directly inside this directory.
    ///
    /// Every name is checked before any subdirectory is added. Returns the
    /// archives that will be built, relative to this directory.
    pub fn populate(&mut self, runtime: &dyn Runtime, subdir_names: &[&str]) -> Result<Vec<Path>> {
        let mut subdirs: Vec<Directory> = Vec::with_capacity(subdir_names.len());
        for name in subdir_names {
            let subdir = self.open_child(runtime, name)?;
            if subdir.path.parent().as_ref() != Some(&self.path) {
                bail!(Error::NotDescendant {
                    path: subdir.path,
                    root: self.path.clone(),
                });
            }
            if self.child(subdir.name()).is_some() || subdirs.iter().any(|s| s.name() == subdir.name()) {
                bail!(Error::DuplicateSubdir {
                    name: subdir.name().to_owned(),
                });
            }
            subdirs.push(subdir);
        }
        for subdir in subdirs {
            self.add_subdir(subdir)?;
        }

        self.populate_added(runtime, None)?;
        Ok(self.archives())
    }

    /// Populates like [`Directory::populate`] with every subdirectory on
    /// disk, except for any include folder.
    pub fn populate_full(&mut self, runtime: &dyn Runtime) -> Result<Vec<Path>> {
        let entries = self.read_entries(runtime)?;
        for entry in &entries {
            if !entry.is_dir || entry.name == INCLUDE_NAME || self.child(&entry.name).is_some() {
                continue;
            }
            let subdir = self.open_child(runtime, &entry.name)?;
            tracing::debug!(path = %subdir.path, "discovered");
            self.add_subdir(subdir)?;
        }

        self.populate_added(runtime, Some(entries))?;
        Ok(self.archives())
    }

    /// Archives built in this directory and below it once populated,
    /// relative to this directory. Subdirectories come first, in the order
    /// they were added.
    pub fn archives(&self) -> Vec<Path> {
        let mut archives = Vec::new();
        for subdir in &self.children {
            let prefix = Path::from(subdir.name());
            archives.extend(subdir.archives().into_iter().map(|a| prefix.join(a)));
        }
        if self.populated && self.make_archive {
            archives.push(Path::from(self.archive_name()));
        }
        archives
    }

    fn read_entries(&self, runtime: &dyn Runtime) -> Result<Vec<DirEntry>> {
        let mut entries = runtime.read_dir(&self.path)?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Recursively populates the subdirectories that were not populated yet,
    /// then this directory's own objects and archive, once.
    fn populate_added(
        &mut self,
        runtime: &dyn Runtime,
        entries: Option<Vec<DirEntry>>,
    ) -> Result<()> {
        for subdir in self.children.iter_mut().filter(|s| !s.populated) {
            subdir.populate_full(runtime)?;
        }

        if self.populated {
            return Ok(());
        }
        self.populated = true;

        let entries = match entries {
            Some(entries) => entries,
            None => self.read_entries(runtime)?,
        };
        for entry in entries.iter().filter(|e| !e.is_dir) {
            let Some(source) = Source::classify(&entry.name) else {
                continue;
            };
            tracing::trace!(dir = %self.path, source = %source.name, "classified");
            self.all_c &= source.language == Language::C;
            self.add_object(source.object_name());
        }

        if self.make_archive {
            let archive_name = self.archive_name();
            let archive = Rule::archive(archive_name.as_str(), self.objects.iter().cloned());
            self.add_rule(archive);
        }

        Ok(())
    }

    /// Makefile contents, given the relative path up to the project root
    /// (empty or ending with a separator).
    pub fn render(&self, to_root: &str, has_include: bool) -> MakeWriter {
        let mut output = MakeWriter::new();
        let subdir_names = self.children.iter().map(Directory::name);

        output.rule_header(PHONY_DECL, subdir_names.clone());

        let common_path = format!("{to_root}{COMMON_NAME}");
        output.line(list([INCLUDE_CMD, common_path.as_str()]));

        if has_include {
            output.assign(INCLUDE_VAR, format!("{INCLUDE_FLAG}{to_root}{INCLUDE_NAME}"));
        }
        output.assign(
            CPPFLAGS_VAR,
            list([use_var(STATIC_CPPFLAGS_VAR), use_var(INCLUDE_VAR)]),
        );

        for (name, value) in &self.assignments {
            output.assign(name, value);
        }

        output.assign(SUBDIRS_VAR, list(subdir_names));
        output.assign(OBJECTS_VAR, list(&self.objects));
        output.assign(TARGETS_VAR, list(self.rules.iter().map(Rule::name)));

        output.rule_header(
            MAKE_ALL_RULE,
            [use_var(SUBDIRS_VAR), use_var(OBJECTS_VAR), use_var(TARGETS_VAR)],
        );

        for rule in &self.rules {
            rule.write(&mut output);
        }

        for subdir in &self.children {
            output.rule_header(subdir.name(), NO_DEPENDENCIES);
            output.indented(|output| {
                output.line(list([use_var(MAKE_VAR).as_str(), MAKE_SWITCH_FLAG, subdir.name()]));
            });
        }

        output.rule_header(MAKE_CLEAN_RULE, NO_DEPENDENCIES);
        output.indented(|output| {
            output.line(list([
                use_var(RM_VAR),
                use_var(RM_FLAGS_VAR),
                use_var(OBJECTS_VAR),
                use_var(TARGETS_VAR),
            ]));
            for subdir in self.children.iter().filter(|s| s.auto_clean) {
                output.line(list([
                    use_var(MAKE_VAR).as_str(),
                    MAKE_SWITCH_FLAG,
                    subdir.name(),
                    MAKE_CLEAN_RULE,
                ]));
            }
        });

        output
    }

    /// Writes this directory's Makefile, then those of the subdirectories.
    /// Stops at the first failure, leaving already written files in place.
    pub(crate) fn generate(&self, project: &Project) -> Result<()> {
        let to_root = project.relative_path_to(self)?;
        let output = self.render(&to_root, project.has_include());
        output.close(project.runtime(), &self.path.join(MAKEFILE_NAME))?;

        for subdir in &self.children {
            subdir.generate(project)?;
        }
        Ok(())
    }
}
