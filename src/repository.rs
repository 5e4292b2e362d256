use alloc::string::String;
use alloc::vec::Vec;

use crate::directory::Directory;
use crate::path::Path;
use crate::project::INCLUDE_NAME;
use crate::rule::{GIT_CMD_VAR, Recipe, Rule};

/// The fetch command assigned to [`GIT_CMD_VAR`]
pub const GIT_CLONE_CMD: &str = "git clone";

/// A file to copy out of the cloned repository.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Output {
    file: String,
    dir_in_project: String,
    dir_in_target: Option<String>,
}

/// Rules for an external repository: one that clones the whole folder,
/// then one per file copied out of it. The first copy also builds the
/// repository, since some of its outputs only exist after `make` has run
/// inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    project: String,
    url: String,
    outputs: Vec<Output>,
}

impl Repository {
    pub fn new(project: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            url: url.into(),
            outputs: Vec::new(),
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// Copies `<project>/<dir_in_project>/<file>` next to the Makefile.
    pub fn add_output(&mut self, file: impl Into<String>, dir_in_project: impl Into<String>) -> &mut Self {
        self.outputs.push(Output {
            file: file.into(),
            dir_in_project: dir_in_project.into(),
            dir_in_target: None,
        });
        self
    }

    /// Copies `<project>/<dir_in_project>/<file>` into `dir_in_target`.
    pub fn add_output_to(
        &mut self,
        file: impl Into<String>,
        dir_in_project: impl Into<String>,
        dir_in_target: impl Into<String>,
    ) -> &mut Self {
        self.outputs.push(Output {
            file: file.into(),
            dir_in_project: dir_in_project.into(),
            dir_in_target: Some(dir_in_target.into()),
        });
        self
    }

    /// Copies a header from the repository's `include` folder into the
    /// `include` folder of the project root. The repository is expected to
    /// be attached to a directory right below the root.
    pub fn add_include_output(&mut self, file: impl Into<String>) -> &mut Self {
        let target = Path::from("..").join(INCLUDE_NAME).into_string();
        self.add_output_to(file, INCLUDE_NAME, target)
    }

    /// Adds the fetch command, the clone rule and then every copy rule to
    /// `dir`, in that order.
    pub fn attach(self, dir: &mut Directory) {
        tracing::debug!(project = %self.project, outputs = self.outputs.len(), "attaching repository");

        dir.assign(GIT_CMD_VAR, GIT_CLONE_CMD);
        dir.add_rule(Rule::clone_repository(self.project.as_str(), self.url));

        for (i, output) in self.outputs.into_iter().enumerate() {
            let source = Path::from(self.project.as_str())
                .join(&output.dir_in_project)
                .join(&output.file);
            let name = match output.dir_in_target {
                Some(dir_in_target) => Path::from(dir_in_target).join(&output.file).into_string(),
                None => output.file,
            };
            let build = (i == 0).then(|| self.project.clone());
            dir.add_rule(Rule::new(name, [self.project.as_str()], Recipe::Copy { source, build }));
        }
    }
}
