//! Special targets, whose names are listed under `TARGETS`.

use alloc::string::{String, ToString as _};
use alloc::vec::Vec;
use alloc::{format, vec};

use crate::path::Path;
use crate::toolchain::{
    AR_FLAGS_VAR, AR_VAR, CC_VAR, CP_VAR, CPPFLAGS_VAR, CXX_VAR, MAKE_VAR,
};
use crate::writer::{MakeWriter, list, use_var};

/// Built-in variables for the output and the list of all dependencies
pub const USE_OUT_IN_VARS: &str = "$@ $^";
/// Variable holding the repository fetch command
pub const GIT_CMD_VAR: &str = "GIT_CMD";
/// make flag to switch to a subdirectory
pub const MAKE_SWITCH_FLAG: &str = "-C";

/// How a [`Rule`] produces its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipe {
    /// Static archive of all the dependencies.
    Archive,
    /// Executable linked from all the dependencies, with the C driver when
    /// every source is C and the C++ driver otherwise.
    Binary { all_c: bool },
    /// Fetch of an external repository into the directory named after the rule.
    Clone { url: String },
    /// Copy of `source` to the rule's target. With `build` set, a sub-build
    /// runs in that directory first, since the source may only exist after it.
    Copy { source: Path, build: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    name: String,
    dependencies: Vec<String>,
    recipe: Recipe,
}

impl Rule {
    pub fn new<I, S>(name: impl Into<String>, dependencies: I, recipe: Recipe) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            recipe,
        }
    }

    pub fn archive<I, S>(name: impl Into<String>, objects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, objects, Recipe::Archive)
    }

    pub fn binary<I, S>(name: impl Into<String>, dependencies: I, all_c: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, dependencies, Recipe::Binary { all_c })
    }

    pub fn clone_repository(project: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self::new(project, Vec::<String>::new(), Recipe::Clone { url })
    }

    /// Plain copy of a file that some other rule (or sub-build) provides.
    pub fn copy_file<I, S>(name: impl Into<String>, source: impl Into<Path>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let source = source.into();
        Self::new(name, dependencies, Recipe::Copy { source, build: None })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Header followed by the indented command lines.
    pub fn write(&self, output: &mut MakeWriter) {
        output.rule_header(&self.name, &self.dependencies);
        output.indented(|output| {
            for command in self.commands() {
                output.line(command);
            }
        });
    }

    fn commands(&self) -> Vec<String> {
        match &self.recipe {
            Recipe::Archive => vec![list([
                use_var(AR_VAR),
                use_var(AR_FLAGS_VAR),
                USE_OUT_IN_VARS.into(),
            ])],
            Recipe::Binary { all_c } => {
                let driver = if *all_c { CC_VAR } else { CXX_VAR };
                vec![list([
                    use_var(driver),
                    use_var(CPPFLAGS_VAR),
                    format!("-o {USE_OUT_IN_VARS}"),
                ])]
            }
            Recipe::Clone { url } => {
                vec![list([use_var(GIT_CMD_VAR), url.clone(), self.name.clone()])]
            }
            Recipe::Copy { source, build } => {
                let mut commands = Vec::with_capacity(2);
                if let Some(dir) = build {
                    commands.push(list([use_var(MAKE_VAR), MAKE_SWITCH_FLAG.into(), dir.clone()]));
                }
                commands.push(list([use_var(CP_VAR), source.to_string(), self.name.clone()]));
                commands
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(rule: &Rule) -> String {
        let mut output = MakeWriter::new();
        rule.write(&mut output);
        output.finish()
    }

    #[test]
    fn test_archive() {
        let rule = Rule::archive("src.a", ["a.o", "b.o"]);
        assert_eq!(render(&rule), "src.a: a.o b.o\n\t$(AR) $(AR_FLAGS) $@ $^\n");
    }

    #[test]
    fn test_binary_driver_follows_language() {
        let c = Rule::binary("app", ["main.o", "src/src.a"], true);
        assert_eq!(render(&c), "app: main.o src/src.a\n\t$(CC) $(CPPFLAGS) -o $@ $^\n");

        let cpp = Rule::binary("app", ["main.o"], false);
        assert_eq!(render(&cpp), "app: main.o\n\t$(CXX) $(CPPFLAGS) -o $@ $^\n");
    }

    #[test]
    fn test_clone() {
        let rule = Rule::clone_repository("CommonC", "https://example.com/CommonC.git");
        assert!(rule.dependencies().is_empty());
        assert_eq!(
            render(&rule),
            "CommonC:\n\t$(GIT_CMD) https://example.com/CommonC.git CommonC\n"
        );
    }

    #[test]
    fn test_copy_with_and_without_sub_build() {
        let first = Rule::new(
            "commonc.a",
            ["CommonC"],
            Recipe::Copy {
                source: Path::from("CommonC/commonc.a"),
                build: Some("CommonC".into()),
            },
        );
        assert_eq!(
            render(&first),
            "commonc.a: CommonC\n\t$(MAKE) -C CommonC\n\t$(CP) CommonC/commonc.a commonc.a\n"
        );

        let plain = Rule::copy_file("lib.a", "src/lib.a", ["src"]);
        assert_eq!(render(&plain), "lib.a: src\n\t$(CP) src/lib.a lib.a\n");
    }
}
