use alloc::string::String;

use crate::writer::{MakeWriter, list, use_var};

// shell commands
pub const CC_VAR: &str = "CC";
pub const CXX_VAR: &str = "CXX";
pub const AR_VAR: &str = "AR";
pub const RM_VAR: &str = "RM";
pub const CP_VAR: &str = "CP";
pub const MAKE_VAR: &str = "MAKE";

// command flags
pub const AR_FLAGS_VAR: &str = "AR_FLAGS";
pub const RM_FLAGS_VAR: &str = "RM_FLAGS";
/// Static part of the preprocessor flags, ie. everything except include flags
pub const STATIC_CPPFLAGS_VAR: &str = "_CPPFLAGS";
pub const CPPFLAGS_VAR: &str = "CPPFLAGS";
pub const INCLUDE_VAR: &str = "INCLUDE";

/// Suffixes compiled with the C++ driver for which make has no implicit rule.
const EXTRA_CXX_SUFFIXES: [&str; 2] = ["cxx", "c++"];

/// Commands and flags written to the shared definitions file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub cc: String,
    pub cxx: String,
    pub ar: String,
    pub ar_flags: String,
    pub rm: String,
    pub rm_flags: String,
    pub cp: String,
    pub cppflags: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            cc: "gcc".into(),
            cxx: "g++".into(),
            ar: "ar".into(),
            ar_flags: "cr -o".into(),
            rm: "rm".into(),
            rm_flags: "-f".into(),
            cp: "cp".into(),
            cppflags: "-g -Wall -Wextra -Werror".into(),
        }
    }
}

impl Toolchain {
    pub fn cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = cc.into();
        self
    }

    pub fn cxx(mut self, cxx: impl Into<String>) -> Self {
        self.cxx = cxx.into();
        self
    }

    pub fn ar(mut self, ar: impl Into<String>) -> Self {
        self.ar = ar.into();
        self
    }

    pub fn cppflags(mut self, cppflags: impl Into<String>) -> Self {
        self.cppflags = cppflags.into();
        self
    }

    /// Body of `common.mk`.
    pub fn write_definitions(&self, output: &mut MakeWriter) {
        output.assign(CC_VAR, &self.cc);
        output.assign(CXX_VAR, &self.cxx);
        output.assign(AR_VAR, &self.ar);
        output.assign(STATIC_CPPFLAGS_VAR, &self.cppflags);
        output.assign(AR_FLAGS_VAR, &self.ar_flags);
        output.assign(RM_VAR, &self.rm);
        output.assign(RM_FLAGS_VAR, &self.rm_flags);
        output.assign(CP_VAR, &self.cp);

        for suffix in EXTRA_CXX_SUFFIXES {
            output.rule_header("%.o", [alloc::format!("%.{suffix}")]);
            output.indented(|output| {
                output.line(list([
                    use_var(CXX_VAR),
                    use_var(CPPFLAGS_VAR),
                    "-c -o $@ $<".into(),
                ]));
            });
        }
    }
}
