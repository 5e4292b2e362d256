use alloc::string::String;

use crate::path::Path;

pub const OBJ_EXT: &str = "o";
pub const ARCHIVE_EXT: &str = "a";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    C,
    Cpp,
}

const SOURCE_EXTS: [(&str, Language); 4] = [
    ("c", Language::C),
    ("cpp", Language::Cpp),
    ("cxx", Language::Cpp),
    ("c++", Language::Cpp),
];

/// A source file found directly in a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub language: Language,
}

impl Source {
    /// Classifies `name` by its suffix; `None` for anything that is not
    /// a C or C++ source.
    pub fn classify(name: &str) -> Option<Self> {
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        let (_, language) = SOURCE_EXTS.iter().find(|(e, _)| *e == ext)?;
        Some(Self {
            name: name.into(),
            language: *language,
        })
    }

    pub fn object_name(&self) -> String {
        Path::from(self.name.as_str())
            .set_extension(OBJ_EXT)
            .into_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let a = Source::classify("a.c").unwrap();
        assert_eq!(a.language, Language::C);
        assert_eq!(a.object_name(), "a.o");

        let b = Source::classify("lib.test.c++").unwrap();
        assert_eq!(b.language, Language::Cpp);
        assert_eq!(b.object_name(), "lib.test.o");

        assert_eq!(Source::classify("x.cxx").unwrap().language, Language::Cpp);
        assert_eq!(Source::classify("x.cpp").unwrap().object_name(), "x.o");
    }

    #[test]
    fn test_unknown_extensions_are_ignored() {
        for name in ["a.h", "README", "Makefile", "notes.C", "a.cc.bak", ".c"] {
            assert_eq!(Source::classify(name), None, "{name}");
        }
    }
}
