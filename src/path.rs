use alloc::format;
use alloc::string::String;
use core::fmt;

#[derive(Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Path(String);

pub const SEP: &str = "/";

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({})", self.0)
    }
}

impl From<&str> for Path {
    fn from(path: &str) -> Self {
        Self(path.replace("\\", "/"))
    }
}

impl From<String> for Path {
    fn from(path: String) -> Self {
        Self::from(path.as_str())
    }
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last non-empty segment, or the whole path when it has no separator.
    pub fn file_name(&self) -> &str {
        let trimmed = self.0.trim_end_matches(SEP);
        match trimmed.rfind(SEP) {
            Some(i) => &trimmed[i + 1..],
            None => trimmed,
        }
    }

    pub fn parent(&self) -> Option<Path> {
        let trimmed = self.0.trim_end_matches(SEP);
        let i = trimmed.rfind(SEP)?;
        if i == 0 {
            return Some(Self(SEP.into()));
        }
        Some(Self(trimmed[..i].into()))
    }

    pub fn set_extension(&self, suffix: &str) -> Self {
        let stem_start = self.0.rfind(SEP).map_or(0, |i| i + 1);
        // a dot in a directory name is not an extension
        let stem_end = match self.0[stem_start..].rfind('.') {
            Some(dot) => stem_start + dot,
            None => self.0.len(),
        };
        let suffix = suffix.trim_start_matches('.');
        Self(format!("{}.{suffix}", &self.0[..stem_end]))
    }

    pub fn join(&self, path: impl AsRef<str>) -> Self {
        if path.as_ref().starts_with(SEP) || self.0.is_empty() {
            return Self(path.as_ref().into());
        }
        if path.as_ref().is_empty() {
            return self.clone();
        }

        let mut new_path = String::from(self.0.trim_end_matches(SEP));
        new_path.push_str(SEP);
        new_path.push_str(path.as_ref());
        Self(new_path)
    }

    /// Remainder of `self` below `base`, matching on whole segments only,
    /// so `/a/bc` is not considered to be under `/a/b`.
    pub fn strip_prefix(&self, base: &Path) -> Option<&str> {
        let base = base.0.trim_end_matches(SEP);
        let rest = self.0.strip_prefix(base)?;
        if rest.is_empty() || rest.starts_with(SEP) || base.is_empty() {
            Some(rest)
        } else {
            None
        }
    }

    /// Number of non-empty segments.
    pub fn depth(&self) -> usize {
        segments(&self.0).count()
    }
}

pub(crate) fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEP).filter(|s| !s.is_empty())
}
