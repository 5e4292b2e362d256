use alloc::format;
use alloc::string::String;

use crate::error::Error;
use crate::path::Path;
use crate::runtime::{Result, Runtime};

const INDENT_CHAR: char = '\t';

/// Delimiter between list elements, such as multiple options
pub const LIST_DELIM: &str = " ";

/// `$(NAME)`
pub fn use_var(name: &str) -> String {
    format!("$({name})")
}

/// Joins elements with [`LIST_DELIM`]; an empty input yields an empty string.
pub fn list<I, S>(elements: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, element) in elements.into_iter().enumerate() {
        if i > 0 {
            out.push_str(LIST_DELIM);
        }
        out.push_str(element.as_ref());
    }
    out
}

/// Line-oriented Makefile text buffer that keeps indentation across lines.
#[derive(Debug, Default)]
pub struct MakeWriter {
    buf: String,
    indentation: usize,
}

impl MakeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.indentation {
            self.buf.push(INDENT_CHAR);
        }
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
    }

    /// `NAME=value`
    pub fn assign(&mut self, name: &str, value: impl AsRef<str>) {
        self.line(format!("{name}={}", value.as_ref()));
    }

    /// `NAME+=value`
    pub fn append(&mut self, name: &str, value: impl AsRef<str>) {
        self.line(format!("{name}+={}", value.as_ref()));
    }

    /// `name: dep dep ...`
    pub fn rule_header<I, S>(&mut self, name: &str, dependencies: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dependencies = list(dependencies);
        if dependencies.is_empty() {
            self.line(format!("{name}:"));
        } else {
            self.line(format!("{name}:{LIST_DELIM}{dependencies}"));
        }
    }

    pub fn indent(&mut self) {
        self.indentation += 1;
    }

    pub fn unindent(&mut self) -> core::result::Result<(), Error> {
        if self.indentation == 0 {
            return Err(Error::UnindentUnderflow);
        }
        self.indentation -= 1;
        Ok(())
    }

    /// Runs `f` one level deeper and restores the previous level afterwards.
    pub fn indented<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.indent();
        let ret = f(self);
        self.indentation -= 1;
        ret
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn finish(self) -> String {
        self.buf
    }

    pub fn close(self, runtime: &dyn Runtime, path: &Path) -> Result<()> {
        tracing::debug!(%path, bytes = self.buf.len(), "writing");
        runtime.write_file(path, self.buf.as_bytes())
    }
}
