//! Program sources.

use std::{
    fmt, io,
    path::{Path, PathBuf},
};

/// An error that occurred while reading a program.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("couldn't read stdin: {0}")]
    ReadStdin(#[source] io::Error),
    #[error("couldn't read {0}: {1}")]
    ReadFile(PathBuf, #[source] io::Error),
}

/// Where a program came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FileName {
    /// A file on disk.
    Real(PathBuf),
    /// Standard input.
    Stdin,
    /// Any other source, e.g. a test.
    Custom(String),
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(path) => path.display().fmt(f),
            Self::Stdin => f.write_str("<stdin>"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

impl From<PathBuf> for FileName {
    fn from(path: PathBuf) -> Self {
        Self::Real(path)
    }
}

impl From<&str> for FileName {
    fn from(name: &str) -> Self {
        Self::Custom(name.to_string())
    }
}

/// Splits `src` into rows, without their terminators.
///
/// Rows end at `\n`, `\r\n` or a lone `\r`. A terminator at the very end does not start another
/// row.
pub fn rows(src: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = src;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let Some(end) = rest.find(['\n', '\r']) else {
            return Some(std::mem::take(&mut rest));
        };
        let row = &rest[..end];
        let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[end + terminator..];
        Some(row)
    })
}

/// The text of a program, before it is reflowed into a grid.
#[derive(Clone, derive_more::Debug)]
pub struct SourceFile {
    /// The name of the file.
    pub name: FileName,
    /// The complete source text.
    #[debug(skip)]
    pub src: String,
}

impl SourceFile {
    /// Creates a new source file from text already in memory.
    pub fn new(name: impl Into<FileName>, src: impl Into<String>) -> Self {
        Self { name: name.into(), src: src.into() }
    }

    /// Reads the file at `path`.
    pub fn read(path: &Path) -> Result<Self, ReadError> {
        trace!(path = %path.display(), "reading source file");
        let src =
            std::fs::read_to_string(path).map_err(|e| ReadError::ReadFile(path.to_path_buf(), e))?;
        Ok(Self::new(path.to_path_buf(), src))
    }

    /// Reads all of standard input.
    pub fn stdin() -> Result<Self, ReadError> {
        trace!("reading source from stdin");
        let src = io::read_to_string(io::stdin().lock()).map_err(ReadError::ReadStdin)?;
        Ok(Self::new(FileName::Stdin, src))
    }

    /// Returns row `y` of the source without its line terminator.
    ///
    /// Rows are split the same way the grid splits them.
    pub fn line(&self, y: usize) -> Option<&str> {
        rows(&self.src).nth(y)
    }

    /// Returns the number of rows in the source.
    pub fn line_count(&self) -> usize {
        rows(&self.src).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn row_terminators() {
        let split = |src| rows(src).collect::<Vec<_>>();
        assert_eq!(split("a\rb\r\nc\nd"), ["a", "b", "c", "d"]);
        assert_eq!(split("a\r\rb"), ["a", "", "b"]);
        assert_eq!(split("a\n"), ["a"]);
        assert_eq!(split("\r"), [""]);
        assert!(split("").is_empty());
    }

    #[test]
    fn lines() {
        let file = SourceFile::new("test", "ab\r\ncd\n\nef");
        assert_eq!(file.line(0), Some("ab"));
        assert_eq!(file.line(1), Some("cd"));
        assert_eq!(file.line(2), Some(""));
        assert_eq!(file.line(3), Some("ef"));
        assert_eq!(file.line(4), None);
        assert_eq!(file.line_count(), 4);
    }

    #[test]
    fn read_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "52*,@").unwrap();
        let file = SourceFile::read(tmp.path()).unwrap();
        assert_eq!(file.src, "52*,@");
        assert_eq!(file.name, FileName::Real(tmp.path().to_path_buf()));
    }

    #[test]
    fn read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bf");
        let err = SourceFile::read(&path).unwrap_err();
        assert!(matches!(err, ReadError::ReadFile(ref p, _) if *p == path), "{err:?}");
        assert!(err.to_string().starts_with("couldn't read "), "{err}");
    }

    #[test]
    fn names() {
        assert_eq!(FileName::Stdin.to_string(), "<stdin>");
        assert_eq!(FileName::from("prog").to_string(), "prog");
    }
}
