use std::{
    fs,
    io,
    ops::{Deref, DerefMut},
    path::Path,
};

/// One physical line of source text, stripped of its trailing newline.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct Line {
    pub idx: usize,
    pub content: String,
}

/// The full source of a program, split into [`Line`]s.
///
/// Every physical line is kept, including blank ones: [`crate::cursor::Cursor`]
/// advances one stored line per `\n` it crosses, so dropping a line here would
/// desync reported positions from the file the user is looking at.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Default)]
pub struct Lines(Vec<Line>);

impl Deref for Lines {
    type Target = Vec<Line>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Lines {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl IntoIterator for Lines {
    type Item = Line;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Lines {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a mut Lines {
    type Item = &'a mut Line;
    type IntoIter = std::slice::IterMut<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter_mut()
    }
}

impl FromIterator<Line> for Lines {
    fn from_iter<I: IntoIterator<Item = Line>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<Line>> for Lines {
    fn from(v: Vec<Line>) -> Self {
        Self(v)
    }
}

impl Lines {
    pub fn new() -> Lines {
        Lines(Vec::new())
    }

    /// Splits `source` into [`Line`]s. Used for both file and REPL input so
    /// both paths go through the same cursor/lexer machinery.
    pub fn from_source(source: &str) -> Lines {
        source
            .split('\n')
            .enumerate()
            .map(|(idx, content)| Line {
                idx,
                content: content.to_string(),
            })
            .collect()
    }

    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Lines> {
        let source = fs::read_to_string(path)?;
        Ok(Self::from_source(&source))
    }
}
