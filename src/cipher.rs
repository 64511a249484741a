use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use crate::HashMap;

/// Errors produced while loading or applying an [`Encoding`].
#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    /// The mapping source could not be read.
    #[error("could not read the encoding mapping: {0}")]
    Io(#[from] io::Error),
    /// A non-blank line did not consist of exactly two single characters.
    #[error("line {line} of the encoding mapping is not a `source destination` character pair")]
    MalformedLine {
        /// One-based line number.
        line: usize,
    },
    /// The input contained a character with no mapping.
    #[error("There's no mapping to encode the character: {0}")]
    Unmapped(char),
}

/// A character substitution table.
///
/// Each line of the mapping source holds a source character and its
/// replacement separated by whitespace. Blank lines are skipped. When a
/// source character appears twice, the first mapping is kept.
///
/// ```rust
/// use chain_hash::cipher::Encoding;
///
/// let encoding = Encoding::from_reader("a b\nc d\n".as_bytes()).unwrap();
/// assert_eq!(encoding.encode("ac").unwrap(), "bd");
/// assert!(encoding.encode("az").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Encoding {
    table: HashMap<char, char>,
}

impl Encoding {
    /// Loads a mapping from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, CipherError> {
        let mut table = HashMap::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let mut tokens = line.split_whitespace();
            let Some(first) = tokens.next() else {
                continue;
            };
            let (Some(source), Some(destination), None) =
                (single_char(first), tokens.next().and_then(single_char), tokens.next())
            else {
                return Err(CipherError::MalformedLine { line: index + 1 });
            };
            table.insert(source, destination);
        }
        Ok(Self { table })
    }

    /// Loads a mapping from the file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CipherError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Returns the number of mapped source characters.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if no characters are mapped.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the replacement for `source`, if mapped.
    pub fn get(&self, source: char) -> Option<char> {
        self.table.get(&source).copied()
    }

    /// Transliterates `input` character by character.
    ///
    /// Fails on the first unmapped character; no partial output is
    /// returned.
    pub fn encode(&self, input: &str) -> Result<String, CipherError> {
        input
            .chars()
            .map(|c| self.get(c).ok_or(CipherError::Unmapped(c)))
            .collect()
    }
}

fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
