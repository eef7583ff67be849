//! Core types for radio-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress sink shape shared by every phase: `(completed_units, total_units)`.
///
/// Page batches report completed pages out of the batch size; downloads report
/// bytes written out of the expected size. A total of 0 means "unknown".
pub type ProgressFn = dyn Fn(u64, u64) + Send + Sync;

/// One downloadable audio episode
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Broadcast {
    /// Display name (page title, numbered when a page carries several tracks)
    pub name: String,
    /// Audio file URL
    pub url: String,
}

impl Broadcast {
    /// Create a new Broadcast
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

impl fmt::Display for Broadcast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Reference to a program: a position in the loaded catalog or a literal name
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgramRef {
    /// Zero-based position in the station's program list
    Index(usize),
    /// Program name as shown on the site
    Name(String),
}

impl From<usize> for ProgramRef {
    fn from(index: usize) -> Self {
        ProgramRef::Index(index)
    }
}

impl From<&str> for ProgramRef {
    fn from(name: &str) -> Self {
        ProgramRef::Name(name.to_string())
    }
}

impl From<String> for ProgramRef {
    fn from(name: String) -> Self {
        ProgramRef::Name(name)
    }
}

impl fmt::Display for ProgramRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramRef::Index(i) => write!(f, "#{}", i + 1),
            ProgramRef::Name(name) => f.write_str(name),
        }
    }
}

/// A parsed user selection
///
/// Numbers are one-based as typed by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// A single number, e.g. `3`
    Single(usize),
    /// Inclusive ranges, e.g. `1-3,7` is `[(1, 3), (7, 7)]`
    ///
    /// Ranges stay unexpanded until they are checked against a list length.
    Many(Vec<(usize, usize)>),
    /// `*`
    All,
    /// Anything else, taken literally
    Name(String),
}

impl Selection {
    /// Parse user input into a selection
    ///
    /// # Examples
    ///
    /// ```
    /// use radio_dl::types::Selection;
    ///
    /// assert_eq!(Selection::parse("4"), Selection::Single(4));
    /// assert_eq!(Selection::parse("1-3, 7"), Selection::Many(vec![(1, 3), (7, 7)]));
    /// assert_eq!(Selection::parse("*"), Selection::All);
    /// assert_eq!(Selection::parse("Morning Show"), Selection::Name("Morning Show".into()));
    /// ```
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input == "*" {
            return Selection::All;
        }
        if is_number(input)
            && let Ok(n) = input.parse()
        {
            return Selection::Single(n);
        }

        let mut ranges = Vec::new();
        for segment in input.split(',') {
            let segment = segment.trim();
            if let Some((start, end)) = segment.split_once('-') {
                match (parse_number(start.trim()), parse_number(end.trim())) {
                    (Some(start), Some(end)) => ranges.push((start, end)),
                    _ => return Selection::Name(input.to_string()),
                }
            } else if let Some(n) = parse_number(segment) {
                ranges.push((n, n));
            } else {
                return Selection::Name(input.to_string());
            }
        }

        Selection::Many(ranges)
    }

    /// Resolve into zero-based indices into a list of `len` items
    ///
    /// Fails on names, on 0, on reversed ranges, and on numbers past the end
    /// of the list. Ranges are bounds-checked before they are expanded.
    pub fn to_indices(&self, len: usize) -> Result<Vec<usize>> {
        let ranges = match self {
            Selection::All => return Ok((0..len).collect()),
            Selection::Single(n) => vec![(*n, *n)],
            Selection::Many(ranges) => ranges.clone(),
            Selection::Name(name) => {
                return Err(Error::Selection(format!(
                    "expected a number, a range or '*', got '{}'",
                    name
                )));
            }
        };

        let mut indices = Vec::new();
        for (start, end) in ranges {
            if start > end {
                return Err(Error::Selection(format!(
                    "range {}-{} is reversed",
                    start, end
                )));
            }
            if start == 0 || end > len {
                let bad = if start == 0 { start } else { end };
                return Err(Error::Selection(format!(
                    "{} is out of range (1-{})",
                    bad, len
                )));
            }
            indices.extend(start - 1..end);
        }
        Ok(indices)
    }

    /// Convert to a program reference (ordinal or literal name)
    pub fn to_program_ref(&self) -> Result<ProgramRef> {
        match self {
            Selection::Single(0) => Err(Error::Selection("program numbers start at 1".to_string())),
            Selection::Single(n) => Ok(ProgramRef::Index(n - 1)),
            Selection::Name(name) => Ok(ProgramRef::Name(name.clone())),
            Selection::All | Selection::Many(_) => Err(Error::Selection(
                "program must be a number or a name, not a range".to_string(),
            )),
        }
    }
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn parse_number(s: &str) -> Option<usize> {
    if is_number(s) { s.parse().ok() } else { None }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ranges_and_lists() {
        assert_eq!(Selection::parse("2-4"), Selection::Many(vec![(2, 4)]));
        assert_eq!(
            Selection::parse("1,3 , 5-6"),
            Selection::Many(vec![(1, 1), (3, 3), (5, 6)])
        );
        assert_eq!(Selection::parse(" 12 "), Selection::Single(12));
    }

    #[test]
    fn test_parse_falls_back_to_name() {
        assert_eq!(
            Selection::parse("Talk-Back"),
            Selection::Name("Talk-Back".to_string())
        );
        assert_eq!(Selection::parse("1,abc"), Selection::Name("1,abc".to_string()));
        assert_eq!(Selection::parse("-3"), Selection::Name("-3".to_string()));
    }

    #[test]
    fn test_to_indices() {
        assert_eq!(Selection::All.to_indices(3).unwrap(), vec![0, 1, 2]);
        assert_eq!(Selection::Single(2).to_indices(3).unwrap(), vec![1]);
        assert_eq!(
            Selection::Many(vec![(1, 1), (3, 3)]).to_indices(3).unwrap(),
            vec![0, 2]
        );
        assert_eq!(Selection::parse("2-4,1").to_indices(5).unwrap(), vec![1, 2, 3, 0]);
        assert!(Selection::Single(4).to_indices(3).is_err());
        assert!(Selection::Single(0).to_indices(3).is_err());
        assert!(Selection::Name("x".into()).to_indices(3).is_err());
    }

    #[test]
    fn test_huge_range_rejected_without_expanding() {
        let selection = Selection::parse("1-99999999999999");
        assert_eq!(selection, Selection::Many(vec![(1, 99_999_999_999_999)]));
        assert!(matches!(selection.to_indices(10), Err(Error::Selection(_))));
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = Selection::parse("5-1").to_indices(10).unwrap_err();
        assert!(matches!(err, Error::Selection(ref m) if m.contains("reversed")));
        assert!(Selection::parse("0-2").to_indices(10).is_err());
    }

    #[test]
    fn test_to_program_ref() {
        assert_eq!(
            Selection::Single(5).to_program_ref().unwrap(),
            ProgramRef::Index(4)
        );
        assert_eq!(
            Selection::parse("Good Morning").to_program_ref().unwrap(),
            ProgramRef::Name("Good Morning".to_string())
        );
        assert!(Selection::All.to_program_ref().is_err());
        assert!(Selection::parse("1-2").to_program_ref().is_err());
    }

    #[test]
    fn test_broadcast_equality_is_structural() {
        let a = Broadcast::new("Show", "https://cdn/a.mp3");
        let b = Broadcast::new("Show".to_string(), "https://cdn/a.mp3".to_string());
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Show");
    }
}
