mod pointer;

pub use pointer::Pointer;

use std::fmt::{Debug, Formatter, Result};

const BLANK: &str = "";
const PIPE: &str = "|";
const EQUAL: &str = "=";
const HIGHLIGHT: &str = "^";

/// Describes a type that can be associated with an Error and used
/// to print a visualization.
pub trait Visual: Debug {
    /// Display the visualization by writing to the given Formatter.
    fn display(
        &self,
        formatter: &mut Formatter<'_>,
        template: Option<&str>,
        help: Option<&str>,
    ) -> Result;
}

/// Get the 0-based line and column for the given byte offset.
///
/// The `lines` parameter is the source text split on newlines; an offset
/// past the end of the text resolves to the end of the last line. Lines
/// advance by byte length, matching the offsets the lexer reports.
fn get_line_and_column(lines: &[&str], offset: usize) -> (usize, usize) {
    let mut n = 0;

    for (i, line) in lines.iter().enumerate() {
        let len = line.len() + 1;
        if n + len > offset {
            return (i, offset - n);
        }
        n += len;
    }

    let length = lines.len();
    let last = lines.last().map(|line| line.len()).unwrap_or(0);

    (length, last)
}

/// Wrapper for UnicodeWidthStr::width.
fn get_width(s: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(s)
}

#[cfg(test)]
mod tests {
    use super::get_line_and_column;

    #[test]
    fn test_first_line() {
        let lines: Vec<_> = "one\ntwo\nthree".split_terminator('\n').collect();

        assert_eq!(get_line_and_column(&lines, 0), (0, 0));
        assert_eq!(get_line_and_column(&lines, 2), (0, 2));
    }

    #[test]
    fn test_later_lines() {
        let lines: Vec<_> = "one\ntwo\nthree".split_terminator('\n').collect();

        // Offset 4 is the "t" in "two", offset 8 is the "t" in "three".
        assert_eq!(get_line_and_column(&lines, 4), (1, 0));
        assert_eq!(get_line_and_column(&lines, 8), (2, 0));
        assert_eq!(get_line_and_column(&lines, 10), (2, 2));
    }

    #[test]
    fn test_multibyte_lines() {
        let lines: Vec<_> = "héllo\nwörld".split_terminator('\n').collect();

        // "héllo\n" is seven bytes, so the "w" sits at byte offset 7.
        assert_eq!(get_line_and_column(&lines, 7), (1, 0));
        assert_eq!(get_line_and_column(&lines, 10), (1, 3));
    }
}
