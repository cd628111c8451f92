use crate::compile::{Comparator, Keyword};
use std::fmt::Display;

/// Types emitted by the lexer.
///
/// An abstraction over raw text to make construction of the action tree
/// easier. The literal content of a token is recovered by slicing the
/// source with its [`Region`][`crate::Region`].
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Token {
    /// Literal text outside of any directive.
    Direct,
    /// Beginning of a command directive - `{{`.
    CmdOpen,
    /// End of a command directive - `}}`.
    CmdClose,
    /// Beginning of a variable directive - `{%`.
    VarOpen,
    /// End of a variable directive - `%}`.
    VarClose,
    /// Dotted identifier such as `person.name`.
    Identifier,
    /// String literal within a command directive.
    String,
    /// Number within a command directive.
    Number,
    /// A `>filterName` suffix within a variable directive.
    ///
    /// The region includes the leading `>` sigil.
    Filter,
    /// Whitespace within a directive; ignored.
    Whitespace,
    /// A recognized keyword within a command directive.
    Keyword(Keyword),
    /// A comparison operator within a command directive.
    Comparator(Comparator),
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Direct => write!(f, "text"),
            Token::CmdOpen => write!(f, "begin command ({{{{)"),
            Token::CmdClose => write!(f, "end command (}}}})"),
            Token::VarOpen => write!(f, "begin variable ({{%)"),
            Token::VarClose => write!(f, "end variable (%}})"),
            Token::Identifier => write!(f, "identifier"),
            Token::String => write!(f, "string"),
            Token::Number => write!(f, "number"),
            Token::Filter => write!(f, "filter"),
            Token::Whitespace => write!(f, "whitespace"),
            Token::Keyword(keyword) => write!(f, "keyword `{keyword}`"),
            Token::Comparator(comparator) => write!(f, "comparator `{comparator}`"),
        }
    }
}
