mod grammar;
mod lex;
mod parse;
mod template;
mod tree;

pub use template::Template;
pub use tree::{Action, ForLoop, Identifier, IfElse, Operand, Program, Variable};

use crate::log::Error;
use std::fmt::Display;

/// Compile a [`Template`] from the given text.
///
/// Provides a shortcut to quickly compile a `Template` without creating
/// an [`Engine`][`crate::Engine`].
///
/// # Errors
///
/// Returns an [`Error`] when the text contains invalid syntax.
///
/// # Examples
///
/// ```
/// let template = stencil::compile("Hello {% world %}");
/// assert!(template.is_ok())
/// ```
pub fn compile(text: &str) -> Result<Template<'_>, Error> {
    let tokens = lex::tokenize(text)?;
    let fragments = grammar::match_fragments(&tokens, text)?;
    let program = parse::build_tree(fragments, text)?;

    Ok(Template {
        program,
        source: text,
    })
}

/// Keywords recognized by the lexer in command state.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Keyword {
    /// Beginning of a loop block.
    For,
    /// End of a loop block.
    EndFor,
    /// Beginning of a conditional block.
    If,
    /// Marks the beginning of the alternative branch in an "if" block.
    Else,
    /// End of a conditional block.
    EndIf,
    /// Divides the loop variable from the container in a loop.
    ///
    /// In this example, the loop variable is "person" while the
    /// container is "people":
    ///
    /// "for person in people"
    In,
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Keyword::For => write!(f, "for"),
            Keyword::EndFor => write!(f, "endfor"),
            Keyword::If => write!(f, "if"),
            Keyword::Else => write!(f, "else"),
            Keyword::EndIf => write!(f, "endif"),
            Keyword::In => write!(f, "in"),
        }
    }
}

/// Comparators recognized by the lexer and evaluated by the renderer.
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum Comparator {
    /// ==
    Equal,
    /// !=
    NotEqual,
    /// >=
    GreaterOrEqual,
    /// <=
    LesserOrEqual,
    /// >
    Greater,
    /// <
    Lesser,
}

impl Display for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Comparator::Equal => write!(f, "=="),
            Comparator::NotEqual => write!(f, "!="),
            Comparator::GreaterOrEqual => write!(f, ">="),
            Comparator::LesserOrEqual => write!(f, "<="),
            Comparator::Greater => write!(f, ">"),
            Comparator::Lesser => write!(f, "<"),
        }
    }
}
