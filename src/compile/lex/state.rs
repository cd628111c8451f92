/// Describes the internal state of a [`Lexer`][`super::Lexer`].
///
/// The lexer is a three-state automaton; each state recognizes its own
/// set of rules, so the same text can mean different things depending
/// on the enclosing directive.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum CursorState {
    /// The cursor is outside of any directive, reading literal text.
    Content,
    /// The cursor is inside a command directive - `{{ ... }}`.
    Command,
    /// The cursor is inside a variable directive - `{% ... %}`.
    Variable,
}
