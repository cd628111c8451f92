pub mod token;

mod state;

use self::{state::CursorState, token::Token};
use crate::{
    compile::{Comparator, Keyword},
    log::{Error, ErrorKind, INVALID_SYNTAX, UNEXPECTED_CHARACTER},
    region::Region,
};

/// Marker which opens a command directive.
const CMD_OPEN: &str = "{{";
/// Marker which closes a command directive.
const CMD_CLOSE: &str = "}}";
/// Marker which opens a variable directive.
const VAR_OPEN: &str = "{%";
/// Marker which closes a variable directive.
const VAR_CLOSE: &str = "%}";

pub type TokenResult = Result<Option<(Token, Region)>, Error>;

/// Read the entire source as a sequence of [`Token`] instances.
///
/// # Errors
///
/// Returns an [`Error`] of kind [`Lex`][`ErrorKind::Lex`] when no rule
/// matches at some position; the lexer never recovers from an unmatched
/// position.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Region)>, Error> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    while let Some(next) = lexer.next()? {
        tokens.push(next);
    }

    Ok(tokens)
}

/// Provides methods to read a source string as [`Token`] instances.
pub struct Lexer<'source> {
    /// Reference to the source text.
    pub source: &'source str,
    /// Position within source.
    pub cursor: usize,
    /// Tracks the [`Lexer`] state and determines the action taken
    /// when `.next` is called.
    state: CursorState,
}

impl<'source> Lexer<'source> {
    /// Create a new [`Lexer`] over the given source.
    #[inline]
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            cursor: 0,
            state: CursorState::Content,
        }
    }

    /// Return the next [`Token`] and [`Region`].
    ///
    /// Any instance of [`Token::Whitespace`] is ignored; it advances the
    /// cursor but is never returned.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when no rule matches at the cursor.
    pub fn next(&mut self) -> TokenResult {
        loop {
            if self.source[self.cursor..].is_empty() {
                return Ok(None);
            }

            let c = self.cursor;
            let result = match self.state {
                CursorState::Content => self.lex_content(c),
                CursorState::Command => self.lex_command(c),
                CursorState::Variable => self.lex_variable(c),
            }?;

            match result {
                Some((Token::Whitespace, _)) => continue,
                other => return Ok(other),
            }
        }
    }

    /// Return the next [`Token`] and [`Region`] in [`CursorState::Content`]
    /// configuration.
    ///
    /// Recognizes the two directive openers, and otherwise greedily reads
    /// literal text up to the next unescaped `{`. The escapes `\{` and
    /// `\\` are consumed as part of the literal text and kept verbatim.
    fn lex_content(&mut self, from: usize) -> TokenResult {
        let rest = &self.source[from..];

        if rest.starts_with(CMD_OPEN) {
            self.state = CursorState::Command;
            self.cursor = from + CMD_OPEN.len();

            return Ok(Some((Token::CmdOpen, (from..self.cursor).into())));
        }
        if rest.starts_with(VAR_OPEN) {
            self.state = CursorState::Variable;
            self.cursor = from + VAR_OPEN.len();

            return Ok(Some((Token::VarOpen, (from..self.cursor).into())));
        }
        if rest.starts_with('{') {
            return Err(
                Error::build(ErrorKind::Lex { offset: from }, UNEXPECTED_CHARACTER)
                    .with_pointer(self.source, from..from + 1)
                    .with_help(format!(
                        "a `{{` must begin a directive with `{CMD_OPEN}` or `{VAR_OPEN}`, \
                        escape it with `\\{{` to render it literally"
                    )),
            );
        }

        let mut iterator = rest
            .char_indices()
            .map(|(d, c)| (from + d, c))
            .peekable();
        let mut end = self.source.len();

        while let Some((index, char)) = iterator.next() {
            match char {
                '{' => {
                    end = index;
                    break;
                }
                '\\' => {
                    // Consume the escape pair so an escaped brace does
                    // not terminate the run.
                    if let Some(&(_, next)) = iterator.peek() {
                        if next == '{' || next == '\\' {
                            iterator.next();
                        }
                    }
                }
                _ => {}
            }
        }
        self.cursor = end;

        Ok(Some((Token::Direct, (from..end).into())))
    }

    /// Return the next [`Token`] and [`Region`] in [`CursorState::Command`]
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when an unexpected character is found.
    fn lex_command(&mut self, from: usize) -> TokenResult {
        let mut iterator = self.source[from..]
            .char_indices()
            .map(|(d, c)| (from + d, c));
        let (index, char) = iterator.next().unwrap();

        match char {
            '}' => self.lex_marker(index, CMD_CLOSE, Token::CmdClose),
            '"' => self.lex_string(iterator, index),
            '=' | '!' | '<' | '>' => self.lex_comparator(iterator, index, char),
            c if c.is_whitespace() => Ok(Some(self.lex_whitespace(iterator, index))),
            c if c.is_ascii_digit() => Ok(Some(self.lex_number(index))),
            c if is_ident_start(c) => Ok(Some(self.lex_word(iterator, index))),
            _ => Err(
                Error::build(ErrorKind::Lex { offset: index }, UNEXPECTED_CHARACTER)
                    .with_pointer(self.source, index..index + char.len_utf8())
                    .with_help(format!(
                        "expected an identifier, keyword, string, number, comparator, \
                        or `{CMD_CLOSE}`"
                    )),
            ),
        }
    }

    /// Return the next [`Token`] and [`Region`] in [`CursorState::Variable`]
    /// configuration.
    ///
    /// Keywords have no meaning inside a variable directive, so `for` is
    /// lexed as a plain identifier here.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when an unexpected character is found.
    fn lex_variable(&mut self, from: usize) -> TokenResult {
        let mut iterator = self.source[from..]
            .char_indices()
            .map(|(d, c)| (from + d, c));
        let (index, char) = iterator.next().unwrap();

        match char {
            '%' => self.lex_marker(index, VAR_CLOSE, Token::VarClose),
            '>' => self.lex_filter(iterator, index),
            c if c.is_whitespace() => Ok(Some(self.lex_whitespace(iterator, index))),
            c if is_ident_start(c) => Ok(Some(self.lex_ident(iterator, index))),
            _ => Err(
                Error::build(ErrorKind::Lex { offset: index }, UNEXPECTED_CHARACTER)
                    .with_pointer(self.source, index..index + char.len_utf8())
                    .with_help(format!(
                        "expected an identifier, a `>filter` suffix, or `{VAR_CLOSE}`"
                    )),
            ),
        }
    }

    /// Return a [`Token`] and [`Region`] for a closing marker, switching
    /// back to [`CursorState::Content`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the text at `from` is not the marker.
    fn lex_marker(&mut self, from: usize, marker: &str, token: Token) -> TokenResult {
        if !self.source[from..].starts_with(marker) {
            return Err(
                Error::build(ErrorKind::Lex { offset: from }, UNEXPECTED_CHARACTER)
                    .with_pointer(self.source, from..from + 1)
                    .with_help(format!("expected `{marker}`")),
            );
        }
        self.state = CursorState::Content;
        self.cursor = from + marker.len();

        Ok(Some((token, (from..self.cursor).into())))
    }

    /// Return a [`Token`] and [`Region`] containing [`Token::Comparator`].
    ///
    /// All of these are recognized: `==`, `!=`, `>=`, `<=`, `>`, `<`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when `=` or `!` is not followed by `=`.
    fn lex_comparator<T>(&mut self, mut iter: T, from: usize, previous: char) -> TokenResult
    where
        T: Iterator<Item = (usize, char)>,
    {
        let next = iter.next().map(|(_, c)| c);
        let (comparator, length) = match (previous, next) {
            ('=', Some('=')) => (Comparator::Equal, 2),
            ('!', Some('=')) => (Comparator::NotEqual, 2),
            ('>', Some('=')) => (Comparator::GreaterOrEqual, 2),
            ('<', Some('=')) => (Comparator::LesserOrEqual, 2),
            ('>', _) => (Comparator::Greater, 1),
            ('<', _) => (Comparator::Lesser, 1),
            _ => {
                return Err(
                    Error::build(ErrorKind::Lex { offset: from }, UNEXPECTED_CHARACTER)
                        .with_pointer(self.source, from..from + 1)
                        .with_help(format!("expected `{previous}=`")),
                )
            }
        };
        self.cursor = from + length;

        Ok(Some((Token::Comparator(comparator), (from..self.cursor).into())))
    }

    /// Return a [`Token`] and [`Region`] containing [`Token::String`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the string is not delimited before the
    /// end of the source.
    fn lex_string<T>(&mut self, mut iter: T, from: usize) -> TokenResult
    where
        T: Iterator<Item = (usize, char)>,
    {
        let mut escaped = false;
        loop {
            match iter.next() {
                Some((index, '"')) if !escaped => {
                    // Add one to comply with string slice semantics.
                    let to = index + 1;
                    self.cursor = to;

                    return Ok(Some((Token::String, (from..to).into())));
                }
                Some((_, '\\')) if !escaped => escaped = true,
                Some((_, _)) => escaped = false,
                None => {
                    return Err(
                        Error::build(ErrorKind::Lex { offset: from }, INVALID_SYNTAX)
                            .with_pointer(self.source, from..self.source.len())
                            .with_help(
                                "this might be an undelimited string, try closing it with `\"`",
                            ),
                    )
                }
            }
        }
    }

    /// Return a [`Token`] and [`Region`] containing [`Token::Number`].
    ///
    /// A decimal point is part of the number only when another digit
    /// follows it.
    fn lex_number(&mut self, from: usize) -> (Token, Region) {
        let bytes = self.source.as_bytes();
        let mut to = from;

        while to < bytes.len() && bytes[to].is_ascii_digit() {
            to += 1;
        }
        if to + 1 < bytes.len() && bytes[to] == b'.' && bytes[to + 1].is_ascii_digit() {
            to += 1;
            while to < bytes.len() && bytes[to].is_ascii_digit() {
                to += 1;
            }
        }
        self.cursor = to;

        (Token::Number, (from..to).into())
    }

    /// Return a [`Token`] and [`Region`] containing [`Token::Whitespace`].
    fn lex_whitespace<T>(&mut self, mut iter: T, from: usize) -> (Token, Region)
    where
        T: Iterator<Item = (usize, char)>,
    {
        loop {
            match iter.next() {
                Some((index, char)) if !char.is_whitespace() => {
                    self.cursor = index;

                    break (Token::Whitespace, (from..index).into());
                }
                Some((_, _)) => continue,
                None => {
                    self.cursor = self.source.len();

                    break (Token::Whitespace, (from..self.source.len()).into());
                }
            }
        }
    }

    /// Return a [`Token`] and [`Region`] from the given iterator.
    ///
    /// The `Token` will be [`Token::Identifier`] or [`Token::Keyword`].
    /// The maximal undotted identifier run decides which: `forest` is an
    /// identifier, while `for.x` begins with the keyword `for` because
    /// the `.` forms a word boundary.
    fn lex_word<T>(&mut self, mut iter: T, from: usize) -> (Token, Region)
    where
        T: Iterator<Item = (usize, char)>,
    {
        let mut boundary = None;
        loop {
            match iter.next() {
                Some((index, char)) if !is_ident_continue(char) => {
                    boundary = Some((index, char));
                    break;
                }
                Some((_, _)) => continue,
                None => break,
            }
        }

        let (word_end, next_char) = match boundary {
            Some((index, char)) => (index, Some(char)),
            None => (self.source.len(), None),
        };

        if let Some(keyword) = as_keyword(&self.source[from..word_end]) {
            self.cursor = word_end;
            return (Token::Keyword(keyword), (from..word_end).into());
        }
        if next_char != Some('.') {
            self.cursor = word_end;
            return (Token::Identifier, (from..word_end).into());
        }

        // A dotted identifier; keep chaining segments.
        self.lex_ident(iter, from)
    }

    /// Return a [`Token`] and [`Region`] containing [`Token::Identifier`],
    /// consuming identifier characters and `.` separators.
    fn lex_ident<T>(&mut self, mut iter: T, from: usize) -> (Token, Region)
    where
        T: Iterator<Item = (usize, char)>,
    {
        loop {
            match iter.next() {
                Some((index, char)) if !is_ident_continue(char) && char != '.' => {
                    self.cursor = index;

                    break (Token::Identifier, (from..index).into());
                }
                Some((_, _)) => continue,
                None => {
                    self.cursor = self.source.len();

                    break (Token::Identifier, (from..self.source.len()).into());
                }
            }
        }
    }

    /// Return a [`Token`] and [`Region`] containing [`Token::Filter`].
    ///
    /// The region includes the leading `>` sigil; the filter name itself
    /// is an undotted identifier.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when no filter name follows the sigil.
    fn lex_filter<T>(&mut self, mut iter: T, from: usize) -> TokenResult
    where
        T: Iterator<Item = (usize, char)>,
    {
        match iter.next() {
            Some((_, char)) if is_ident_start(char) => {}
            _ => {
                return Err(
                    Error::build(ErrorKind::Lex { offset: from }, UNEXPECTED_CHARACTER)
                        .with_pointer(self.source, from..from + 1)
                        .with_help("a filter name must follow `>`"),
                )
            }
        }

        loop {
            match iter.next() {
                Some((index, char)) if !is_ident_continue(char) => {
                    self.cursor = index;

                    return Ok(Some((Token::Filter, (from..index).into())));
                }
                Some((_, _)) => continue,
                None => {
                    self.cursor = self.source.len();

                    return Ok(Some((Token::Filter, (from..self.source.len()).into())));
                }
            }
        }
    }
}

/// Return the [`Keyword`] matching the given word, if any.
fn as_keyword(word: &str) -> Option<Keyword> {
    let keyword = match word {
        "for" => Keyword::For,
        "endfor" => Keyword::EndFor,
        "if" => Keyword::If,
        "else" => Keyword::Else,
        "endif" => Keyword::EndIf,
        "in" => Keyword::In,
        _ => return None,
    };

    Some(keyword)
}

/// Return true if the given character is a recognized beginning identifier,
/// meaning '_' or an `xid_start`.
fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

/// Return true if the given character is a recognized continue identifier,
/// meaning an `xid_continue`.
fn is_ident_continue(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}
