use super::{Pointer, Visual, RED, RESET};
use crate::region::Region;
use std::fmt::{Debug, Display, Formatter, Result};

/// Identifies the class of failure an [`Error`] describes, and carries
/// the data a caller needs to react to it programmatically.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// No lexical rule matched at the given offset in the source.
    Lex {
        /// Byte offset of the unrecognized character.
        offset: usize,
    },
    /// No grammar rule matched the token sequence at the given offset.
    Grammar {
        /// Byte offset of the first token of the invalid sequence.
        offset: usize,
    },
    /// Malformed or unclosed block nesting.
    Structure {
        /// Byte offset of the offending directive.
        offset: usize,
        /// Name of the offending block directive, such as "endfor".
        block: &'static str,
    },
    /// A loop container resolved to a value that cannot be iterated.
    Type {
        /// The dotted identifier of the container.
        identifier: String,
    },
    /// A template requested a filter that does not exist.
    Filter {
        /// The requested filter name.
        name: String,
    },
}

/// Describes an error, and allows adding contextual help text and a
/// visualization.
///
/// # Examples
///
/// Creating an [`Error`] that includes a [`Visual`] of type [`Pointer`]:
///
/// ```
/// use stencil::{Error, ErrorKind};
///
/// Error::build(ErrorKind::Structure { offset: 3, block: "endfor" }, "unexpected block")
///     .with_pointer("ab {{ endfor }}", 3..15)
///     .with_name("template.txt")
///     .with_help("an `endfor` must be preceded by a matching `for`");
/// ```
///
/// When printed with `println!("{:#}", error)` the [`Error`] produces this
/// output:
///
/// ```text
/// error: unexpected block
///   --> template.txt:1:4
///    |
///  1 | ab {{ endfor }}
///    |    ^^^^^^^^^^^^
///    |
///   = help: an `endfor` must be preceded by a matching `for`
/// ```
pub struct Error {
    /// The class of failure.
    kind: ErrorKind,
    /// Describes the cause of the [`Error`].
    reason: String,
    /// A visualization to help illustrate the [`Error`].
    visual: Option<Box<dyn Visual>>,
    /// Additional information to display with the [`Error`].
    help: Option<String>,
    /// The name of the template that the [`Error`] comes from.
    name: Option<String>,
}

impl Error {
    /// Create a new [`Error`] with the given kind and reason text.
    ///
    /// The remaining fields may be populated with the `with_*` methods.
    pub fn build<T>(kind: ErrorKind, reason: T) -> Self
    where
        T: Into<String>,
    {
        Error {
            kind,
            reason: reason.into(),
            visual: None,
            help: None,
            name: None,
        }
    }

    /// Set the name text, which is the name of the template that the
    /// [`Error`] is related to.
    pub fn with_name<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.name = Some(text.into());

        self
    }

    /// Set the [`Visual`], which is a visualization that helps illustrate
    /// the cause of the error.
    pub fn with_visual(mut self, visual: impl Visual + 'static) -> Self {
        self.visual = Some(Box::new(visual));

        self
    }

    /// Set the visualization to a new [`Pointer`] over the given source
    /// text and [`Region`].
    pub fn with_pointer<T>(mut self, source: &str, region: T) -> Self
    where
        T: Into<Region>,
    {
        self.visual = Some(Box::new(Pointer::new(source, region.into())));

        self
    }

    /// Set the help text, which is contextual information to accompany
    /// the reason text.
    pub fn with_help<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.help = Some(text.into());

        self
    }

    /// Return the [`ErrorKind`] describing this [`Error`].
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Return the name of the template that the error is related to.
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if !f.alternate() {
            writeln!(f, "{self:#}")?;
        }
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("reason", &self.reason)
            .field("name", &self.name)
            .field("visual", &self.visual)
            .field("help", &self.help)
            .finish()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let header = format!("{RED}error{RESET}");
        write!(f, "{header}: {}", self.reason)?;

        if self.visual.is_some() && f.alternate() {
            return self.visual.as_ref().unwrap().display(
                f,
                self.name.as_deref(),
                self.help.as_deref(),
            );
        }

        Ok(())
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.reason == other.reason
            && self.help == other.help
            && self.name == other.name
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn test_kind_is_retained() {
        let error = Error::build(ErrorKind::Lex { offset: 4 }, "unexpected character");

        assert_eq!(error.kind(), &ErrorKind::Lex { offset: 4 });
    }

    #[test]
    fn test_named_display() {
        let error = Error::build(ErrorKind::Grammar { offset: 0 }, "invalid sequence")
            .with_pointer("{{ for for }}", 0..13)
            .with_name("template.html")
            .with_help("malformed directive");

        assert_eq!(error.get_name(), Some("template.html"));

        let display = format!("{error:#}");
        assert!(display.contains("template.html:1:1"));
        assert!(display.contains("help: malformed directive"));
    }
}
