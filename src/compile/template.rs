use super::tree::Program;

/// A compiled template, ready to be rendered.
///
/// Borrows the source text it was compiled from; the actions inside the
/// [`Program`] address that text by region.
#[derive(Debug, Clone, PartialEq)]
pub struct Template<'source> {
    /// The executable form of the template.
    pub(crate) program: Program,
    /// The source text the template was compiled from.
    pub(crate) source: &'source str,
}

impl<'source> Template<'source> {
    /// Return the source text of the [`Template`].
    #[inline]
    pub fn source(&self) -> &'source str {
        self.source
    }
}
