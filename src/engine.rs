use crate::{
    compile::{compile, Template},
    log::Error,
    render::{Filter, Renderer},
    store::Store,
};

/// Compiles and renders templates with a fixed configuration.
///
/// An [`Engine`] is assembled up front and never changes afterwards; a
/// single instance may compile and render any number of templates.
///
/// # Examples
///
/// ```
/// use stencil::{Engine, Filter, Store};
///
/// let engine = Engine::new().with_default_filter(Filter::Html5);
/// let template = engine.compile("Hello, {% name %}!").unwrap();
/// let mut store = Store::new().with_must("name", "Fish & Chips");
///
/// let result = engine.render(&template, &mut store).unwrap();
/// assert_eq!(result, "Hello, Fish &amp; Chips!");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    /// Applied to every variable directive without an explicit filter.
    default_filter: Filter,
}

impl Engine {
    /// Create a new [`Engine`] with the default configuration.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of the [`Engine`] with the given default filter.
    #[inline]
    pub fn with_default_filter(mut self, filter: Filter) -> Self {
        self.default_filter = filter;

        self
    }

    /// Compile a [`Template`] from the given text.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the text contains invalid syntax.
    #[inline]
    pub fn compile<'source>(&self, text: &'source str) -> Result<Template<'source>, Error> {
        compile(text)
    }

    /// Compile a [`Template`] from the given text.
    ///
    /// # Panics
    ///
    /// Will panic when the text contains invalid syntax.
    #[inline]
    pub fn compile_must<'source>(&self, text: &'source str) -> Template<'source> {
        compile(text).unwrap()
    }

    /// Render a [`Template`] against the given [`Store`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a loop container is not iterable, or a
    /// directive names an unknown filter.
    pub fn render(&self, template: &Template, store: &mut Store) -> Result<String, Error> {
        Renderer::new(template, store, self.default_filter).render()
    }
}

#[cfg(test)]
mod tests {
    use super::Engine;
    use crate::{render::Filter, store::Store};

    #[test]
    fn test_default_filter_configuration() {
        let engine = Engine::new().with_default_filter(Filter::Attr5);
        let template = engine.compile_must("{% a %}");
        let mut store = Store::new().with_must("a", "it's");

        assert_eq!(engine.render(&template, &mut store).unwrap(), "it&apos;s");
    }

    #[test]
    fn test_compile_error_propagates() {
        assert!(Engine::new().compile("{{ for for }}").is_err());
    }
}
