mod compare;
mod filter;
mod renderer;

pub use filter::Filter;
pub(crate) use renderer::Renderer;

use crate::{compile::Template, log::Error, store::Store};

/// Render a [`Template`] against the given [`Store`].
///
/// Provides a shortcut to quickly render a `Template` without creating
/// an [`Engine`][`crate::Engine`]; the default filter is [`Filter::Raw`].
///
/// # Errors
///
/// Returns an [`Error`] when a loop container is not iterable, or a
/// directive names an unknown filter.
pub fn render(template: &Template, store: &mut Store) -> Result<String, Error> {
    Renderer::new(template, store, Filter::default()).render()
}
