//! Stencil - Template Engine
//!
//! Templates mix literal text with two kinds of directive: command
//! directives (`{{ ... }}`) carrying `for` and `if` blocks, and variable
//! directives (`{% ... %}`) emitting values from a [`Store`], optionally
//! through a filter such as `{% title>html5 %}`.
//!
//! # Examples
//!
//! ```
//! use stencil::Store;
//!
//! let template = stencil::compile("Hello {% world %}\n").unwrap();
//! let mut store = Store::new().with_must("world", "World!");
//!
//! let result = stencil::render(&template, &mut store).unwrap();
//! assert_eq!(result, "Hello World!\n");
//! ```
mod compile;
mod engine;
mod format;
mod log;
mod region;
mod render;
mod store;

pub use compile::{
    compile, Action, Comparator, ForLoop, Identifier, IfElse, Keyword, Operand, Program,
    Template, Variable,
};
pub use engine::Engine;
pub use log::{Error, ErrorKind, Pointer, Visual};
pub use region::Region;
pub use render::{render, Filter};
pub use store::Store;
