use crate::{compile::Comparator, region::Region};

/// An ordered list of [`Action`] instances.
///
/// Executing each action in order against a store produces the rendered
/// output of a template.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// The actions of this program, in source order.
    pub actions: Vec<Action>,
}

/// A single renderable instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Literal text, emitted verbatim.
    Direct(Region),
    /// Emit the value of a variable, passed through a filter.
    Variable(Variable),
    /// Repeat a nested [`Program`] once per item of a container.
    For(ForLoop),
    /// Choose between two nested [`Program`] branches with a comparison.
    If(IfElse),
}

/// A dotted path such as `person.name`.
///
/// The text is recovered by slicing the template source with the region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Identifier {
    /// Location of the path within the source.
    pub region: Region,
}

/// An output expression - `{% person.name>trim %}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// The dotted path to resolve against the store.
    pub path: Identifier,
    /// An explicit filter name, without the `>` sigil.
    ///
    /// When `None`, the engine default filter applies.
    pub filter: Option<Identifier>,
}

/// A loop block - `{{ for person in people }} ... {{ endfor }}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    /// Name bound to each item of the container in turn.
    pub variable: Identifier,
    /// The dotted path of the container to iterate.
    pub container: Identifier,
    /// The repeated actions.
    pub body: Program,
    /// Location of the opening directive.
    pub region: Region,
}

/// A conditional block - `{{ if a == b }} ... {{ else }} ... {{ endif }}`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfElse {
    /// The left side of the comparison, always a path into the store.
    pub left: Identifier,
    /// The comparison operator.
    pub operator: Comparator,
    /// The right side of the comparison.
    pub right: Operand,
    /// Actions taken when the comparison is true.
    pub then_branch: Program,
    /// Actions taken when the comparison is false.
    pub else_branch: Option<Program>,
    /// Location of the opening directive.
    pub region: Region,
}

/// The right side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A dotted path resolved against the store.
    Identifier(Identifier),
    /// A string literal, already unescaped.
    String(String),
    /// A number literal.
    Number(f64),
}
