use super::{compare, filter::Filter};
use crate::{
    compile::{Action, ForLoop, Identifier, IfElse, Operand, Program, Template, Variable},
    format,
    log::{Error, ErrorKind, NOT_ITERABLE, UNKNOWN_FILTER},
    store::Store,
};
use serde_json::Value;

/// Executes a [`Template`] against a [`Store`] to produce output text.
pub struct Renderer<'source, 'store> {
    /// The compiled template being rendered.
    template: &'source Template<'source>,
    /// The bindings that directives resolve against.
    ///
    /// Mutable because loops rebind their loop variable here, and the
    /// last binding deliberately survives the render.
    store: &'store mut Store,
    /// Applied to every variable directive without an explicit filter.
    default_filter: Filter,
}

impl<'source, 'store> Renderer<'source, 'store> {
    /// Create a new [`Renderer`].
    pub fn new(
        template: &'source Template<'source>,
        store: &'store mut Store,
        default_filter: Filter,
    ) -> Self {
        Self {
            template,
            store,
            default_filter,
        }
    }

    /// Render the template, consuming the [`Renderer`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind [`Type`][`ErrorKind::Type`] when a
    /// loop container is not an array, or of kind
    /// [`Filter`][`ErrorKind::Filter`] when a directive names an unknown
    /// filter. A missing variable is not an error; it renders nothing.
    pub fn render(mut self) -> Result<String, Error> {
        let template = self.template;
        let mut buffer = String::with_capacity(template.source.len());
        self.render_program(&template.program, &mut buffer)?;

        Ok(buffer)
    }

    fn render_program(&mut self, program: &Program, buffer: &mut String) -> Result<(), Error> {
        for action in &program.actions {
            match action {
                Action::Direct(region) => buffer.push_str(region.literal(self.source())),
                Action::Variable(variable) => self.render_variable(variable, buffer)?,
                Action::For(forloop) => self.render_for(forloop, buffer)?,
                Action::If(ifelse) => self.render_if(ifelse, buffer)?,
            }
        }

        Ok(())
    }

    fn render_variable(&mut self, variable: &Variable, buffer: &mut String) -> Result<(), Error> {
        let path = variable.path.region.literal(self.source());

        // An absent variable renders nothing; the filter name is only
        // validated once there is a value to filter.
        let Some(value) = self.store.lookup(path) else {
            return Ok(());
        };
        let text = format::to_text(value);

        let filter = self.resolve_filter(variable.filter.as_ref())?;
        buffer.push_str(&filter.apply(&text));

        Ok(())
    }

    fn render_for(&mut self, forloop: &ForLoop, buffer: &mut String) -> Result<(), Error> {
        let container = forloop.container.region.literal(self.source());
        let items = match self.store.lookup(container) {
            None => return Ok(()),
            Some(Value::Array(items)) => items.clone(),
            Some(_) => {
                return Err(Error::build(
                    ErrorKind::Type {
                        identifier: container.to_string(),
                    },
                    NOT_ITERABLE,
                )
                .with_pointer(self.source(), forloop.container.region)
                .with_help(format!("`{container}` must be an array to back a loop")))
            }
        };

        let variable = forloop.variable.region.literal(self.source());
        for item in items {
            self.store.bind(variable, item);
            self.render_program(&forloop.body, buffer)?;
        }

        Ok(())
    }

    fn render_if(&mut self, ifelse: &IfElse, buffer: &mut String) -> Result<(), Error> {
        let branch = match self.evaluate(ifelse) {
            Some(true) => &ifelse.then_branch,
            Some(false) => match &ifelse.else_branch {
                Some(program) => program,
                None => return Ok(()),
            },
            // A missing operand renders neither branch.
            None => return Ok(()),
        };

        self.render_program(branch, buffer)
    }

    /// Evaluate the comparison of a conditional block.
    ///
    /// Returns `None` when either operand is absent from the store.
    fn evaluate(&self, ifelse: &IfElse) -> Option<bool> {
        let source = self.source();
        let left = self.store.lookup(ifelse.left.region.literal(source))?;

        let result = match &ifelse.right {
            Operand::Identifier(identifier) => {
                let right = self.store.lookup(identifier.region.literal(source))?;

                compare::compare_values(left, ifelse.operator, right)
            }
            Operand::String(string) => {
                compare::compare_values(left, ifelse.operator, &Value::String(string.clone()))
            }
            Operand::Number(number) => {
                compare::compare_numbers(compare::coerce_number(left), ifelse.operator, *number)
            }
        };

        Some(result)
    }

    /// Return the [`Filter`] a variable directive asks for, or the
    /// default when it has no `>name` suffix.
    fn resolve_filter(&self, name: Option<&Identifier>) -> Result<Filter, Error> {
        let Some(identifier) = name else {
            return Ok(self.default_filter);
        };

        let name = identifier.region.literal(self.source());
        Filter::from_name(name).ok_or_else(|| {
            Error::build(
                ErrorKind::Filter {
                    name: name.to_string(),
                },
                UNKNOWN_FILTER,
            )
            .with_pointer(self.source(), identifier.region)
            .with_help("expected one of `raw`, `trim`, `attr4`, `attr5`, `html4`, `html5`")
        })
    }

    fn source(&self) -> &'source str {
        self.template.source
    }
}

#[cfg(test)]
mod tests {
    use super::{Filter, Renderer};
    use crate::{compile::compile, log::ErrorKind, store::Store};
    use serde_json::json;

    #[test]
    fn test_direct_is_verbatim() {
        // Escapes survive as written; no directive means no rewriting.
        let source = r"plain \{ text \\ here";

        assert_eq!(helper_render(source, Store::new()), source);
    }

    #[test]
    fn test_variable() {
        let store = Store::new().with_must("name", "Taylor");

        assert_eq!(helper_render("Hello, {% name %}!", store), "Hello, Taylor!");
    }

    #[test]
    fn test_missing_variable_is_empty() {
        assert_eq!(helper_render("[{% absent %}]", Store::new()), "[]");
    }

    #[test]
    fn test_nested_lookup() {
        let store = Store::new().with_must("a", json!({"b": {"c": {"d": 42}}}));

        assert_eq!(helper_render("{% a.b.c.d %}", store), "42");
    }

    #[test]
    fn test_filter() {
        let store = Store::new().with_must("title", "Fish & Chips");

        assert_eq!(
            helper_render("{% title>html5 %}", store),
            "Fish &amp; Chips"
        );
    }

    #[test]
    fn test_unknown_filter() {
        let template = compile("{% a>shout %}").unwrap();
        let mut store = Store::new().with_must("a", "x");
        let error = Renderer::new(&template, &mut store, Filter::default())
            .render()
            .unwrap_err();

        assert_eq!(
            error.kind(),
            &ErrorKind::Filter {
                name: "shout".into()
            }
        );
    }

    #[test]
    fn test_absent_variable_skips_filter() {
        // The filter name never matters when the variable is absent.
        assert_eq!(helper_render("[{% missing>bogus %}]", Store::new()), "[]");
    }

    #[test]
    fn test_default_filter_applies_to_bare_variables() {
        let template = compile("{% a %} {% a>raw %}").unwrap();
        let mut store = Store::new().with_must("a", "x&y");
        let result = Renderer::new(&template, &mut store, Filter::Html5)
            .render()
            .unwrap();

        assert_eq!(result, "x&amp;y x&y");
    }

    #[test]
    fn test_for() {
        let store = Store::new().with_must("names", json!(["a", "b", "c"]));

        assert_eq!(
            helper_render("{{ for name in names }}({% name %}){{ endfor }}", store),
            "(a)(b)(c)"
        );
    }

    #[test]
    fn test_for_numbers() {
        let store = Store::new().with_must("numbers", json!([1, 2, 3, 4]));

        assert_eq!(
            helper_render("{{ for number in numbers }}{% number %}{{ endfor }}", store),
            "1234"
        );
    }

    #[test]
    fn test_for_absent_container_is_empty() {
        assert_eq!(
            helper_render("{{ for a in missing }}x{{ endfor }}", Store::new()),
            ""
        );
    }

    #[test]
    fn test_for_non_iterable() {
        let template = compile("{{ for a in b }}x{{ endfor }}").unwrap();
        let mut store = Store::new().with_must("b", "xyz");
        let error = Renderer::new(&template, &mut store, Filter::default())
            .render()
            .unwrap_err();

        assert_eq!(error.kind(), &ErrorKind::Type { identifier: "b".into() });
    }

    #[test]
    fn test_for_binding_persists() {
        let template = compile("{{ for n in ns }}{% n %}{{ endfor }}").unwrap();
        let mut store = Store::new().with_must("ns", json!([1, 2, 3]));
        Renderer::new(&template, &mut store, Filter::default())
            .render()
            .unwrap();

        assert_eq!(store.get("n"), Some(&json!(3)));
    }

    #[test]
    fn test_if_branches() {
        let source = "{{ if a == \"x\" }}yes{{ else }}no{{ endif }}";

        assert_eq!(
            helper_render(source, Store::new().with_must("a", "x")),
            "yes"
        );
        assert_eq!(
            helper_render(source, Store::new().with_must("a", "y")),
            "no"
        );
    }

    #[test]
    fn test_if_by_identifier() {
        let source = "{{ if a == b }}a==b{{ else }}a!=b{{ endif }}";

        assert_eq!(
            helper_render(source, Store::new().with_must("a", "abc").with_must("b", "abc")),
            "a==b"
        );
        assert_eq!(
            helper_render(source, Store::new().with_must("a", "abc").with_must("b", "xyz")),
            "a!=b"
        );
    }

    #[test]
    fn test_if_missing_operand_is_empty() {
        assert_eq!(
            helper_render("{{ if a == b }}yes{{ else }}no{{ endif }}", Store::new()),
            ""
        );
    }

    #[test]
    fn test_if_number_coerces_left() {
        let store = Store::new().with_must("count", "3");

        assert_eq!(
            helper_render("{{ if count >= 2 }}many{{ endif }}", store),
            "many"
        );
    }

    #[test]
    fn test_nested_blocks() {
        let source = "{{ for row in rows }}{{ if row != \"skip\" }}{% row %};{{ endif }}{{ endfor }}";
        let store = Store::new().with_must("rows", json!(["a", "skip", "b"]));

        assert_eq!(helper_render(source, store), "a;b;");
    }

    fn helper_render(source: &str, mut store: Store) -> String {
        let template = compile(source).unwrap();

        Renderer::new(&template, &mut store, Filter::default())
            .render()
            .unwrap()
    }
}
