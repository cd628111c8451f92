use std::{borrow::Cow, fmt::Display};

/// Output filters applied to the text form of a value.
///
/// Every variable directive runs exactly one filter; directives without
/// a `>name` suffix use the engine default, which is [`Filter::Raw`]
/// unless configured otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Filter {
    /// Pass text through unchanged.
    #[default]
    Raw,
    /// Drop leading and trailing whitespace.
    Trim,
    /// Escape for an HTML 4 attribute value.
    Attr4,
    /// Escape for an HTML 5 attribute value.
    Attr5,
    /// Escape for HTML 4 text content.
    Html4,
    /// Escape for HTML 5 text content.
    Html5,
}

impl Filter {
    /// Return the [`Filter`] known by the given name, if any.
    pub fn from_name(name: &str) -> Option<Self> {
        let filter = match name {
            "raw" => Filter::Raw,
            "trim" => Filter::Trim,
            "attr4" => Filter::Attr4,
            "attr5" => Filter::Attr5,
            "html4" => Filter::Html4,
            "html5" => Filter::Html5,
            _ => return None,
        };

        Some(filter)
    }

    /// Apply the filter to the given text.
    ///
    /// The attribute filters escape quotes; the text content filters
    /// leave them alone and only differ from each other in name.
    pub fn apply<'text>(&self, text: &'text str) -> Cow<'text, str> {
        match self {
            Filter::Raw => Cow::Borrowed(text),
            Filter::Trim => Cow::Borrowed(text.trim()),
            Filter::Attr4 => escape_attribute(text, "&#039;"),
            Filter::Attr5 => escape_attribute(text, "&apos;"),
            Filter::Html4 | Filter::Html5 => escape_text(text),
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Filter::Raw => "raw",
            Filter::Trim => "trim",
            Filter::Attr4 => "attr4",
            Filter::Attr5 => "attr5",
            Filter::Html4 => "html4",
            Filter::Html5 => "html5",
        };

        write!(f, "{name}")
    }
}

fn escape_attribute<'text>(text: &'text str, apostrophe: &str) -> Cow<'text, str> {
    if !text.contains(&['&', '<', '>', '"', '\''][..]) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len());
    for char in text.chars() {
        match char {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str(apostrophe),
            other => escaped.push(other),
        }
    }

    Cow::Owned(escaped)
}

fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(&['&', '<', '>'][..]) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len());
    for char in text.chars() {
        match char {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }

    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::Filter;

    #[test]
    fn test_from_name() {
        assert_eq!(Filter::from_name("trim"), Some(Filter::Trim));
        assert_eq!(Filter::from_name("attr5"), Some(Filter::Attr5));
        assert_eq!(Filter::from_name("shout"), None);
    }

    #[test]
    fn test_raw_and_trim() {
        assert_eq!(Filter::Raw.apply("  a  "), "  a  ");
        assert_eq!(Filter::Trim.apply("  a  "), "a");
    }

    #[test]
    fn test_attribute_escapes() {
        assert_eq!(
            Filter::Attr4.apply(r#"<a href="x">'b'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#039;b&#039;&lt;/a&gt;"
        );
        assert_eq!(Filter::Attr5.apply("it's"), "it&apos;s");
    }

    #[test]
    fn test_text_escapes_leave_quotes() {
        assert_eq!(Filter::Html4.apply(r#"a < "b" & 'c'"#), r#"a &lt; "b" &amp; 'c'"#);
        assert_eq!(Filter::Html5.apply("x > y"), "x &gt; y");
    }
}
