use super::{
    lex::token::Token,
    tree::{Identifier, Operand, Variable},
    Comparator, Keyword,
};
use crate::{
    log::{Error, ErrorKind, INVALID_SEQUENCE},
    region::Region,
};

/// A flat directive recognized from a run of tokens.
///
/// Fragments carry no nesting; pairing openers such as [`Fragment::For`]
/// with their closers is the tree builder's job.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Literal text, emitted verbatim.
    Direct(Region),
    /// An output expression with an optional filter.
    Variable(Variable),
    /// Opens a loop block.
    For {
        variable: Identifier,
        container: Identifier,
        region: Region,
    },
    /// Opens a conditional block.
    If {
        left: Identifier,
        operator: Comparator,
        right: Operand,
        region: Region,
    },
    /// Divides a conditional block.
    Else { region: Region },
    /// Closes a loop block.
    EndFor { region: Region },
    /// Closes a conditional block.
    EndIf { region: Region },
}

/// A single expected token within a [`Rule`] sequence.
#[derive(Debug, PartialEq)]
enum Expect {
    Direct,
    CmdOpen,
    CmdClose,
    VarOpen,
    VarClose,
    Identifier,
    Filter,
    Comparator,
    /// Any of identifier, string or number.
    Operand,
    Keyword(Keyword),
}

impl Expect {
    /// Return true if the given [`Token`] satisfies this expectation.
    fn matches(&self, token: &Token) -> bool {
        matches!(
            (self, token),
            (Expect::Direct, Token::Direct)
                | (Expect::CmdOpen, Token::CmdOpen)
                | (Expect::CmdClose, Token::CmdClose)
                | (Expect::VarOpen, Token::VarOpen)
                | (Expect::VarClose, Token::VarClose)
                | (Expect::Identifier, Token::Identifier)
                | (Expect::Filter, Token::Filter)
                | (Expect::Comparator, Token::Comparator(_))
                | (
                    Expect::Operand,
                    Token::Identifier | Token::String | Token::Number
                )
        ) || matches!((self, token), (Expect::Keyword(expect), Token::Keyword(found)) if expect == found)
    }
}

/// Identifies which [`Fragment`] a [`Rule`] produces.
#[derive(Debug, Clone, Copy)]
enum FragmentKind {
    Direct,
    FilteredVariable,
    Variable,
    For,
    If,
    Else,
    EndFor,
    EndIf,
}

/// Maps a token sequence to a [`Fragment`].
struct Rule {
    kind: FragmentKind,
    sequence: &'static [Expect],
}

/// The complete directive grammar, in priority order.
///
/// The first rule whose sequence matches wins, so the filtered variable
/// rule must precede the bare variable rule.
const RULES: &[Rule] = &[
    Rule {
        kind: FragmentKind::Direct,
        sequence: &[Expect::Direct],
    },
    Rule {
        kind: FragmentKind::FilteredVariable,
        sequence: &[
            Expect::VarOpen,
            Expect::Identifier,
            Expect::Filter,
            Expect::VarClose,
        ],
    },
    Rule {
        kind: FragmentKind::Variable,
        sequence: &[Expect::VarOpen, Expect::Identifier, Expect::VarClose],
    },
    Rule {
        kind: FragmentKind::For,
        sequence: &[
            Expect::CmdOpen,
            Expect::Keyword(Keyword::For),
            Expect::Identifier,
            Expect::Keyword(Keyword::In),
            Expect::Identifier,
            Expect::CmdClose,
        ],
    },
    Rule {
        kind: FragmentKind::If,
        sequence: &[
            Expect::CmdOpen,
            Expect::Keyword(Keyword::If),
            Expect::Identifier,
            Expect::Comparator,
            Expect::Operand,
            Expect::CmdClose,
        ],
    },
    Rule {
        kind: FragmentKind::Else,
        sequence: &[
            Expect::CmdOpen,
            Expect::Keyword(Keyword::Else),
            Expect::CmdClose,
        ],
    },
    Rule {
        kind: FragmentKind::EndFor,
        sequence: &[
            Expect::CmdOpen,
            Expect::Keyword(Keyword::EndFor),
            Expect::CmdClose,
        ],
    },
    Rule {
        kind: FragmentKind::EndIf,
        sequence: &[
            Expect::CmdOpen,
            Expect::Keyword(Keyword::EndIf),
            Expect::CmdClose,
        ],
    },
];

/// Convert a run of tokens to a sequence of [`Fragment`] instances.
///
/// # Errors
///
/// Returns an [`Error`] of kind [`Grammar`][`ErrorKind::Grammar`] when no
/// rule in [`RULES`] matches at some token; matching never skips tokens to
/// resynchronize.
pub fn match_fragments(
    tokens: &[(Token, Region)],
    source: &str,
) -> Result<Vec<Fragment>, Error> {
    let mut fragments = Vec::new();
    let mut index = 0;

    while index < tokens.len() {
        let rule = RULES
            .iter()
            .find(|rule| matches_at(rule, &tokens[index..]))
            .ok_or_else(|| {
                let (token, region) = &tokens[index];

                Error::build(
                    ErrorKind::Grammar {
                        offset: region.begin,
                    },
                    INVALID_SEQUENCE,
                )
                .with_pointer(source, *region)
                .with_help(format!("no directive begins with {token} here"))
            })?;

        let matched = &tokens[index..index + rule.sequence.len()];
        fragments.push(to_fragment(rule.kind, matched, source)?);
        index += rule.sequence.len();
    }

    Ok(fragments)
}

/// Return true if the [`Rule`] matches the beginning of the given tokens.
fn matches_at(rule: &Rule, tokens: &[(Token, Region)]) -> bool {
    rule.sequence.len() <= tokens.len()
        && rule
            .sequence
            .iter()
            .zip(tokens)
            .all(|(expect, (token, _))| expect.matches(token))
}

/// Convert a matched token slice to the [`Fragment`] its rule describes.
fn to_fragment(
    kind: FragmentKind,
    matched: &[(Token, Region)],
    source: &str,
) -> Result<Fragment, Error> {
    let fragment = match kind {
        FragmentKind::Direct => Fragment::Direct(matched[0].1),
        FragmentKind::Variable => Fragment::Variable(Variable {
            path: Identifier {
                region: matched[1].1,
            },
            filter: None,
        }),
        FragmentKind::FilteredVariable => Fragment::Variable(Variable {
            path: Identifier {
                region: matched[1].1,
            },
            filter: Some(Identifier {
                // Step past the `>` sigil.
                region: Region::new(matched[2].1.begin + 1..matched[2].1.end),
            }),
        }),
        FragmentKind::For => Fragment::For {
            variable: Identifier {
                region: matched[2].1,
            },
            container: Identifier {
                region: matched[4].1,
            },
            region: matched[0].1.combine(matched[5].1),
        },
        FragmentKind::If => {
            let operator = match matched[3].0 {
                Token::Comparator(comparator) => comparator,
                _ => unreachable!("if rule expects a comparator"),
            };

            Fragment::If {
                left: Identifier {
                    region: matched[2].1,
                },
                operator,
                right: to_operand(&matched[4], source)?,
                region: matched[0].1.combine(matched[5].1),
            }
        }
        FragmentKind::Else => Fragment::Else {
            region: matched[0].1.combine(matched[2].1),
        },
        FragmentKind::EndFor => Fragment::EndFor {
            region: matched[0].1.combine(matched[2].1),
        },
        FragmentKind::EndIf => Fragment::EndIf {
            region: matched[0].1.combine(matched[2].1),
        },
    };

    Ok(fragment)
}

/// Convert an operand token to an [`Operand`].
///
/// String literals are unescaped here, so the renderer compares against
/// the intended text.
fn to_operand(token: &(Token, Region), source: &str) -> Result<Operand, Error> {
    let (token, region) = token;

    let operand = match token {
        Token::Identifier => Operand::Identifier(Identifier { region: *region }),
        Token::String => {
            // Trim the surrounding quotes.
            let inner = Region::new(region.begin + 1..region.end - 1);

            Operand::String(unescape(inner.literal(source)))
        }
        Token::Number => {
            let number = region.literal(source).parse::<f64>().map_err(|_| {
                Error::build(
                    ErrorKind::Grammar {
                        offset: region.begin,
                    },
                    INVALID_SEQUENCE,
                )
                .with_pointer(source, *region)
                .with_help("this number cannot be represented")
            })?;

            Operand::Number(number)
        }
        _ => unreachable!("if rule expects an operand"),
    };

    Ok(operand)
}

/// Resolve the `\"` and `\\` escapes within a string literal.
///
/// A backslash before any other character is kept as-is.
fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(char) = chars.next() {
        if char != '\\' {
            result.push(char);
            continue;
        }
        match chars.next() {
            Some(next @ ('\\' | '"')) => result.push(next),
            Some(next) => {
                result.push('\\');
                result.push(next);
            }
            None => result.push('\\'),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::{match_fragments, Fragment};
    use crate::{
        compile::{
            lex::tokenize,
            tree::{Identifier, Operand, Variable},
            Comparator,
        },
        log::ErrorKind,
        region::Region,
    };

    #[test]
    fn test_match_variable() {
        let expect = Fragment::Variable(Variable {
            path: Identifier {
                region: Region::new(3..7),
            },
            filter: None,
        });

        assert_eq!(helper_match("{% name %}"), vec![expect]);
    }

    #[test]
    fn test_match_filtered_variable() {
        let expect = Fragment::Variable(Variable {
            path: Identifier {
                region: Region::new(3..4),
            },
            filter: Some(Identifier {
                region: Region::new(5..9),
            }),
        });

        assert_eq!(helper_match("{% a>trim %}"), vec![expect]);
    }

    #[test]
    fn test_match_for() {
        let expect = Fragment::For {
            variable: Identifier {
                region: Region::new(7..13),
            },
            container: Identifier {
                region: Region::new(17..24),
            },
            region: Region::new(0..27),
        };

        assert_eq!(helper_match("{{ for number in numbers }}"), vec![expect]);
    }

    #[test]
    fn test_match_if_with_string() {
        let expect = Fragment::If {
            left: Identifier {
                region: Region::new(6..7),
            },
            operator: Comparator::Equal,
            right: Operand::String("a\"\\a".into()),
            region: Region::new(0..22),
        };

        assert_eq!(helper_match(r#"{{ if a == "a\"\\a" }}"#), vec![expect]);
    }

    #[test]
    fn test_match_if_with_number() {
        let expect = Fragment::If {
            left: Identifier {
                region: Region::new(6..7),
            },
            operator: Comparator::GreaterOrEqual,
            right: Operand::Number(42.5),
            region: Region::new(0..18),
        };

        assert_eq!(helper_match("{{ if a >= 42.5 }}"), vec![expect]);
    }

    #[test]
    fn test_match_block_markers() {
        let expect = vec![
            Fragment::Else {
                region: Region::new(0..10),
            },
            Fragment::EndIf {
                region: Region::new(10..21),
            },
            Fragment::EndFor {
                region: Region::new(21..33),
            },
        ];

        assert_eq!(helper_match("{{ else }}{{ endif }}{{ endfor }}"), expect);
    }

    #[test]
    fn test_keyword_misuse() {
        let tokens = tokenize("{{ for for }}").unwrap();
        let error = match_fragments(&tokens, "{{ for for }}").unwrap_err();

        assert_eq!(error.kind(), &ErrorKind::Grammar { offset: 0 });
    }

    #[test]
    fn test_unterminated_directive() {
        let tokens = tokenize("{% variable").unwrap();
        let error = match_fragments(&tokens, "{% variable").unwrap_err();

        assert_eq!(error.kind(), &ErrorKind::Grammar { offset: 0 });
    }

    fn helper_match(source: &str) -> Vec<Fragment> {
        let tokens = tokenize(source).unwrap();

        match_fragments(&tokens, source).unwrap()
    }
}
