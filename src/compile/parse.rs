use super::{
    grammar::Fragment,
    tree::{Action, ForLoop, IfElse, Program},
};
use crate::{
    log::{Error, ErrorKind, INVALID_SYNTAX, UNCLOSED_BLOCK, UNEXPECTED_BLOCK},
    region::Region,
};
use std::{iter::Peekable, vec::IntoIter};

/// Maximum nesting depth of block directives.
const MAX_DEPTH: usize = 64;

/// Provides methods to read a sequence of [`Fragment`] instances in order.
struct Cursor {
    fragments: Peekable<IntoIter<Fragment>>,
}

impl Cursor {
    fn new(fragments: Vec<Fragment>) -> Self {
        Self {
            fragments: fragments.into_iter().peekable(),
        }
    }

    /// Return the next [`Fragment`] without consuming it.
    fn peek(&mut self) -> Option<&Fragment> {
        self.fragments.peek()
    }

    /// Return and consume the next [`Fragment`].
    fn take(&mut self) -> Option<Fragment> {
        self.fragments.next()
    }
}

/// The block that a [`Program`] under construction belongs to.
///
/// Determines which closing markers are legal, and where the blame lands
/// when the fragments run out early.
enum Enclosing {
    /// The top level of a template.
    Root,
    /// A loop body; the region locates the opening directive.
    For { region: Region },
    /// A conditional branch; the region locates the opening directive.
    If { region: Region },
}

/// Assemble a flat sequence of [`Fragment`] instances into a [`Program`]
/// tree.
///
/// # Errors
///
/// Returns an [`Error`] of kind [`Structure`][`ErrorKind::Structure`] when
/// a closing marker has no matching opener, an opener is never closed, or
/// blocks nest beyond [`MAX_DEPTH`].
pub fn build_tree(fragments: Vec<Fragment>, source: &str) -> Result<Program, Error> {
    let mut cursor = Cursor::new(fragments);

    build(&mut cursor, source, Enclosing::Root, 0)
}

/// Build one [`Program`], stopping at the closing marker of the enclosing
/// block.
///
/// An `endfor` closing the enclosing loop is consumed here, but `else`
/// and `endif` are left for the caller to pair with their conditional.
fn build(
    cursor: &mut Cursor,
    source: &str,
    enclosing: Enclosing,
    depth: usize,
) -> Result<Program, Error> {
    let mut actions = Vec::new();

    loop {
        match cursor.peek() {
            None => {
                return match enclosing {
                    Enclosing::Root => Ok(Program { actions }),
                    Enclosing::For { region } => Err(unclosed(source, region, "for")),
                    Enclosing::If { region } => Err(unclosed(source, region, "if")),
                }
            }
            Some(Fragment::Else { .. } | Fragment::EndIf { .. })
                if matches!(enclosing, Enclosing::If { .. }) =>
            {
                return Ok(Program { actions });
            }
            Some(Fragment::EndFor { .. }) if matches!(enclosing, Enclosing::For { .. }) => {
                cursor.take();

                return Ok(Program { actions });
            }
            Some(_) => {}
        }

        let fragment = cursor.take().expect("peeked fragment is still present");
        match fragment {
            Fragment::Direct(region) => actions.push(Action::Direct(region)),
            Fragment::Variable(variable) => actions.push(Action::Variable(variable)),
            Fragment::For {
                variable,
                container,
                region,
            } => {
                check_depth(depth, region, "for", source)?;
                let body = build(cursor, source, Enclosing::For { region }, depth + 1)?;

                actions.push(Action::For(ForLoop {
                    variable,
                    container,
                    body,
                    region,
                }));
            }
            Fragment::If {
                left,
                operator,
                right,
                region,
            } => {
                check_depth(depth, region, "if", source)?;
                let then_branch = build(cursor, source, Enclosing::If { region }, depth + 1)?;
                let else_branch = match cursor.peek() {
                    Some(Fragment::Else { .. }) => {
                        cursor.take();

                        Some(build(cursor, source, Enclosing::If { region }, depth + 1)?)
                    }
                    _ => None,
                };

                match cursor.take() {
                    Some(Fragment::EndIf { .. }) => {}
                    Some(Fragment::Else { region: second }) => {
                        return Err(Error::build(
                            ErrorKind::Structure {
                                offset: second.begin,
                                block: "else",
                            },
                            UNEXPECTED_BLOCK,
                        )
                        .with_pointer(source, second)
                        .with_help("this conditional already has an `else` branch"));
                    }
                    _ => unreachable!("nested build exits at `else` or `endif`"),
                }

                actions.push(Action::If(IfElse {
                    left,
                    operator,
                    right,
                    then_branch,
                    else_branch,
                    region,
                }));
            }
            Fragment::Else { region } => {
                return Err(unexpected(source, region, "else")
                    .with_help("an `else` must appear inside an `if` block"));
            }
            Fragment::EndFor { region } => {
                return Err(unexpected(source, region, "endfor")
                    .with_help("an `endfor` must close a matching `for`"));
            }
            Fragment::EndIf { region } => {
                return Err(unexpected(source, region, "endif")
                    .with_help("an `endif` must close a matching `if`"));
            }
        }
    }
}

/// Return an [`Error`] describing a block that was never closed.
fn unclosed(source: &str, region: Region, block: &'static str) -> Error {
    Error::build(
        ErrorKind::Structure {
            offset: region.begin,
            block,
        },
        UNCLOSED_BLOCK,
    )
    .with_pointer(source, region)
    .with_help(format!("this `{block}` block is missing its `end{block}`"))
}

/// Return an [`Error`] describing a closing marker with no opener.
fn unexpected(source: &str, region: Region, block: &'static str) -> Error {
    Error::build(
        ErrorKind::Structure {
            offset: region.begin,
            block,
        },
        UNEXPECTED_BLOCK,
    )
    .with_pointer(source, region)
}

/// Fail when block directives nest beyond [`MAX_DEPTH`].
fn check_depth(depth: usize, region: Region, block: &'static str, source: &str) -> Result<(), Error> {
    if depth < MAX_DEPTH {
        return Ok(());
    }

    Err(Error::build(
        ErrorKind::Structure {
            offset: region.begin,
            block,
        },
        INVALID_SYNTAX,
    )
    .with_pointer(source, region)
    .with_help(format!("blocks may nest at most {MAX_DEPTH} levels deep")))
}

#[cfg(test)]
mod tests {
    use super::{build_tree, MAX_DEPTH};
    use crate::{
        compile::{
            grammar::match_fragments,
            lex::tokenize,
            tree::{Action, ForLoop, Identifier, IfElse, Operand, Program, Variable},
            Comparator,
        },
        log::{Error, ErrorKind},
        region::Region,
    };

    #[test]
    fn test_build_flat() {
        let expect = Program {
            actions: vec![
                Action::Direct(Region::new(0..1)),
                Action::Variable(Variable {
                    path: Identifier {
                        region: Region::new(4..5),
                    },
                    filter: None,
                }),
                Action::Direct(Region::new(8..9)),
            ],
        };

        assert_eq!(helper_build("a{% b %}c"), Ok(expect));
    }

    #[test]
    fn test_build_for() {
        let expect = Program {
            actions: vec![Action::For(ForLoop {
                variable: Identifier {
                    region: Region::new(7..8),
                },
                container: Identifier {
                    region: Region::new(12..17),
                },
                body: Program {
                    actions: vec![Action::Direct(Region::new(20..21))],
                },
                region: Region::new(0..20),
            })],
        };

        assert_eq!(helper_build("{{ for x in items }}X{{ endfor }}"), Ok(expect));
    }

    #[test]
    fn test_build_if_else() {
        let expect = Program {
            actions: vec![Action::If(IfElse {
                left: Identifier {
                    region: Region::new(6..7),
                },
                operator: Comparator::Equal,
                right: Operand::Identifier(Identifier {
                    region: Region::new(11..12),
                }),
                then_branch: Program {
                    actions: vec![Action::Direct(Region::new(15..16))],
                },
                else_branch: Some(Program {
                    actions: vec![Action::Direct(Region::new(26..27))],
                }),
                region: Region::new(0..15),
            })],
        };

        assert_eq!(
            helper_build("{{ if a == b }}T{{ else }}F{{ endif }}"),
            Ok(expect)
        );
    }

    #[test]
    fn test_unexpected_endfor() {
        let error = helper_build("{{ endfor }}").unwrap_err();

        assert_eq!(
            error.kind(),
            &ErrorKind::Structure {
                offset: 0,
                block: "endfor"
            }
        );
    }

    #[test]
    fn test_unclosed_for() {
        let error = helper_build("{{ for a in b }}x").unwrap_err();

        assert_eq!(
            error.kind(),
            &ErrorKind::Structure {
                offset: 0,
                block: "for"
            }
        );
    }

    #[test]
    fn test_mismatched_close() {
        let error = helper_build("{{ for a in b }}{{ endif }}").unwrap_err();

        assert_eq!(
            error.kind(),
            &ErrorKind::Structure {
                offset: 16,
                block: "endif"
            }
        );
    }

    #[test]
    fn test_double_else() {
        let error =
            helper_build("{{ if a == b }}{{ else }}{{ else }}{{ endif }}").unwrap_err();

        assert_eq!(
            error.kind(),
            &ErrorKind::Structure {
                offset: 25,
                block: "else"
            }
        );
    }

    #[test]
    fn test_depth_limit() {
        let mut within = String::new();
        for _ in 0..MAX_DEPTH {
            within.push_str("{{ for a in b }}");
        }
        for _ in 0..MAX_DEPTH {
            within.push_str("{{ endfor }}");
        }
        assert!(helper_build(&within).is_ok());

        let mut beyond = String::new();
        for _ in 0..=MAX_DEPTH {
            beyond.push_str("{{ for a in b }}");
        }
        for _ in 0..=MAX_DEPTH {
            beyond.push_str("{{ endfor }}");
        }
        assert!(helper_build(&beyond).is_err());
    }

    fn helper_build(source: &str) -> Result<Program, Error> {
        let tokens = tokenize(source).unwrap();
        let fragments = match_fragments(&tokens, source).unwrap();

        build_tree(fragments, source)
    }
}
