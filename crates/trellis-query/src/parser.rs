//! Selector parser
//!
//! Hand-rolled scanner and parser for the widget selector grammar. The
//! grammar is a small closed subset of CSS: type/id/class/universal tokens,
//! descendant (whitespace) and child (`>`) combinators, and comma-separated
//! alternatives. Errors carry the byte offset of the offending token.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::QueryError;
use crate::selector::{
    Combinator, CompoundSelector, SelectorChain, SelectorGroup, SelectorStep, SimpleSelector,
};

/// Parse selector text into a selector group
pub fn parse_selector(input: &str) -> Result<SelectorGroup, QueryError> {
    let tokens = tokenize(input)?;
    let mut chains = Vec::new();
    let mut start = 0;
    for (i, (token, pos)) in tokens.iter().enumerate() {
        if matches!(token, Token::Comma) {
            chains.push(parse_chain(input, &tokens[start..i], *pos)?);
            start = i + 1;
        }
    }
    chains.push(parse_chain(input, &tokens[start..], input.len())?);
    Ok(SelectorGroup { chains })
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Type(Box<str>),
    Id(Box<str>),
    Class(Box<str>),
    Universal,
    Child,
    Space,
    Comma,
}

fn syntax_error(input: &str, position: usize, message: impl Into<String>) -> QueryError {
    QueryError::InvalidSelector {
        selector: input.to_string(),
        position,
        message: message.into(),
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '-'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn take_ident(chars: &mut Peekable<CharIndices<'_>>) -> Box<str> {
    let mut name = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        name.push(c);
        chars.next();
    }
    name.into_boxed_str()
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, QueryError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();
    while let Some(&(pos, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                while chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
                    chars.next();
                }
                tokens.push((Token::Space, pos));
            }
            '>' => {
                chars.next();
                tokens.push((Token::Child, pos));
            }
            ',' => {
                chars.next();
                tokens.push((Token::Comma, pos));
            }
            '*' => {
                chars.next();
                tokens.push((Token::Universal, pos));
            }
            '#' | '.' => {
                chars.next();
                let name = take_ident(&mut chars);
                if name.is_empty() {
                    let kind = if c == '#' { "id" } else { "class" };
                    return Err(syntax_error(
                        input,
                        pos,
                        format!("expected {kind} name after {c:?}"),
                    ));
                }
                let token = if c == '#' { Token::Id(name) } else { Token::Class(name) };
                tokens.push((token, pos));
            }
            c if is_ident_start(c) => {
                tokens.push((Token::Type(take_ident(&mut chars)), pos));
            }
            _ => return Err(syntax_error(input, pos, format!("unexpected character {c:?}"))),
        }
    }
    Ok(tokens)
}

fn flush(steps: &mut Vec<SelectorStep>, selectors: &mut Vec<SimpleSelector>, combinator: Combinator) {
    steps.push(SelectorStep {
        combinator,
        compound: CompoundSelector {
            selectors: std::mem::take(selectors),
        },
    });
}

/// Consume a pending `>` into a combinator for the compound now starting
fn take_combinator(pending_child: &mut Option<usize>) -> Combinator {
    if pending_child.take().is_some() {
        Combinator::Child
    } else {
        Combinator::Descendant
    }
}

/// Parse one comma alternative; `at` locates the alternative for emptiness
/// errors
fn parse_chain(
    input: &str,
    tokens: &[(Token, usize)],
    at: usize,
) -> Result<SelectorChain, QueryError> {
    let mut steps: Vec<SelectorStep> = Vec::new();
    let mut compound: Vec<SimpleSelector> = Vec::new();
    // Combinator attached to the compound currently being built. The first
    // compound always gets Descendant: the implicit self-inclusive anchor to
    // the query scope.
    let mut combinator = Combinator::Descendant;
    let mut has_id = false;
    let mut pending_child: Option<usize> = None;

    for (token, pos) in tokens {
        match token {
            Token::Space => {
                if !compound.is_empty() {
                    flush(&mut steps, &mut compound, combinator);
                    has_id = false;
                }
            }
            Token::Child => {
                if !compound.is_empty() {
                    flush(&mut steps, &mut compound, combinator);
                    has_id = false;
                }
                if steps.is_empty() {
                    return Err(syntax_error(
                        input,
                        *pos,
                        "selector cannot start with a combinator",
                    ));
                }
                if pending_child.is_some() {
                    return Err(syntax_error(input, *pos, "unexpected combinator '>'"));
                }
                pending_child = Some(*pos);
            }
            Token::Type(name) => {
                if !compound.is_empty() {
                    return Err(syntax_error(
                        input,
                        *pos,
                        format!("type selector {name:?} must open a compound selector"),
                    ));
                }
                combinator = take_combinator(&mut pending_child);
                compound.push(SimpleSelector::Type(name.clone()));
            }
            Token::Universal => {
                if !compound.is_empty() {
                    return Err(syntax_error(input, *pos, "unexpected '*'"));
                }
                combinator = take_combinator(&mut pending_child);
                compound.push(SimpleSelector::Universal);
            }
            Token::Id(name) => {
                if compound.is_empty() {
                    combinator = take_combinator(&mut pending_child);
                }
                if has_id {
                    return Err(syntax_error(
                        input,
                        *pos,
                        "more than one id in a compound selector",
                    ));
                }
                has_id = true;
                compound.push(SimpleSelector::Id(name.clone()));
            }
            Token::Class(name) => {
                if compound.is_empty() {
                    combinator = take_combinator(&mut pending_child);
                }
                compound.push(SimpleSelector::Class(name.clone()));
            }
            // Alternatives are split on commas before chains are parsed.
            Token::Comma => unreachable!(),
        }
    }

    if !compound.is_empty() {
        flush(&mut steps, &mut compound, combinator);
    }
    if let Some(pos) = pending_child {
        return Err(syntax_error(
            input,
            pos,
            "selector cannot end with a combinator",
        ));
    }
    if steps.is_empty() {
        return Err(syntax_error(input, at, "empty selector"));
    }
    Ok(SelectorChain { steps })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(group: &SelectorGroup, i: usize) -> &SelectorChain {
        &group.chains[i]
    }

    fn step(group: &SelectorGroup, chain_i: usize, step_i: usize) -> &SelectorStep {
        &group.chains[chain_i].steps[step_i]
    }

    #[test]
    fn test_single_type() {
        let group = parse_selector("View").unwrap();
        assert_eq!(group.chains.len(), 1);
        assert_eq!(chain(&group, 0).steps.len(), 1);
        assert_eq!(step(&group, 0, 0).combinator, Combinator::Descendant);
        assert_eq!(
            step(&group, 0, 0).compound.selectors,
            vec![SimpleSelector::Type("View".into())]
        );
    }

    #[test]
    fn test_compound_tokens_concatenate() {
        let group = parse_selector("View#main.float.transient").unwrap();
        assert_eq!(
            step(&group, 0, 0).compound.selectors,
            vec![
                SimpleSelector::Type("View".into()),
                SimpleSelector::Id("main".into()),
                SimpleSelector::Class("float".into()),
                SimpleSelector::Class("transient".into()),
            ]
        );
    }

    #[test]
    fn test_universal_with_classes() {
        let group = parse_selector("*.float").unwrap();
        assert_eq!(
            step(&group, 0, 0).compound.selectors,
            vec![
                SimpleSelector::Universal,
                SimpleSelector::Class("float".into()),
            ]
        );
    }

    #[test]
    fn test_descendant_and_child_combinators() {
        let group = parse_selector("App > View#main .float").unwrap();
        let steps = &chain(&group, 0).steps;
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].combinator, Combinator::Descendant);
        assert_eq!(steps[1].combinator, Combinator::Child);
        assert_eq!(steps[2].combinator, Combinator::Descendant);
    }

    #[test]
    fn test_child_combinator_whitespace_insignificant() {
        for selector in ["A>B", "A > B", "A >B", "A> B"] {
            let group = parse_selector(selector).unwrap();
            let steps = &chain(&group, 0).steps;
            assert_eq!(steps.len(), 2, "selector {selector:?}");
            assert_eq!(steps[1].combinator, Combinator::Child, "selector {selector:?}");
        }
    }

    #[test]
    fn test_leading_and_trailing_whitespace_ignored() {
        let group = parse_selector("  App > View#main .float ").unwrap();
        assert_eq!(chain(&group, 0).steps.len(), 3);
    }

    #[test]
    fn test_comma_alternatives() {
        for selector in ["#a,#b", "#a, #b", "#a , #b"] {
            let group = parse_selector(selector).unwrap();
            assert_eq!(group.chains.len(), 2, "selector {selector:?}");
        }
    }

    #[test]
    fn test_class_with_leading_hyphen() {
        let group = parse_selector(".-subview").unwrap();
        assert_eq!(
            step(&group, 0, 0).compound.selectors,
            vec![SimpleSelector::Class("-subview".into())]
        );
    }

    fn position_of(err: QueryError) -> usize {
        match err {
            QueryError::InvalidSelector { position, .. } => position,
            other => panic!("expected InvalidSelector, got {other:?}"),
        }
    }

    #[test]
    fn test_error_empty_input() {
        assert_eq!(position_of(parse_selector("").unwrap_err()), 0);
        assert_eq!(position_of(parse_selector("   ").unwrap_err()), 3);
    }

    #[test]
    fn test_error_empty_alternative() {
        assert_eq!(position_of(parse_selector("#a,,#b").unwrap_err()), 3);
        assert!(parse_selector("#a,").is_err());
        assert!(parse_selector(",#a").is_err());
    }

    #[test]
    fn test_error_dangling_combinator() {
        assert_eq!(position_of(parse_selector("A >").unwrap_err()), 2);
        assert!(parse_selector("> A").is_err());
        assert!(parse_selector("A > > B").is_err());
    }

    #[test]
    fn test_error_bare_hash_and_dot() {
        assert_eq!(position_of(parse_selector("A #").unwrap_err()), 2);
        assert!(parse_selector(".").is_err());
        assert!(parse_selector("#.x").is_err());
    }

    #[test]
    fn test_error_type_not_first_in_compound() {
        assert!(parse_selector(".float View").is_ok());
        assert!(parse_selector(".floatView").is_ok()); // one class token
        assert!(parse_selector("#main View").is_ok());
        // adjacency puts the type after another constraint
        assert!(parse_selector("*View").is_err());
    }

    #[test]
    fn test_error_duplicate_id_in_compound() {
        assert!(parse_selector("#a#b").is_err());
        assert!(parse_selector("#a #b").is_ok()); // separate compounds
    }

    #[test]
    fn test_error_unexpected_character() {
        assert_eq!(position_of(parse_selector("A | B").unwrap_err()), 2);
        assert!(parse_selector("A[x]").is_err());
        assert!(parse_selector("A::before").is_err());
    }

    #[test]
    fn test_error_reports_selector_text() {
        match parse_selector("A !").unwrap_err() {
            QueryError::InvalidSelector { selector, position, .. } => {
                assert_eq!(selector, "A !");
                assert_eq!(position, 2);
            }
            other => panic!("expected InvalidSelector, got {other:?}"),
        }
    }
}
