use super::ast::{
    AttributeExpr, AttributeExprOperand, Combinator, CompoundSelector, NonAttributeExpr, Predicate,
};
use super::SelectorError;
use cssparser::{ParseError, Parser as CssParser, ParserInput, Token};
use std::str::FromStr;

type ParseResult<'i, T> = Result<T, ParseError<'i, SelectorError>>;

/// Parsed CSS selector.
///
/// Supported syntax: type selectors and `*`, `.class`, `#id`, attribute
/// selectors (`[attr]`, `[attr=value]`, `[attr~=value]`, `[attr|=value]`,
/// `[attr^=value]`, `[attr$=value]`, `[attr*=value]`, optionally followed by
/// the `i` or `s` case sensitivity flag), descendant (` `) and child (`>`)
/// combinators and selector lists (`,`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector(Vec<Vec<CompoundSelector>>);

impl Selector {
    #[inline]
    pub(crate) fn complex_selectors(&self) -> &[Vec<CompoundSelector>] {
        &self.0
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(selector: &str) -> Result<Self, Self::Err> {
        let mut input = ParserInput::new(selector);
        let mut parser = CssParser::new(&mut input);

        parser
            .parse_comma_separated(parse_complex_selector)
            .map(Selector)
            .map_err(SelectorError::from)
    }
}

fn parse_complex_selector<'i>(
    parser: &mut CssParser<'i, '_>,
) -> ParseResult<'i, Vec<CompoundSelector>> {
    let mut compounds = Vec::new();

    parser.skip_whitespace();

    loop {
        let predicate = parse_compound_selector(parser)?;

        if predicate.is_empty() {
            let err = if compounds.is_empty() {
                SelectorError::EmptySelector
            } else {
                SelectorError::DanglingCombinator
            };

            return Err(parser.new_custom_error(err));
        }

        let combinator = parse_combinator(parser)?;
        let is_last = combinator.is_none();

        compounds.push(CompoundSelector {
            predicate,
            combinator,
        });

        if is_last {
            return Ok(compounds);
        }
    }
}

/// Consumes the combinator that follows a compound selector. Returns `None`
/// at the end of the selector.
fn parse_combinator<'i>(parser: &mut CssParser<'i, '_>) -> ParseResult<'i, Option<Combinator>> {
    let mut combinator = None;

    loop {
        let state = parser.state();

        match parser.next_including_whitespace().cloned() {
            Ok(Token::WhiteSpace(_)) => {
                combinator.get_or_insert(Combinator::Descendant);
            }
            Ok(Token::Delim('>')) if combinator != Some(Combinator::Child) => {
                combinator = Some(Combinator::Child);
            }
            Ok(Token::Delim('>')) => {
                return Err(parser.new_custom_error(SelectorError::DanglingCombinator));
            }
            Ok(Token::Delim(c @ ('+' | '~'))) => {
                return Err(parser.new_custom_error(SelectorError::UnsupportedCombinator(c)));
            }
            Ok(_) if combinator.is_some() => {
                parser.reset(&state);

                return Ok(combinator);
            }
            Ok(token) => return Err(parser.new_unexpected_token_error(token)),
            Err(_) if combinator == Some(Combinator::Child) => {
                return Err(parser.new_custom_error(SelectorError::DanglingCombinator));
            }
            // NOTE: trailing whitespace is not a combinator.
            Err(_) => return Ok(None),
        }
    }
}

fn parse_compound_selector<'i>(parser: &mut CssParser<'i, '_>) -> ParseResult<'i, Predicate> {
    let mut predicate = Predicate::default();

    loop {
        let state = parser.state();
        let is_first = predicate.is_empty();

        let token = match parser.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::Ident(name) if is_first => predicate
                .non_attr_exprs
                .push(NonAttributeExpr::LocalName(name.to_ascii_lowercase())),
            Token::Delim('*') if is_first => {
                predicate.non_attr_exprs.push(NonAttributeExpr::ExplicitAny)
            }
            Token::Delim('|') => {
                return Err(parser.new_custom_error(SelectorError::NamespacedSelector));
            }
            Token::IDHash(id) => predicate.attr_exprs.push(AttributeExpr::Id(id.to_string())),
            Token::Hash(_) => return Err(parser.new_custom_error(SelectorError::InvalidId)),
            Token::Delim('.') => match parser.next_including_whitespace().cloned() {
                Ok(Token::Ident(class)) => predicate
                    .attr_exprs
                    .push(AttributeExpr::Class(class.to_string())),
                _ => return Err(parser.new_custom_error(SelectorError::InvalidClassName)),
            },
            Token::SquareBracketBlock => {
                let expr = parser.parse_nested_block(parse_attribute_selector)?;

                predicate.attr_exprs.push(expr);
            }
            Token::Colon => {
                return Err(parser.new_custom_error(SelectorError::UnsupportedPseudoClassOrElement));
            }
            _ => {
                parser.reset(&state);
                break;
            }
        }
    }

    Ok(predicate)
}

fn parse_attribute_selector<'i>(parser: &mut CssParser<'i, '_>) -> ParseResult<'i, AttributeExpr> {
    let name = match parser.next().cloned() {
        Ok(Token::Ident(name)) => name.to_ascii_lowercase(),
        Ok(Token::Delim('|' | '*')) => {
            return Err(parser.new_custom_error(SelectorError::NamespacedSelector));
        }
        _ => return Err(parser.new_custom_error(SelectorError::MissingAttributeName)),
    };

    type ExprConstructor = fn(AttributeExprOperand) -> AttributeExpr;

    let constructor: ExprConstructor = match parser.next().cloned() {
        Err(_) => return Ok(AttributeExpr::AttributeExists(name)),
        Ok(Token::Delim('=')) => AttributeExpr::AttributeEqual,
        Ok(Token::IncludeMatch) => AttributeExpr::AttributeIncludes,
        Ok(Token::DashMatch) => AttributeExpr::AttributeDashMatch,
        Ok(Token::PrefixMatch) => AttributeExpr::AttributePrefix,
        Ok(Token::SuffixMatch) => AttributeExpr::AttributeSuffix,
        Ok(Token::SubstringMatch) => AttributeExpr::AttributeSubstring,
        Ok(Token::Delim('|')) => {
            return Err(parser.new_custom_error(SelectorError::NamespacedSelector));
        }
        Ok(_) => {
            return Err(parser.new_custom_error(SelectorError::UnexpectedTokenInAttributeSelector))
        }
    };

    let value = match parser.next().cloned() {
        Ok(Token::Ident(value) | Token::QuotedString(value)) => value.to_string(),
        _ => {
            return Err(parser.new_custom_error(SelectorError::UnexpectedTokenInAttributeSelector))
        }
    };

    let case_insensitive = match parser.next().cloned() {
        Err(_) => false,
        Ok(Token::Ident(flag)) if flag.eq_ignore_ascii_case("i") => true,
        Ok(Token::Ident(flag)) if flag.eq_ignore_ascii_case("s") => false,
        Ok(_) => {
            return Err(parser.new_custom_error(SelectorError::UnexpectedTokenInAttributeSelector))
        }
    };

    Ok(constructor(AttributeExprOperand {
        name,
        value,
        case_insensitive,
    }))
}
