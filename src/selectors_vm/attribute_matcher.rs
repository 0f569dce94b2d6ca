use super::compiler::CompiledAttributeExprOperand;
use crate::base::{Bytes, Chunk};
use crate::html::is_html_whitespace;
use crate::parser::AttributeOutline;
use memchr::memchr;
use std::cell::OnceCell;

#[inline]
fn split_by_whitespace(value: &[u8]) -> impl Iterator<Item = &[u8]> {
    value
        .split(|&b| is_html_whitespace(b))
        .filter(|item| !item.is_empty())
}

#[inline]
fn eq_with_case_sensitivity(actual: &[u8], expected: &[u8], case_insensitive: bool) -> bool {
    if case_insensitive {
        actual.eq_ignore_ascii_case(expected)
    } else {
        actual == expected
    }
}

/// Provides attribute checks for the compiled selector expressions.
///
/// Values of the `id` and `class` attributes are looked up once per element,
/// since most of the selectors check them.
pub struct AttributeMatcher<'i> {
    input: &'i Chunk<'i>,
    attributes: &'i [AttributeOutline],
    id: OnceCell<Option<Bytes<'i>>>,
    class: OnceCell<Option<Bytes<'i>>>,
}

impl<'i> AttributeMatcher<'i> {
    #[inline]
    pub fn new(input: &'i Chunk<'i>, attributes: &'i [AttributeOutline]) -> Self {
        AttributeMatcher {
            input,
            attributes,
            id: OnceCell::new(),
            class: OnceCell::new(),
        }
    }

    /// Returns the value of the first attribute with the given lowercase name.
    #[inline]
    fn get_value(&self, lowercased_name: &[u8]) -> Option<Bytes<'i>> {
        self.attributes
            .iter()
            .find(|a| self.input[a.name.start..a.name.end].eq_ignore_ascii_case(lowercased_name))
            .map(|a| self.input.slice(a.value))
    }

    #[inline]
    pub fn has_attribute(&self, lowercased_name: &Bytes<'_>) -> bool {
        self.get_value(lowercased_name).is_some()
    }

    #[inline]
    pub fn has_id(&self, id: &Bytes<'_>) -> bool {
        self.id
            .get_or_init(|| self.get_value(b"id"))
            .as_ref()
            .is_some_and(|actual| **actual == **id)
    }

    #[inline]
    pub fn has_class(&self, class_name: &Bytes<'_>) -> bool {
        self.class
            .get_or_init(|| self.get_value(b"class"))
            .as_ref()
            .is_some_and(|classes| split_by_whitespace(classes).any(|c| c == &**class_name))
    }

    #[inline]
    fn value_matches(
        &self,
        operand: &CompiledAttributeExprOperand,
        matcher: impl Fn(&[u8], &CompiledAttributeExprOperand) -> bool,
    ) -> bool {
        self.get_value(&operand.name)
            .is_some_and(|actual| matcher(&actual[..], operand))
    }

    pub fn attr_eq(&self, operand: &CompiledAttributeExprOperand) -> bool {
        self.value_matches(operand, |actual, operand| {
            eq_with_case_sensitivity(actual, &operand.value, operand.case_insensitive)
        })
    }

    pub fn matches_splitted_by_whitespace(&self, operand: &CompiledAttributeExprOperand) -> bool {
        self.value_matches(operand, |actual, operand| {
            split_by_whitespace(actual)
                .any(|item| eq_with_case_sensitivity(item, &operand.value, operand.case_insensitive))
        })
    }

    pub fn has_dash_matching_attr(&self, operand: &CompiledAttributeExprOperand) -> bool {
        self.value_matches(operand, |actual, operand| {
            let expected = &*operand.value;

            if eq_with_case_sensitivity(actual, expected, operand.case_insensitive) {
                return true;
            }

            actual.len() > expected.len()
                && actual[expected.len()] == b'-'
                && eq_with_case_sensitivity(
                    &actual[..expected.len()],
                    expected,
                    operand.case_insensitive,
                )
        })
    }

    pub fn has_attr_with_prefix(&self, operand: &CompiledAttributeExprOperand) -> bool {
        self.value_matches(operand, |actual, operand| {
            let expected = &*operand.value;

            // NOTE: empty operand never matches.
            !expected.is_empty()
                && actual.len() >= expected.len()
                && eq_with_case_sensitivity(
                    &actual[..expected.len()],
                    expected,
                    operand.case_insensitive,
                )
        })
    }

    pub fn has_attr_with_suffix(&self, operand: &CompiledAttributeExprOperand) -> bool {
        self.value_matches(operand, |actual, operand| {
            let expected = &*operand.value;

            !expected.is_empty()
                && actual.len() >= expected.len()
                && eq_with_case_sensitivity(
                    &actual[actual.len() - expected.len()..],
                    expected,
                    operand.case_insensitive,
                )
        })
    }

    pub fn has_attr_with_substring(&self, operand: &CompiledAttributeExprOperand) -> bool {
        self.value_matches(operand, |actual, operand| {
            let expected = &*operand.value;
            let Some((&first, rest)) = expected.split_first() else {
                return false;
            };

            if operand.case_insensitive {
                return actual
                    .windows(expected.len())
                    .any(|window| window.eq_ignore_ascii_case(expected));
            }

            let mut pos = 0;

            while let Some(offset) = memchr(first, &actual[pos..]) {
                let candidate = pos + offset + 1;

                if actual[candidate..].starts_with(rest) {
                    return true;
                }

                pos = candidate;
            }

            false
        })
    }
}
