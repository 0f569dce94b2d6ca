mod escape;
mod local_name;
mod tag;
mod text_type;

pub(crate) use self::escape::{escape_body_text, escape_double_quotes_only};
pub use self::local_name::LocalName;
pub use self::tag::{is_void_element, text_type_for_start_tag};
pub use self::text_type::TextType;

#[inline]
pub(crate) fn is_html_whitespace(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C')
}
