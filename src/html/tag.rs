use super::{LocalName, TextType};

const VOID_ELEMENTS: &[&[u8]] = &[
    b"area", b"base", b"basefont", b"bgsound", b"br", b"col", b"embed", b"hr", b"img", b"input",
    b"keygen", b"link", b"meta", b"param", b"source", b"track", b"wbr",
];

#[inline]
pub fn is_void_element(local_name: &LocalName<'_>) -> bool {
    // NOTE: fast path for the most commonly used elements
    if local_name.is_one_of(&[b"div", b"a", b"span", b"li", b"p"]) {
        return false;
    }

    local_name.is_one_of(VOID_ELEMENTS)
}

/// Text type the tokenizer switches to after the start tag of the element.
pub fn text_type_for_start_tag(local_name: &LocalName<'_>) -> Option<TextType> {
    if local_name.is_one_of(&[b"title", b"textarea"]) {
        Some(TextType::RCData)
    } else if local_name.is_one_of(&[
        b"style", b"xmp", b"iframe", b"noembed", b"noframes", b"noscript",
    ]) {
        Some(TextType::RawText)
    } else if local_name.is_one_of(&[b"script"]) {
        Some(TextType::ScriptData)
    } else if local_name.is_one_of(&[b"plaintext"]) {
        Some(TextType::PlainText)
    } else {
        None
    }
}
