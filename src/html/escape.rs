use memchr::{memchr, memchr3};

/// Replaces `<`, `>` and `&` with the corresponding character references.
pub(crate) fn escape_body_text(mut content: &str, output_handler: &mut impl FnMut(&str)) {
    loop {
        if let Some(pos) = memchr3(b'&', b'<', b'>', content.as_bytes()) {
            let Some((chunk_before, rest)) = content.split_at_checked(pos) else {
                return;
            };
            let Some((matched, rest)) = rest.split_at_checked(1) else {
                return;
            };

            if !chunk_before.is_empty() {
                (output_handler)(chunk_before);
            }

            (output_handler)(match matched.as_bytes()[0] {
                b'<' => "&lt;",
                b'>' => "&gt;",
                _ => "&amp;",
            });

            content = rest;
        } else {
            if !content.is_empty() {
                (output_handler)(content);
            }
            return;
        }
    }
}

/// Escapes double quotes in attribute values. Character references that the
/// value already contains are left intact, since attribute values are
/// exposed to handlers as they appear in the markup.
///
/// Works on encoded bytes: `"` has the same byte value in every
/// ASCII-compatible encoding and never appears inside multi-byte sequences.
pub(crate) fn escape_double_quotes_only(
    mut content: &[u8],
    output_handler: &mut impl FnMut(&[u8]),
) {
    while let Some(pos) = memchr(b'"', content) {
        if pos > 0 {
            (output_handler)(&content[..pos]);
        }

        (output_handler)(b"&quot;");

        content = &content[pos + 1..];
    }

    if !content.is_empty() {
        (output_handler)(content);
    }
}
