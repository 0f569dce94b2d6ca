use html_rewriter::*;
use std::hint::black_box;

define_group!(
    "Parsing",
    [
        ("Pass-through without handlers", Settings::new()),
        (
            "Comment capture",
            Settings {
                document_content_handlers: vec![doc_comments!(noop_handler!())],
                ..Settings::new()
            }
        ),
        (
            // NOTE: every text lexeme has to be decoded to produce text chunks.
            "Text decoding",
            Settings {
                document_content_handlers: vec![doc_text!(noop_handler!())],
                ..Settings::new()
            }
        )
    ]
);
