use crate::harness::{rewrite_chunked, Input, PAGE};
use encoding_rs::UTF_8;
use html_rewriter::errors::TokenizeError;
use html_rewriter::html_content::{Comment, ContentType, Element, TextChunk};
use html_rewriter::*;
use std::cell::RefCell;
use std::rc::Rc;

fn noop_settings() -> Settings<'static, 'static> {
    Settings {
        element_content_handlers: vec![
            element!("*", |_| Ok(())),
            comments!("*", |_| Ok(())),
            text!("*", |_| Ok(())),
        ],
        document_content_handlers: vec![
            doctype!(|_| Ok(())),
            doc_comments!(|_| Ok(())),
            doc_text!(|_| Ok(())),
            start!(|_| Ok(())),
            end!(|_| Ok(())),
        ],
        ..Settings::new()
    }
}

fn mutating_settings() -> Settings<'static, 'static> {
    Settings {
        element_content_handlers: vec![
            element!("img[src]", |el| {
                if !el.has_attribute("loading") {
                    el.set_attribute("loading", "lazy")?;
                }

                Ok(())
            }),
            element!("script", |el| {
                el.remove();

                Ok(())
            }),
            element!("li", |el| {
                el.prepend("- ", ContentType::Text);
                el.append(";", ContentType::Text);

                Ok(())
            }),
            element!("a[href^=http]", |el| {
                el.set_attribute("rel", "noopener")?;
                el.before("<small>ext</small>", ContentType::Html);

                Ok(())
            }),
            element!("dfn", |el| {
                el.remove_and_keep_content();

                Ok(())
            }),
            text!("title", |t| {
                let upper = t.as_str().to_uppercase();

                t.replace(&upper, ContentType::Text);

                Ok(())
            }),
            comments!("body", |c| {
                c.set_text(" stripped ")?;

                Ok(())
            }),
        ],
        document_content_handlers: vec![end!(|end| {
            end.append("<!-- rewritten -->", ContentType::Html);

            Ok(())
        })],
        ..Settings::new()
    }
}

#[test]
fn identity_without_handlers() {
    for_each_encoding_and_chunk_size!(PAGE, |input, chunk_size| {
        let output = rewrite_chunked(&input, chunk_size, Settings::new()).unwrap();

        assert_eq!(
            output.bytes(),
            input.bytes(),
            "Encoding: {}, chunk size: {}",
            input.encoding().name(),
            chunk_size
        );
    });
}

#[test]
fn identity_with_noop_handlers() {
    for_each_encoding_and_chunk_size!(PAGE, |input, chunk_size| {
        let output = rewrite_chunked(&input, chunk_size, noop_settings()).unwrap();

        assert_eq!(
            output.bytes(),
            input.bytes(),
            "Encoding: {}, chunk size: {}",
            input.encoding().name(),
            chunk_size
        );
    });
}

#[test]
fn output_is_independent_of_chunk_boundaries() {
    let input = Input::new(PAGE, UTF_8).unwrap();
    let expected: String = rewrite_chunked(&input, input.len(), mutating_settings())
        .unwrap()
        .into();

    assert!(expected.contains(r#"<img src="/img/a.png" alt="A" loading="lazy">"#));
    assert!(expected.contains("<title>RELEASE NOTES &amp;AMP; CHANGELOG</title>"));
    assert!(!expected.contains("console.log"));
    assert!(expected.ends_with("<!-- rewritten -->"));

    for chunk_size in 1..input.len() {
        let actual: String = rewrite_chunked(&input, chunk_size, mutating_settings())
            .unwrap()
            .into();

        assert_eq!(actual, expected, "Chunk size: {chunk_size}");
    }
}

#[test]
fn output_is_independent_of_chunk_boundaries_in_every_encoding() {
    for_each_encoding_and_chunk_size!(PAGE, |input, chunk_size| {
        let expected: String = rewrite_chunked(&input, input.len(), mutating_settings())
            .unwrap()
            .into();

        let actual: String = rewrite_chunked(&input, chunk_size, mutating_settings())
            .unwrap()
            .into();

        assert_eq!(
            actual,
            expected,
            "Encoding: {}, chunk size: {}",
            input.encoding().name(),
            chunk_size
        );
    });
}

#[test]
fn img_lazy_loading() {
    let rewrite = |html: &str| {
        rewrite_str(
            html,
            RewriteStrSettings {
                element_content_handlers: vec![element!("img", |el| {
                    if !el.has_attribute("loading") {
                        el.set_attribute("loading", "lazy")?;
                    }

                    Ok(())
                })],
                ..RewriteStrSettings::new()
            },
        )
        .unwrap()
    };

    assert_eq!(
        rewrite(r#"<img src="a.png">"#),
        r#"<img src="a.png" loading="lazy">"#
    );

    assert_eq!(
        rewrite(r#"<img src="a.png" loading="eager">"#),
        r#"<img src="a.png" loading="eager">"#
    );
}

#[test]
fn script_removal() {
    let html = rewrite_str(
        "<p>x</p><script>evil()</script><p>y</p>",
        RewriteStrSettings {
            element_content_handlers: vec![element!("script", |el| {
                el.remove();

                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )
    .unwrap();

    assert_eq!(html, "<p>x</p><p>y</p>");
}

#[test]
fn handlers_are_invoked_in_registration_order() {
    let log = Rc::new(RefCell::new(Vec::new()));

    let html = rewrite_str(
        r#"<p class="a">Hi</p>"#,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("p", {
                    let log = Rc::clone(&log);

                    move |el: &mut Element<'_, '_>| {
                        log.borrow_mut().push(format!("first: {:?}", el.get_attribute("id")));
                        el.set_attribute("id", "x")?;

                        Ok(())
                    }
                }),
                element!(".a", {
                    let log = Rc::clone(&log);

                    move |el: &mut Element<'_, '_>| {
                        log.borrow_mut().push(format!("second: {:?}", el.get_attribute("id")));
                        el.set_attribute("id", "y")?;

                        Ok(())
                    }
                }),
            ],
            ..RewriteStrSettings::new()
        },
    )
    .unwrap();

    assert_eq!(html, r#"<p class="a" id="y">Hi</p>"#);
    assert_eq!(*log.borrow(), ["first: None", r#"second: Some("x")"#]);
}

#[test]
fn stopped_propagation_skips_later_handlers() {
    let html = rewrite_str(
        "<span><!-- a --></span><div><!-- b --></div>",
        RewriteStrSettings {
            element_content_handlers: vec![
                comments!("div", |c: &mut Comment<'_>| {
                    c.set_text(" first ")?;
                    c.stop_propagation();

                    Ok(())
                }),
                comments!("*", |c: &mut Comment<'_>| {
                    c.set_text(" second ")?;

                    Ok(())
                }),
            ],
            ..RewriteStrSettings::new()
        },
    )
    .unwrap();

    assert_eq!(
        html,
        "<span><!-- second --></span><div><!-- first --></div>"
    );

    let html = rewrite_str(
        "<p>x</p><b>y</b>",
        RewriteStrSettings {
            element_content_handlers: vec![
                text!("p", |t: &mut TextChunk<'_>| {
                    t.replace(&t.as_str().to_uppercase(), ContentType::Text);
                    t.stop_propagation();

                    Ok(())
                }),
                text!("*", |t: &mut TextChunk<'_>| {
                    t.after("!", ContentType::Text);

                    Ok(())
                }),
            ],
            ..RewriteStrSettings::new()
        },
    )
    .unwrap();

    assert_eq!(html, "<p>X</p><b>y!</b>");
}

#[test]
fn unterminated_comment_is_finalized_at_end() {
    let comments = Rc::new(RefCell::new(Vec::new()));
    let mut output = Vec::new();

    {
        let mut rewriter = HtmlRewriter::new(
            Settings {
                document_content_handlers: vec![doc_comments!({
                    let comments = Rc::clone(&comments);

                    move |c: &mut Comment<'_>| {
                        comments.borrow_mut().push(c.text());

                        Ok(())
                    }
                })],
                ..Settings::new()
            },
            |c: &[u8]| output.extend_from_slice(c),
        );

        rewriter.write(b"<div><!-- never").unwrap();
        rewriter.write(b" closed").unwrap();

        assert!(comments.borrow().is_empty());

        rewriter.end().unwrap();
    }

    assert_eq!(*comments.borrow(), [" never closed"]);
    assert_eq!(String::from_utf8(output).unwrap(), "<div><!-- never closed");
}

#[test]
fn write_after_end_and_double_free() {
    let mut rewriter = HtmlRewriter::new(Settings::new(), |_: &[u8]| {});

    rewriter.write(b"<p>").unwrap();
    rewriter.end().unwrap();

    assert!(matches!(
        rewriter.write(b"</p>"),
        Err(RewritingError::InvalidState(InvalidStateError::Ended))
    ));

    rewriter.free();
    rewriter.free();

    assert!(matches!(
        rewriter.end(),
        Err(RewritingError::InvalidState(InvalidStateError::Freed))
    ));
}

#[test]
fn memory_limit() {
    let mut rewriter = HtmlRewriter::new(
        Settings {
            memory_settings: MemorySettings {
                preallocated_parsing_buffer_size: 16,
                max_allowed_memory_usage: 32,
            },
            ..Settings::new()
        },
        |_: &[u8]| {},
    );

    let html = format!("<!--{}-->", "a".repeat(100));

    let err = html
        .as_bytes()
        .chunks(10)
        .map(|chunk| rewriter.write(chunk))
        .find_map(Result::err)
        .unwrap();

    assert!(matches!(err, RewritingError::MemoryLimitExceeded(_)));

    assert!(matches!(
        rewriter.write(b"<p>"),
        Err(RewritingError::InvalidState(InvalidStateError::Poisoned))
    ));
}

#[test]
fn malformed_bytes_in_strict_mode() {
    let input = b"<p>\xFF</p>";
    let mut output = Vec::new();

    {
        let mut rewriter = HtmlRewriter::new(Settings::new(), |c: &[u8]| {
            output.extend_from_slice(c)
        });

        rewriter.write(input).unwrap();
        rewriter.end().unwrap();
    }

    assert_eq!(output, input);

    let mut rewriter = HtmlRewriter::new(
        Settings {
            strict: true,
            ..Settings::new()
        },
        |_: &[u8]| {},
    );

    let result = rewriter.write(input).and_then(|_| rewriter.end());

    assert!(matches!(
        result,
        Err(RewritingError::Tokenize(TokenizeError::MalformedByteSequence))
    ));
}

#[test]
fn text_handlers_see_decoded_text() {
    let chunks = Rc::new(RefCell::new(String::new()));

    let html = rewrite_str(
        "<p>caf\u{e9} &amp; cr\u{e8}me</p>",
        RewriteStrSettings {
            element_content_handlers: vec![text!("p", {
                let chunks = Rc::clone(&chunks);

                move |t: &mut TextChunk<'_>| {
                    chunks.borrow_mut().push_str(t.as_str());

                    Ok(())
                }
            })],
            ..RewriteStrSettings::new()
        },
    )
    .unwrap();

    assert_eq!(html, "<p>caf\u{e9} &amp; cr\u{e8}me</p>");
    assert_eq!(*chunks.borrow(), "caf\u{e9} &amp; cr\u{e8}me");
}
