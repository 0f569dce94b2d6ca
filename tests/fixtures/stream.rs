use crate::harness::{rewrite_chunked, rewrite_parts, Input, PAGE};
use encoding_rs::UTF_8;
use html_rewriter::html_content::{ContentType, TextChunk};
use html_rewriter::*;
use std::cell::RefCell;
use std::rc::Rc;

struct RejectingSink;

impl OutputSink for RejectingSink {
    fn handle_chunk(&mut self, _: &[u8]) -> Result<(), OutputSinkError> {
        Err(OutputSinkError("The sink is closed".into()))
    }
}

#[test]
fn text_run_split_across_writes() {
    let chunks = RefCell::new(Vec::new());

    let output = rewrite_parts(
        &["<p>hel", "lo</p>"],
        Settings {
            document_content_handlers: vec![doc_text!(|t: &mut TextChunk<'_>| {
                chunks
                    .borrow_mut()
                    .push((t.as_str().to_owned(), t.last_in_text_node()));

                Ok(())
            })],
            ..Settings::new()
        },
    );

    assert_eq!(output, "<p>hello</p>");

    assert_eq!(
        chunks.into_inner(),
        [("hel".to_owned(), false), ("lo".to_owned(), true)]
    );
}

#[test]
fn only_incomplete_lexemes_are_blocked() {
    let output = Rc::new(RefCell::new(Vec::new()));

    let mut rewriter = HtmlRewriter::new(Settings::new(), {
        let output = Rc::clone(&output);

        move |c: &[u8]| output.borrow_mut().extend_from_slice(c)
    });

    rewriter.write(b"<div>hello").unwrap();
    assert_eq!(*output.borrow(), b"<div>hello");

    rewriter.write(b"</di").unwrap();
    assert_eq!(*output.borrow(), b"<div>hello");

    rewriter.write(b"v><!-- comm").unwrap();
    assert_eq!(*output.borrow(), b"<div>hello</div>");

    rewriter.write(b"ent -->").unwrap();
    assert_eq!(*output.borrow(), b"<div>hello</div><!-- comment -->");

    rewriter.end().unwrap();
    assert_eq!(*output.borrow(), b"<div>hello</div><!-- comment -->");
}

#[test]
fn small_output_buffer() {
    let input = Input::new(PAGE, UTF_8).unwrap();

    let output = rewrite_chunked(
        &input,
        input.len(),
        Settings {
            output_buffer_capacity: 16,
            ..Settings::new()
        },
    )
    .unwrap();

    assert_eq!(output.bytes(), input.bytes());
    assert!(output.chunk_count() > 1);
}

#[test]
fn output_is_flushed_once_per_write() {
    let input = Input::new(PAGE, UTF_8).unwrap();
    let output = rewrite_chunked(
        &input,
        input.len(),
        Settings {
            output_buffer_capacity: 2 * input.len(),
            ..Settings::new()
        },
    )
    .unwrap();

    assert_eq!(output.bytes(), input.bytes());
    assert_eq!(output.chunk_count(), 1);
}

#[test]
fn sink_error_poisons_rewriter() {
    let mut rewriter = HtmlRewriter::new(Settings::new(), RejectingSink);

    assert!(matches!(
        rewriter.write(b"<p>Hi</p>"),
        Err(RewritingError::OutputSink(_))
    ));

    assert!(matches!(
        rewriter.end(),
        Err(RewritingError::InvalidState(InvalidStateError::Poisoned))
    ));
}

#[test]
fn handler_error_truncates_output() {
    let output = Rc::new(RefCell::new(Vec::new()));

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![element!("div", |_| Err("Boom".into()))],
            ..Settings::new()
        },
        {
            let output = Rc::clone(&output);

            move |c: &[u8]| output.borrow_mut().extend_from_slice(c)
        },
    );

    rewriter.write(b"<p>1</p>").unwrap();

    let err = rewriter.write(b"<p>2</p><div>3</div>").unwrap_err();

    assert!(matches!(err, RewritingError::ContentHandlerError(_)));
    assert_eq!(err.to_string(), "Boom");
    assert_eq!(*output.borrow(), b"<p>1</p>");

    rewriter.free();
}

#[test]
fn document_start_and_end_content() {
    let output = rewrite_parts(
        &["<p>", "Hi", "</p>"],
        Settings {
            document_content_handlers: vec![
                start!(|start| {
                    start.before("<!DOCTYPE html>", ContentType::Html);

                    Ok(())
                }),
                end!(|end| {
                    end.append("<!-- ", ContentType::Html);
                    end.append("<fin>", ContentType::Text);
                    end.append(" -->", ContentType::Html);

                    Ok(())
                }),
            ],
            ..Settings::new()
        },
    );

    assert_eq!(output, "<!DOCTYPE html><p>Hi</p><!-- &lt;fin&gt; -->");
}

#[test]
fn start_is_idempotent() {
    let starts = Rc::new(RefCell::new(0));

    let mut rewriter = HtmlRewriter::new(
        Settings {
            document_content_handlers: vec![start!({
                let starts = Rc::clone(&starts);

                move |_| {
                    *starts.borrow_mut() += 1;

                    Ok(())
                }
            })],
            ..Settings::new()
        },
        |_: &[u8]| {},
    );

    rewriter.start().unwrap();
    rewriter.start().unwrap();
    rewriter.write(b"<p>").unwrap();
    rewriter.end().unwrap();

    assert_eq!(*starts.borrow(), 1);
}
