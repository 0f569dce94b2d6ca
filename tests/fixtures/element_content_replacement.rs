use crate::harness::{rewrite_chunked, Input};
use encoding_rs::UTF_8;
use html_rewriter::html_content::{ContentType, Element, EndTag};
use html_rewriter::*;

const INPUT: &str = "<div><span>Hi<b>!</b></span></div>";

fn check(mutate: fn(&mut Element<'_, '_>), expected: &str) {
    let input = Input::new(INPUT, UTF_8).unwrap();

    for chunk_size in 1..=input.len() {
        let output: String = rewrite_chunked(
            &input,
            chunk_size,
            Settings {
                element_content_handlers: vec![element!("span", move |el| {
                    mutate(el);

                    Ok(())
                })],
                ..Settings::new()
            },
        )
        .unwrap()
        .into();

        assert_eq!(output, expected, "Chunk size: {chunk_size}");
    }
}

#[test]
fn before_and_after() {
    check(
        |el| el.before("<b>1</b>", ContentType::Html),
        "<div><b>1</b><span>Hi<b>!</b></span></div>",
    );

    check(
        |el| el.after("<x>", ContentType::Text),
        "<div><span>Hi<b>!</b></span>&lt;x&gt;</div>",
    );
}

#[test]
fn prepend_and_append() {
    check(
        |el| el.prepend("<i>0</i>", ContentType::Html),
        "<div><span><i>0</i>Hi<b>!</b></span></div>",
    );

    check(
        |el| el.append("&", ContentType::Text),
        "<div><span>Hi<b>!</b>&amp;</span></div>",
    );
}

#[test]
fn insertion_order() {
    check(
        |el| {
            el.before("1", ContentType::Text);
            el.before("2", ContentType::Text);
            el.after("1", ContentType::Text);
            el.after("2", ContentType::Text);
            el.prepend("1", ContentType::Text);
            el.prepend("2", ContentType::Text);
            el.append("1", ContentType::Text);
            el.append("2", ContentType::Text);
        },
        "<div>12<span>21Hi<b>!</b>12</span>21</div>",
    );
}

#[test]
fn set_inner_content() {
    check(
        |el| el.set_inner_content("<em>new</em>", ContentType::Html),
        "<div><span><em>new</em></span></div>",
    );

    check(
        |el| {
            el.set_inner_content("<em>new</em>", ContentType::Text);
            el.append("!", ContentType::Text);
        },
        "<div><span>&lt;em&gt;new&lt;/em&gt;!</span></div>",
    );
}

#[test]
fn replace() {
    check(
        |el| el.replace("<em>R</em>", ContentType::Html),
        "<div><em>R</em></div>",
    );
}

#[test]
fn remove() {
    check(|el| el.remove(), "<div></div>");

    check(
        |el| {
            el.before("[", ContentType::Text);
            el.after("]", ContentType::Text);
            el.remove();
        },
        "<div>[]</div>",
    );
}

#[test]
fn remove_and_keep_content() {
    check(|el| el.remove_and_keep_content(), "<div>Hi<b>!</b></div>");
}

#[test]
fn set_tag_name() {
    check(
        |el| el.set_tag_name("strong").unwrap(),
        "<div><strong>Hi<b>!</b></strong></div>",
    );
}

#[test]
fn end_tag_handlers() {
    check(
        |el| {
            if let Some(handlers) = el.end_tag_handlers() {
                handlers.push(Box::new(|end: &mut EndTag<'_>| -> HandlerResult {
                    end.before("?", ContentType::Text);
                    end.set_name("em")?;

                    Ok(())
                }));
            }
        },
        "<div><span>Hi<b>!</b>?</em></div>",
    );
}

#[test]
fn removed_content_is_not_matched() {
    let input = Input::new("<div><p>1</p></div><p>2</p>", UTF_8).unwrap();

    let output: String = rewrite_chunked(
        &input,
        input.len(),
        Settings {
            element_content_handlers: vec![
                element!("div", |el| {
                    el.set_inner_content("x", ContentType::Text);

                    Ok(())
                }),
                element!("p", |el| {
                    el.set_attribute("seen", "")?;

                    Ok(())
                }),
            ],
            ..Settings::new()
        },
    )
    .unwrap()
    .into();

    assert_eq!(output, r#"<div>x</div><p seen="">2</p>"#);
}
