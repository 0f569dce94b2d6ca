use html_rewriter::html_content::*;
use html_rewriter::*;
use std::hint::black_box;

define_group!(
    "Rewriting",
    [
        (
            "Modification of tags of an element with lots of content",
            Settings {
                element_content_handlers: vec![element!("body", |el| {
                    el.set_tag_name("body1").unwrap();
                    el.after("test", ContentType::Text);

                    Ok(())
                })],
                ..Settings::new()
            }
        ),
        (
            "Remove content of an element",
            Settings {
                element_content_handlers: vec![element!("ul", |el| {
                    el.set_inner_content("", ContentType::Text);

                    Ok(())
                })],
                ..Settings::new()
            }
        ),
        (
            "Lazy loading of images",
            Settings {
                element_content_handlers: vec![element!("img[src]", |el| {
                    if !el.has_attribute("loading") {
                        el.set_attribute("loading", "lazy").unwrap();
                    }

                    Ok(())
                })],
                ..Settings::new()
            }
        ),
        (
            "Selector matching",
            Settings {
                element_content_handlers: vec![
                    element!("ul", noop_handler!()),
                    element!("ul > li", noop_handler!()),
                    element!("table > tbody td dfn", noop_handler!()),
                    element!("body table > tbody tr", noop_handler!()),
                    element!("body [href]", noop_handler!()),
                    element!("div img", noop_handler!()),
                    element!("div.note span", noop_handler!())
                ],
                ..Settings::new()
            }
        )
    ]
);
