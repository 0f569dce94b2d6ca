use html_rewriter::*;
use std::cell::RefCell;

const HTML: &str = concat!(
    r#"<div n=1 id=main class="a b">"#,
    r#"<p n=2 lang=en-US>x</p>"#,
    r#"<section n=3><p n=4 data-x=foo-bar>y</p></section>"#,
    r#"</div>"#,
    r#"<p n=5>z</p>"#,
);

fn matched_in(html: &str, selector: &str) -> Vec<String> {
    let matched = RefCell::new(Vec::new());

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!(selector, |el| {
                matched
                    .borrow_mut()
                    .push(el.get_attribute("n").unwrap_or_default());

                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )
    .unwrap();

    matched.into_inner()
}

fn matched(selector: &str) -> Vec<String> {
    matched_in(HTML, selector)
}

#[test]
fn type_and_universal_selectors() {
    assert_eq!(matched("p"), ["2", "4", "5"]);
    assert_eq!(matched("P"), ["2", "4", "5"]);
    assert_eq!(matched("*"), ["1", "2", "3", "4", "5"]);
    assert_eq!(matched("span"), Vec::<String>::new());
}

#[test]
fn combinators() {
    assert_eq!(matched("div p"), ["2", "4"]);
    assert_eq!(matched("div > p"), ["2"]);
    assert_eq!(matched("section > p"), ["4"]);
    assert_eq!(matched("div > section > p"), ["4"]);
    assert_eq!(matched("div *"), ["2", "3", "4"]);
    assert_eq!(matched("* > p"), ["2", "4"]);
    assert_eq!(matched("div section p"), ["4"]);
    assert_eq!(matched("section div"), Vec::<String>::new());
}

#[test]
fn id_and_class() {
    assert_eq!(matched("#main"), ["1"]);
    assert_eq!(matched(".b"), ["1"]);
    assert_eq!(matched("div.a.b#main"), ["1"]);
    assert_eq!(matched(".c"), Vec::<String>::new());
}

#[test]
fn attribute_operators() {
    assert_eq!(matched("[lang]"), ["2"]);
    assert_eq!(matched("[lang=en-US]"), ["2"]);
    assert_eq!(matched("[lang=en-us]"), Vec::<String>::new());
    assert_eq!(matched("[LANG=EN-us i]"), ["2"]);
    assert_eq!(matched("[lang|=en]"), ["2"]);
    assert_eq!(matched("[class~=a]"), ["1"]);
    assert_eq!(matched("[data-x^=foo]"), ["4"]);
    assert_eq!(matched("[data-x$=bar]"), ["4"]);
    assert_eq!(matched("[data-x*='o-b']"), ["4"]);
    assert_eq!(matched("[n='5']"), ["5"]);
}

#[test]
fn selector_lists() {
    assert_eq!(matched("section, div > p"), ["2", "3"]);
    assert_eq!(matched("#main, div"), ["1"]);
}

#[test]
fn void_and_self_closing_elements_have_no_descendants() {
    let html = r#"<div n=1><img n=2><span n=3/><p n=4></p></div>"#;

    assert_eq!(matched_in(html, "div > p"), ["4"]);
    assert_eq!(matched_in(html, "img p"), Vec::<String>::new());
    assert_eq!(matched_in(html, "span p"), Vec::<String>::new());
}

#[test]
fn raw_text_content_is_not_matched() {
    let html = r#"<div n=1><script><p n=2></p></script><textarea><p n=3></textarea></div>"#;

    assert_eq!(matched_in(html, "p"), Vec::<String>::new());
}

#[test]
fn end_tags_close_implicitly_opened_elements() {
    let html = r#"<div n=1><span n=2><b n=3>x</div><p n=4></p>"#;

    assert_eq!(matched_in(html, "span p"), Vec::<String>::new());
    assert_eq!(matched_in(html, "div p"), Vec::<String>::new());
}

#[test]
fn invalid_selectors() {
    let mut rewriter = HtmlRewriter::new(Settings::new(), |_: &[u8]| {});

    let mut on = |selector: &str| rewriter.on(selector, ElementContentHandlers::default());

    assert_eq!(on(""), Err(SelectorError::EmptySelector));
    assert_eq!(on("div >"), Err(SelectorError::DanglingCombinator));
    assert_eq!(on("div + p"), Err(SelectorError::UnsupportedCombinator('+')));
    assert_eq!(on("p:first-child"), Err(SelectorError::UnsupportedPseudoClassOrElement));
    assert_eq!(on("div p"), Ok(()));
}
