/// A type of text content the tokenizer is consuming.
///
/// Determines where the text ends: in [`Data`](TextType::Data) any markup does,
/// in raw text variants only the end tag of the element that opened them.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TextType {
    /// Text inside `<plaintext>`: everything till the end of the document.
    PlainText,
    /// Text inside `<title>` and `<textarea>`.
    RCData,
    /// Text inside `<style>`, `<xmp>`, `<iframe>`, `<noembed>`, `<noframes>` and `<noscript>`.
    RawText,
    /// Text inside `<script>`.
    ScriptData,
    /// Regular document text.
    Data,
}

impl TextType {
    #[inline]
    pub(crate) fn ends_with_appropriate_end_tag(self) -> bool {
        matches!(
            self,
            TextType::RCData | TextType::RawText | TextType::ScriptData
        )
    }
}
