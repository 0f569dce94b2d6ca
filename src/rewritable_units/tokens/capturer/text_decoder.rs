use crate::rewriter::{RewritingError, TokenizeError};
use encoding_rs::{CoderResult, Decoder, DecoderResult, Encoding};

/// Streaming decoder for the captured text.
///
/// A multi-byte character can be split between two text lexemes, so the
/// decoder is kept alive until the end of the text node.
pub struct TextDecoder {
    encoding: &'static Encoding,
    strict: bool,
    pending_text_streaming_decoder: Option<Decoder>,
    text_buffer: String,
}

impl TextDecoder {
    pub fn new(encoding: &'static Encoding, strict: bool) -> Self {
        TextDecoder {
            encoding,
            strict,
            pending_text_streaming_decoder: None,
            text_buffer: String::new(),
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        self.pending_text_streaming_decoder = None;
    }

    pub fn feed_text(
        &mut self,
        mut raw_input: &[u8],
        last_in_text_node: bool,
        output_handler: &mut dyn FnMut(&str, bool) -> Result<(), RewritingError>,
    ) -> Result<(), RewritingError> {
        let encoding = self.encoding;
        let decoder = self
            .pending_text_streaming_decoder
            .get_or_insert_with(|| encoding.new_decoder_without_bom_handling());

        self.text_buffer.clear();

        loop {
            let additional = decoder
                .max_utf8_buffer_length(raw_input.len())
                .unwrap_or(raw_input.len());

            self.text_buffer.reserve(additional);

            let finished = if self.strict {
                let (result, read) = decoder.decode_to_string_without_replacement(
                    raw_input,
                    &mut self.text_buffer,
                    last_in_text_node,
                );

                raw_input = &raw_input[read..];

                match result {
                    DecoderResult::InputEmpty => true,
                    DecoderResult::OutputFull => false,
                    DecoderResult::Malformed(..) => {
                        return Err(TokenizeError::MalformedByteSequence.into())
                    }
                }
            } else {
                let (result, read, _) =
                    decoder.decode_to_string(raw_input, &mut self.text_buffer, last_in_text_node);

                raw_input = &raw_input[read..];

                result == CoderResult::InputEmpty
            };

            if finished {
                break;
            }
        }

        if last_in_text_node {
            self.pending_text_streaming_decoder = None;
        }

        if !self.text_buffer.is_empty() || last_in_text_node {
            output_handler(&self.text_buffer, last_in_text_node)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{SHIFT_JIS, UTF_8};

    fn decode(decoder: &mut TextDecoder, input: &[u8], last: bool) -> Vec<(String, bool)> {
        let mut chunks = Vec::new();

        decoder
            .feed_text(input, last, &mut |text: &str, last: bool| {
                chunks.push((text.to_owned(), last));
                Ok(())
            })
            .unwrap();

        chunks
    }

    #[test]
    fn split_character_is_decoded_once_complete() {
        let mut decoder = TextDecoder::new(UTF_8, false);
        let bytes = "a\u{00e9}".as_bytes();

        assert_eq!(decode(&mut decoder, &bytes[..2], false), [("a".to_owned(), false)]);
        assert_eq!(
            decode(&mut decoder, &bytes[2..], true),
            [("\u{00e9}".to_owned(), true)]
        );
    }

    #[test]
    fn empty_last_chunk_is_reported() {
        let mut decoder = TextDecoder::new(SHIFT_JIS, false);

        assert!(decode(&mut decoder, b"", false).is_empty());
        assert_eq!(decode(&mut decoder, b"", true), [(String::new(), true)]);
    }

    #[test]
    fn malformed_input() {
        let mut decoder = TextDecoder::new(UTF_8, false);

        assert_eq!(
            decode(&mut decoder, b"a\xFFb", true),
            [("a\u{FFFD}b".to_owned(), true)]
        );

        let mut decoder = TextDecoder::new(UTF_8, true);

        let err = decoder
            .feed_text(b"a\xFFb", true, &mut |_, _| Ok(()))
            .unwrap_err();

        assert!(matches!(
            err,
            RewritingError::Tokenize(TokenizeError::MalformedByteSequence)
        ));
    }
}
