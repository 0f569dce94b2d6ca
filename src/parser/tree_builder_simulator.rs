//! There are some tags that change the way the tokenizer consumes the
//! content that follows them: `<script>`, `<style>`, `<textarea>` and
//! friends switch it into one of the raw text modes until the matching end
//! tag is seen. The tree builder is responsible for that in a browser. We
//! don't build the tree, so we simulate the part of its behaviour that
//! affects tokenization.
//!
//! The only tree construction nuance taken into account is foreign content:
//! inside `<svg>` and `<math>` elements these tags don't switch text modes.
use crate::html::{text_type_for_start_tag, LocalName, TextType};

const FOREIGN_CONTENT_ROOTS: &[&[u8]] = &[b"svg", b"math"];

#[derive(Debug, Default)]
pub struct TreeBuilderSimulator {
    foreign_content_depth: usize,
}

impl TreeBuilderSimulator {
    /// Returns the text type the tokenizer should switch to after the
    /// start tag, if any.
    pub fn get_feedback_for_start_tag(
        &mut self,
        name: &LocalName<'_>,
        self_closing: bool,
    ) -> Option<TextType> {
        if name.is_one_of(FOREIGN_CONTENT_ROOTS) {
            if !self_closing {
                self.foreign_content_depth += 1;
            }

            None
        } else if self.foreign_content_depth > 0 || self_closing {
            None
        } else {
            text_type_for_start_tag(name)
        }
    }

    pub fn get_feedback_for_end_tag(&mut self, name: &LocalName<'_>) {
        if name.is_one_of(FOREIGN_CONTENT_ROOTS) {
            self.foreign_content_depth = self.foreign_content_depth.saturating_sub(1);
        }
    }
}
