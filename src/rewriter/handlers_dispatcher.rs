use super::rewrite_controller::ElementDescriptor;
use super::settings::*;
use super::RewritingError;
use crate::rewritable_units::{
    DocumentEnd, DocumentStart, Element, PendingEndTag, StartTag, Token, TokenCaptureFlags,
};
use crate::selectors_vm::SelectorMatchingVm;
use encoding_rs::Encoding;

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct SelectorHandlersLocator {
    pub element_handler_idx: Option<usize>,
    pub comment_handler_idx: Option<usize>,
    pub text_handler_idx: Option<usize>,
}

struct HandlerVecItem<H> {
    handler: H,
    user_count: usize,
}

struct HandlerVec<H> {
    items: Vec<HandlerVecItem<H>>,
    user_count: usize,
}

impl<H> Default for HandlerVec<H> {
    fn default() -> Self {
        HandlerVec {
            items: Vec::default(),
            user_count: 0,
        }
    }
}

impl<H> HandlerVec<H> {
    #[inline]
    pub fn push(&mut self, handler: H, always_active: bool) {
        let item = HandlerVecItem {
            handler,
            user_count: usize::from(always_active),
        };

        self.user_count += item.user_count;
        self.items.push(item);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn inc_user_count(&mut self, idx: usize) {
        self.items[idx].user_count += 1;
        self.user_count += 1;
    }

    #[inline]
    pub fn dec_user_count(&mut self, idx: usize) {
        self.items[idx].user_count -= 1;
        self.user_count -= 1;
    }

    #[inline]
    pub fn has_active(&self) -> bool {
        self.user_count > 0
    }

    /// Invokes the active handlers in registration order, stopping at the first error.
    #[inline]
    pub fn try_for_each_active(
        &mut self,
        mut cb: impl FnMut(&mut H) -> Result<(), RewritingError>,
    ) -> Result<(), RewritingError> {
        self.items
            .iter_mut()
            .filter(|h| h.user_count > 0)
            .try_for_each(|h| cb(&mut h.handler))
    }

    /// Invokes the active handlers and deactivates all of them, even if one of the
    /// handlers fails. The first error is returned.
    #[inline]
    pub fn try_for_each_active_and_deactivate(
        &mut self,
        mut cb: impl FnMut(&mut H) -> Result<(), RewritingError>,
    ) -> Result<(), RewritingError> {
        let mut result = Ok(());

        for item in self.items.iter_mut().filter(|h| h.user_count > 0) {
            if result.is_ok() {
                result = cb(&mut item.handler);
            }

            item.user_count = 0;
        }

        self.user_count = 0;

        result
    }
}

#[inline]
fn to_rewriting_error(result: HandlerResult) -> Result<(), RewritingError> {
    result.map_err(RewritingError::ContentHandlerError)
}

#[derive(Default)]
pub struct ContentHandlersDispatcher<'h> {
    doctype_handlers: HandlerVec<DoctypeHandler<'h>>,
    comment_handlers: HandlerVec<CommentHandler<'h>>,
    text_handlers: HandlerVec<TextHandler<'h>>,
    element_handlers: HandlerVec<ElementHandler<'h>>,
    start_handlers: Vec<StartHandler<'h>>,
    end_handlers: Vec<EndHandler<'h>>,
    next_element_can_have_content: bool,
    matched_elements_with_removed_content: usize,
}

impl<'h> ContentHandlersDispatcher<'h> {
    #[inline]
    pub fn add_document_content_handlers(&mut self, handlers: DocumentContentHandlers<'h>) {
        if let Some(handler) = handlers.doctype {
            self.doctype_handlers.push(handler, true);
        }

        if let Some(handler) = handlers.comments {
            self.comment_handlers.push(handler, true);
        }

        if let Some(handler) = handlers.text {
            self.text_handlers.push(handler, true);
        }

        if let Some(handler) = handlers.start {
            self.start_handlers.push(handler);
        }

        if let Some(handler) = handlers.end {
            self.end_handlers.push(handler);
        }
    }

    #[inline]
    pub fn add_selector_associated_handlers(
        &mut self,
        handlers: ElementContentHandlers<'h>,
    ) -> SelectorHandlersLocator {
        SelectorHandlersLocator {
            element_handler_idx: handlers.element.map(|h| {
                self.element_handlers.push(h, false);
                self.element_handlers.len() - 1
            }),
            comment_handler_idx: handlers.comments.map(|h| {
                self.comment_handlers.push(h, false);
                self.comment_handlers.len() - 1
            }),
            text_handler_idx: handlers.text.map(|h| {
                self.text_handlers.push(h, false);
                self.text_handlers.len() - 1
            }),
        }
    }

    #[inline]
    pub fn has_matched_elements_with_removed_content(&self) -> bool {
        self.matched_elements_with_removed_content > 0
    }

    #[inline]
    pub fn set_next_element_can_have_content(&mut self, can_have_content: bool) {
        self.next_element_can_have_content = can_have_content;
    }

    #[inline]
    pub fn start_matching(&mut self, locator: SelectorHandlersLocator) {
        if self.next_element_can_have_content {
            if let Some(idx) = locator.comment_handler_idx {
                self.comment_handlers.inc_user_count(idx);
            }

            if let Some(idx) = locator.text_handler_idx {
                self.text_handlers.inc_user_count(idx);
            }
        }

        if let Some(idx) = locator.element_handler_idx {
            self.element_handlers.inc_user_count(idx);
        }
    }

    #[inline]
    pub fn stop_matching(&mut self, elem_desc: ElementDescriptor) -> Option<PendingEndTag> {
        for locator in elem_desc.matched_content_handlers {
            if let Some(idx) = locator.comment_handler_idx {
                self.comment_handlers.dec_user_count(idx);
            }

            if let Some(idx) = locator.text_handler_idx {
                self.text_handlers.dec_user_count(idx);
            }
        }

        if elem_desc.remove_content {
            self.matched_elements_with_removed_content -= 1;
        }

        elem_desc.pending_end_tag
    }

    pub fn handle_start(
        &mut self,
        output_handler: &mut dyn FnMut(&[u8]),
        encoding: &'static Encoding,
    ) -> Result<(), RewritingError> {
        let mut document_start = DocumentStart::new(output_handler, encoding);

        self.start_handlers
            .drain(..)
            .try_for_each(|h| to_rewriting_error(h(&mut document_start)))
    }

    pub fn handle_end(
        &mut self,
        output_handler: &mut dyn FnMut(&[u8]),
        encoding: &'static Encoding,
    ) -> Result<(), RewritingError> {
        let mut document_end = DocumentEnd::new(output_handler, encoding);

        self.end_handlers
            .drain(..)
            .try_for_each(|h| to_rewriting_error(h(&mut document_end)))
    }

    fn handle_start_tag(
        &mut self,
        start_tag: &mut StartTag<'_>,
        selector_matching_vm: &mut SelectorMatchingVm<ElementDescriptor>,
    ) -> Result<(), RewritingError> {
        let mut element = Element::new(start_tag, self.next_element_can_have_content);

        let result = self.element_handlers.try_for_each_active_and_deactivate(|h| {
            if element.propagation_stopped() {
                Ok(())
            } else {
                to_rewriting_error(h(&mut element))
            }
        });

        if self.next_element_can_have_content {
            if let Some(elem_desc) = selector_matching_vm.current_element_data_mut() {
                if element.should_remove_content() {
                    elem_desc.remove_content = true;
                    self.matched_elements_with_removed_content += 1;
                }

                elem_desc.pending_end_tag = element.into_pending_end_tag();
            }
        }

        result
    }

    pub fn handle_token(
        &mut self,
        token: &mut Token<'_>,
        selector_matching_vm: &mut SelectorMatchingVm<ElementDescriptor>,
    ) -> Result<(), RewritingError> {
        match token {
            Token::Doctype(doctype) => self.doctype_handlers.try_for_each_active(|h| {
                if doctype.propagation_stopped() {
                    Ok(())
                } else {
                    to_rewriting_error(h(doctype))
                }
            }),
            Token::StartTag(start_tag) => self.handle_start_tag(start_tag, selector_matching_vm),
            Token::TextChunk(text) => self.text_handlers.try_for_each_active(|h| {
                if text.propagation_stopped() {
                    Ok(())
                } else {
                    to_rewriting_error(h(text))
                }
            }),
            Token::Comment(comment) => self.comment_handlers.try_for_each_active(|h| {
                if comment.propagation_stopped() {
                    Ok(())
                } else {
                    to_rewriting_error(h(comment))
                }
            }),
            // NOTE: end tags are captured only for the pending end tag mutations,
            // which are applied by the controller.
            Token::EndTag(_) => Ok(()),
        }
    }

    #[inline]
    pub fn get_token_capture_flags(&self) -> TokenCaptureFlags {
        let mut flags = TokenCaptureFlags::empty();

        if self.doctype_handlers.has_active() {
            flags |= TokenCaptureFlags::DOCTYPES;
        }

        if self.comment_handlers.has_active() {
            flags |= TokenCaptureFlags::COMMENTS;
        }

        if self.text_handlers.has_active() {
            flags |= TokenCaptureFlags::TEXT;
        }

        if self.element_handlers.has_active() {
            flags |= TokenCaptureFlags::NEXT_START_TAG;
        }

        flags
    }
}
