use super::handlers_dispatcher::{ContentHandlersDispatcher, SelectorHandlersLocator};
use super::settings::{DocumentContentHandlers, ElementContentHandlers};
use super::RewritingError;
use crate::html::LocalName;
use crate::rewritable_units::{PendingEndTag, Token, TokenCaptureFlags};
use crate::selectors_vm::{AttributeMatcher, ElementData, Selector, SelectorMatchingVm};
use crate::transform_stream::*;
use encoding_rs::Encoding;

#[derive(Default)]
pub struct ElementDescriptor {
    pub matched_content_handlers: Vec<SelectorHandlersLocator>,
    pub pending_end_tag: Option<PendingEndTag>,
    pub remove_content: bool,
}

impl ElementData for ElementDescriptor {
    type MatchPayload = SelectorHandlersLocator;
}

pub struct HtmlRewriteController<'h> {
    handlers_dispatcher: ContentHandlersDispatcher<'h>,
    selector_matching_vm: SelectorMatchingVm<ElementDescriptor>,
    pending_end_tag: Option<PendingEndTag>,
    encoding: &'static Encoding,
}

impl<'h> HtmlRewriteController<'h> {
    pub fn new(encoding: &'static Encoding) -> Self {
        HtmlRewriteController {
            handlers_dispatcher: ContentHandlersDispatcher::default(),
            selector_matching_vm: SelectorMatchingVm::new(encoding),
            pending_end_tag: None,
            encoding,
        }
    }

    pub fn add_element_content_handlers(
        &mut self,
        selector: &Selector,
        handlers: ElementContentHandlers<'h>,
    ) {
        let locator = self
            .handlers_dispatcher
            .add_selector_associated_handlers(handlers);

        self.selector_matching_vm.add_selector(selector, locator);
    }

    #[inline]
    pub fn add_document_content_handlers(&mut self, handlers: DocumentContentHandlers<'h>) {
        self.handlers_dispatcher
            .add_document_content_handlers(handlers);
    }

    /// Pops the descriptor of a closed element. Content that was appended to
    /// the element is emitted if the element was closed without its own end tag.
    fn stop_matching(
        &mut self,
        elem_desc: ElementDescriptor,
        output_handler: &mut dyn FnMut(&[u8]),
        has_end_tag: bool,
    ) {
        let pending_end_tag = self.handlers_dispatcher.stop_matching(elem_desc);

        if has_end_tag {
            self.pending_end_tag = pending_end_tag;
        } else if let Some(pending_end_tag) = pending_end_tag {
            if self.should_emit_content() {
                pending_end_tag.content_without_end_tag(output_handler);
            }
        }
    }

    #[inline]
    fn get_capture_flags(&self) -> TokenCaptureFlags {
        let mut flags = self.handlers_dispatcher.get_token_capture_flags();

        if self.pending_end_tag.is_some() {
            flags |= TokenCaptureFlags::NEXT_END_TAG;
        }

        flags
    }
}

impl TransformController for HtmlRewriteController<'_> {
    #[inline]
    fn capture_flags(&self) -> TokenCaptureFlags {
        self.get_capture_flags()
    }

    fn handle_start(
        &mut self,
        output_handler: &mut dyn FnMut(&[u8]),
    ) -> Result<(), RewritingError> {
        self.handlers_dispatcher
            .handle_start(output_handler, self.encoding)
    }

    fn handle_start_tag(
        &mut self,
        local_name: LocalName<'_>,
        aux_info: AuxStartTagInfo<'_>,
    ) -> TokenCaptureFlags {
        // NOTE: elements in the removed content are still tracked by the
        // matching VM, but the handlers are not invoked for them.
        let is_emitted = self.should_emit_content();
        let attr_matcher = AttributeMatcher::new(aux_info.input, aux_info.attributes);
        let mut matched_locators = Vec::new();

        let can_have_content = self.selector_matching_vm.exec_for_start_tag(
            &local_name,
            &attr_matcher,
            aux_info.self_closing,
            |locator| {
                if is_emitted {
                    matched_locators.push(locator);
                }
            },
        );

        self.handlers_dispatcher
            .set_next_element_can_have_content(can_have_content);

        for &locator in &matched_locators {
            self.handlers_dispatcher.start_matching(locator);
        }

        if can_have_content {
            if let Some(elem_desc) = self.selector_matching_vm.current_element_data_mut() {
                elem_desc.matched_content_handlers = matched_locators;
            }
        }

        self.get_capture_flags()
    }

    fn handle_end_tag(
        &mut self,
        local_name: LocalName<'_>,
        output_handler: &mut dyn FnMut(&[u8]),
    ) -> TokenCaptureFlags {
        let mut popped = Vec::new();

        self.pending_end_tag = None;

        self.selector_matching_vm
            .exec_for_end_tag(&local_name, |elem_desc| popped.push(elem_desc));

        let popped_count = popped.len();

        // NOTE: the last popped element is the one that is closed by the end tag,
        // the others are closed implicitly.
        for (i, elem_desc) in popped.into_iter().enumerate() {
            self.stop_matching(elem_desc, output_handler, i + 1 == popped_count);
        }

        self.get_capture_flags()
    }

    fn handle_token(&mut self, token: &mut Token<'_>) -> Result<(), RewritingError> {
        if let Token::EndTag(end_tag) = token {
            if let Some(pending_end_tag) = self.pending_end_tag.take() {
                return pending_end_tag.apply(end_tag);
            }
        }

        self.handlers_dispatcher
            .handle_token(token, &mut self.selector_matching_vm)
    }

    fn handle_end(
        &mut self,
        output_handler: &mut dyn FnMut(&[u8]),
    ) -> Result<(), RewritingError> {
        let mut popped = Vec::new();

        self.selector_matching_vm
            .exec_for_end_of_input(|elem_desc| popped.push(elem_desc));

        for elem_desc in popped {
            self.stop_matching(elem_desc, output_handler, false);
        }

        self.pending_end_tag = None;

        self.handlers_dispatcher
            .handle_end(output_handler, self.encoding)
    }

    #[inline]
    fn should_emit_content(&self) -> bool {
        !self
            .handlers_dispatcher
            .has_matched_elements_with_removed_content()
    }
}
