mod ast;
mod attribute_matcher;
mod compiler;
mod error;
mod parser;
mod program;
mod stack;

use self::compiler::Compiler;
use self::program::{AddressRange, ExecutionBranch, Program};
use self::stack::{Stack, StackItem};
use crate::html::{is_void_element, LocalName};
use encoding_rs::Encoding;
use hashbrown::HashSet;

pub use self::ast::*;
pub use self::attribute_matcher::AttributeMatcher;
pub use self::error::SelectorError;
pub use self::parser::Selector;
pub use self::stack::ElementData;

/// Matches selectors against the stream of start and end tags.
///
/// Selectors are compiled into a program of instructions. Each instruction
/// checks the compound selector it was compiled from and, if it matches,
/// stores the addresses of the instructions for the next compound selector
/// on the open element stack: for the children of the element if the
/// compound selectors are linked by the child combinator, and for all of its
/// descendants in case of the descendant combinator. So, every tag is
/// checked against the entry points of the program and the partial matches
/// memoized on the stack, not against the whole stack.
pub struct SelectorMatchingVm<E: ElementData> {
    program: Program<E::MatchPayload>,
    stack: Stack<E>,
    encoding: &'static Encoding,
}

impl<E: ElementData> SelectorMatchingVm<E> {
    pub fn new(encoding: &'static Encoding) -> Self {
        SelectorMatchingVm {
            program: Program::default(),
            stack: Stack::default(),
            encoding,
        }
    }

    /// Adds the selector to the program. Elements that are already open
    /// don't take part in matching of the new selector.
    pub fn add_selector(&mut self, selector: &Selector, payload: E::MatchPayload) {
        let mut ast = Ast::default();

        ast.add_selector(selector, payload);
        Compiler::new(self.encoding).compile_into(&ast, &mut self.program);
    }

    /// Matches the start tag against the selectors and invokes the handler
    /// for every matched payload (once per payload). Returns `true` if the
    /// element has been pushed to the open element stack, which means that
    /// its end tag will be reported via [`exec_for_end_tag`].
    ///
    /// [`exec_for_end_tag`]: SelectorMatchingVm::exec_for_end_tag
    pub fn exec_for_start_tag(
        &mut self,
        local_name: &LocalName<'_>,
        attr_matcher: &AttributeMatcher<'_>,
        self_closing: bool,
        mut match_handler: impl FnMut(E::MatchPayload),
    ) -> bool {
        let mut matched_payload = HashSet::new();
        let mut executed_ranges = HashSet::<AddressRange>::new();
        let mut jumps: Vec<AddressRange> = Vec::default();
        let mut hereditary_jumps: Vec<AddressRange> = Vec::default();

        // NOTE: ranges inherited from the ancestors stay in effect for the
        // whole subtree, so they are not stored again on the new element.
        let inherited_ranges = self
            .stack
            .items_with_hereditary_jumps()
            .flat_map(|item| item.hereditary_jumps.iter().cloned())
            .collect::<Vec<_>>();

        {
            let instructions = &self.program.instructions;

            let mut exec_range = |range: &AddressRange| {
                if !executed_ranges.insert(range.clone()) {
                    return;
                }

                for addr in range.clone() {
                    if let Some(branch) = instructions[addr].exec(local_name, attr_matcher) {
                        let ExecutionBranch {
                            matched_payload: payload,
                            jumps: branch_jumps,
                            hereditary_jumps: branch_hereditary_jumps,
                        } = branch;

                        for &p in payload {
                            if matched_payload.insert(p) {
                                match_handler(p);
                            }
                        }

                        if let Some(jump) = branch_jumps {
                            if !jumps.contains(jump) {
                                jumps.push(jump.clone());
                            }
                        }

                        if let Some(jump) = branch_hereditary_jumps {
                            if !inherited_ranges.contains(jump) && !hereditary_jumps.contains(jump) {
                                hereditary_jumps.push(jump.clone());
                            }
                        }
                    }
                }
            };

            self.program.entry_points.iter().for_each(&mut exec_range);

            if let Some(parent) = self.stack.items().last() {
                parent.jumps.iter().for_each(&mut exec_range);
            }

            inherited_ranges.iter().for_each(&mut exec_range);
        }

        // NOTE: void elements and self-closing tags don't have content,
        // so they are never pushed to the stack.
        if self_closing || is_void_element(local_name) {
            return false;
        }

        let mut item = StackItem::new(local_name.clone());

        item.jumps = jumps;
        item.hereditary_jumps = hereditary_jumps;

        self.stack.push_item(item);

        true
    }

    /// Pops elements up to the nearest open element with the given name and
    /// passes their data to the handler, innermost first. Stray end tags
    /// leave the stack untouched.
    #[inline]
    pub fn exec_for_end_tag(
        &mut self,
        local_name: &LocalName<'_>,
        popped_handler: impl FnMut(E),
    ) {
        self.stack.pop_up_to(local_name, popped_handler);
    }

    /// Pops all open elements at the end of the input, innermost first.
    #[inline]
    pub fn exec_for_end_of_input(&mut self, popped_handler: impl FnMut(E)) {
        self.stack.pop_all(popped_handler);
    }

    #[inline]
    pub fn current_element_data_mut(&mut self) -> Option<&mut E> {
        self.stack.current_element_data_mut()
    }
}
