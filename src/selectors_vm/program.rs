use super::attribute_matcher::AttributeMatcher;
use super::compiler::{CompiledAttributeExpr, CompiledNonAttributeExpr};
use crate::html::LocalName;
use std::ops::Range;

pub type AddressRange = Range<usize>;

/// What happens once an instruction matches: the payload of the selectors
/// that are fully matched and the addresses of the instructions that should
/// be tried for the element's children (`jumps`) and for all of its
/// descendants (`hereditary_jumps`).
#[derive(Debug)]
pub struct ExecutionBranch<P> {
    pub matched_payload: Vec<P>,
    pub jumps: Option<AddressRange>,
    pub hereditary_jumps: Option<AddressRange>,
}

impl<P> Default for ExecutionBranch<P> {
    fn default() -> Self {
        ExecutionBranch {
            matched_payload: Vec::default(),
            jumps: None,
            hereditary_jumps: None,
        }
    }
}

pub struct Instr<P> {
    pub associated_branch: ExecutionBranch<P>,
    pub non_attr_exprs: Vec<CompiledNonAttributeExpr>,
    pub attr_exprs: Vec<CompiledAttributeExpr>,
}

impl<P> Instr<P> {
    /// Placeholder for the address reserved by the compiler.
    #[inline]
    pub fn stub() -> Self {
        Instr {
            associated_branch: ExecutionBranch::default(),
            non_attr_exprs: Vec::default(),
            attr_exprs: Vec::default(),
        }
    }

    #[inline]
    pub fn exec(
        &self,
        local_name: &LocalName<'_>,
        attr_matcher: &AttributeMatcher<'_>,
    ) -> Option<&ExecutionBranch<P>> {
        let is_match = self.non_attr_exprs.iter().all(|e| e(local_name))
            && self.attr_exprs.iter().all(|e| e(attr_matcher));

        is_match.then_some(&self.associated_branch)
    }
}

/// Instructions of all the registered selectors.
///
/// Every registration is compiled into its own address region, so addresses
/// memoized on the open element stack stay valid when selectors are added
/// in the middle of the stream.
pub struct Program<P> {
    pub instructions: Vec<Instr<P>>,
    pub entry_points: Vec<AddressRange>,
}

impl<P> Default for Program<P> {
    fn default() -> Self {
        Program {
            instructions: Vec::default(),
            entry_points: Vec::default(),
        }
    }
}
