use super::parser::Selector;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Combinator {
    Child,
    Descendant,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct AttributeExprOperand {
    pub name: String,
    pub value: String,
    pub case_insensitive: bool,
}

/// Expressions that can be checked using only the tag name.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum NonAttributeExpr {
    ExplicitAny,
    LocalName(String),
}

/// Expressions that require attributes of the element.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AttributeExpr {
    Id(String),
    Class(String),
    AttributeExists(String),
    AttributeEqual(AttributeExprOperand),
    AttributeIncludes(AttributeExprOperand),
    AttributeDashMatch(AttributeExprOperand),
    AttributePrefix(AttributeExprOperand),
    AttributeSuffix(AttributeExprOperand),
    AttributeSubstring(AttributeExprOperand),
}

/// Conjunction of the simple selectors of a compound selector.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Predicate {
    pub non_attr_exprs: Vec<NonAttributeExpr>,
    pub attr_exprs: Vec<AttributeExpr>,
}

impl Predicate {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.non_attr_exprs.is_empty() && self.attr_exprs.is_empty()
    }
}

/// Compound selector along with the combinator that links it to the
/// next compound selector in the complex selector, if there is one.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CompoundSelector {
    pub predicate: Predicate,
    pub combinator: Option<Combinator>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct AstNode<P> {
    pub predicate: Predicate,
    pub children: Vec<AstNode<P>>,
    pub descendants: Vec<AstNode<P>>,
    pub payload: Vec<P>,
}

impl<P> AstNode<P> {
    fn new(predicate: Predicate) -> Self {
        AstNode {
            predicate,
            children: Vec::default(),
            descendants: Vec::default(),
            payload: Vec::default(),
        }
    }
}

/// Selectors merged into a tree: complex selectors that start with the same
/// compound selectors share the nodes for them.
#[derive(Debug, PartialEq, Eq)]
pub struct Ast<P> {
    pub root: Vec<AstNode<P>>,
    // NOTE: used to preallocate instruction vector during compilation.
    pub cumulative_node_count: usize,
}

impl<P> Default for Ast<P> {
    fn default() -> Self {
        Ast {
            root: Vec::default(),
            cumulative_node_count: 0,
        }
    }
}

impl<P: PartialEq + Eq + Copy> Ast<P> {
    #[inline]
    fn host_predicate(
        predicate: &Predicate,
        branches: &mut Vec<AstNode<P>>,
        cumulative_node_count: &mut usize,
    ) -> usize {
        match branches.iter().position(|n| n.predicate == *predicate) {
            Some(idx) => idx,
            None => {
                branches.push(AstNode::new(predicate.clone()));
                *cumulative_node_count += 1;

                branches.len() - 1
            }
        }
    }

    pub fn add_selector(&mut self, selector: &Selector, payload: P) {
        for complex_selector in selector.complex_selectors() {
            let mut branches = &mut self.root;

            for compound in complex_selector {
                let node_idx = Self::host_predicate(
                    &compound.predicate,
                    branches,
                    &mut self.cumulative_node_count,
                );

                match compound.combinator {
                    Some(Combinator::Child) => branches = &mut branches[node_idx].children,
                    Some(Combinator::Descendant) => {
                        branches = &mut branches[node_idx].descendants
                    }
                    None => {
                        let node_payload = &mut branches[node_idx].payload;

                        if !node_payload.contains(&payload) {
                            node_payload.push(payload);
                        }

                        break;
                    }
                }
            }
        }
    }
}
