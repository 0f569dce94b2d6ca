use super::attribute_matcher::AttributeMatcher;
use super::program::{AddressRange, ExecutionBranch, Instr, Program};
use super::{Ast, AstNode, AttributeExpr, AttributeExprOperand, NonAttributeExpr};
use crate::base::Bytes;
use crate::html::LocalName;
use encoding_rs::Encoding;

pub type CompiledNonAttributeExpr = Box<dyn Fn(&LocalName<'_>) -> bool>;
pub type CompiledAttributeExpr = Box<dyn Fn(&AttributeMatcher<'_>) -> bool>;

pub struct CompiledAttributeExprOperand {
    pub name: Bytes<'static>,
    pub value: Bytes<'static>,
    pub case_insensitive: bool,
}

trait CompileOr<T> {
    fn compile_or(self, compile: impl FnOnce(T) -> CompiledAttributeExpr) -> CompiledAttributeExpr;
}

impl<T> CompileOr<T> for Option<T> {
    #[inline]
    fn compile_or(self, compile: impl FnOnce(T) -> CompiledAttributeExpr) -> CompiledAttributeExpr {
        match self {
            Some(v) => compile(v),
            // NOTE: the literal can't be represented in the document
            // encoding, so the expression never matches.
            None => Box::new(|_| false),
        }
    }
}

/// Compiles the AST into instructions that are appended to the program.
pub struct Compiler<P> {
    encoding: &'static Encoding,
    base_address: usize,
    instructions: Vec<Instr<P>>,
    free_space_ptr: usize,
}

impl<P: Copy + 'static> Compiler<P> {
    pub fn new(encoding: &'static Encoding) -> Self {
        Compiler {
            encoding,
            base_address: 0,
            instructions: Vec::default(),
            free_space_ptr: 0,
        }
    }

    fn compile_non_attr_expr(&self, expr: &NonAttributeExpr) -> CompiledNonAttributeExpr {
        match expr {
            NonAttributeExpr::ExplicitAny => Box::new(|_| true),
            NonAttributeExpr::LocalName(local_name) => {
                match LocalName::from_str_without_replacements(local_name, self.encoding)
                    .map(LocalName::into_owned)
                {
                    Some(local_name) => Box::new(move |actual| *actual == local_name),
                    None => Box::new(|_| false),
                }
            }
        }
    }

    #[inline]
    fn compile_literal(&self, lit: &str) -> Option<Bytes<'static>> {
        Bytes::from_str_without_replacements(lit, self.encoding).map(Bytes::into_owned)
    }

    #[inline]
    fn compile_attr_expr_operand(
        &self,
        operand: &AttributeExprOperand,
    ) -> Option<CompiledAttributeExprOperand> {
        Some(CompiledAttributeExprOperand {
            name: self.compile_literal(&operand.name)?,
            value: self.compile_literal(&operand.value)?,
            case_insensitive: operand.case_insensitive,
        })
    }

    fn compile_attr_expr(&self, expr: &AttributeExpr) -> CompiledAttributeExpr {
        macro_rules! compile_operand_expr {
            ($operand:expr, $method:ident) => {
                self.compile_attr_expr_operand($operand)
                    .compile_or(|operand| Box::new(move |m| m.$method(&operand)))
            };
        }

        match expr {
            AttributeExpr::Id(id) => self
                .compile_literal(id)
                .compile_or(|id| Box::new(move |m| m.has_id(&id))),

            AttributeExpr::Class(class) => self
                .compile_literal(class)
                .compile_or(|class| Box::new(move |m| m.has_class(&class))),

            AttributeExpr::AttributeExists(name) => self
                .compile_literal(name)
                .compile_or(|name| Box::new(move |m| m.has_attribute(&name))),

            AttributeExpr::AttributeEqual(operand) => compile_operand_expr!(operand, attr_eq),
            AttributeExpr::AttributeIncludes(operand) => {
                compile_operand_expr!(operand, matches_splitted_by_whitespace)
            }
            AttributeExpr::AttributeDashMatch(operand) => {
                compile_operand_expr!(operand, has_dash_matching_attr)
            }
            AttributeExpr::AttributePrefix(operand) => {
                compile_operand_expr!(operand, has_attr_with_prefix)
            }
            AttributeExpr::AttributeSuffix(operand) => {
                compile_operand_expr!(operand, has_attr_with_suffix)
            }
            AttributeExpr::AttributeSubstring(operand) => {
                compile_operand_expr!(operand, has_attr_with_substring)
            }
        }
    }

    #[inline]
    fn reserve_space_for_nodes(&mut self, nodes: &[AstNode<P>]) -> AddressRange {
        let addr_range = self.free_space_ptr..self.free_space_ptr + nodes.len();

        self.free_space_ptr = addr_range.end;

        debug_assert!(self.free_space_ptr <= self.instructions.len());

        addr_range
    }

    #[inline]
    fn compile_descendants(&mut self, nodes: &[AstNode<P>]) -> Option<AddressRange> {
        if nodes.is_empty() {
            None
        } else {
            Some(self.compile_nodes(nodes))
        }
    }

    fn compile_nodes(&mut self, nodes: &[AstNode<P>]) -> AddressRange {
        // NOTE: we need sibling nodes to be in a contiguous region, so
        // we can reference them by range instead of vector of addresses.
        let addr_range = self.reserve_space_for_nodes(nodes);

        for (i, node) in nodes.iter().enumerate() {
            let associated_branch = ExecutionBranch {
                matched_payload: node.payload.clone(),
                jumps: self.compile_descendants(&node.children),
                hereditary_jumps: self.compile_descendants(&node.descendants),
            };

            self.instructions[addr_range.start + i] = Instr {
                associated_branch,
                non_attr_exprs: node
                    .predicate
                    .non_attr_exprs
                    .iter()
                    .map(|e| self.compile_non_attr_expr(e))
                    .collect(),
                attr_exprs: node
                    .predicate
                    .attr_exprs
                    .iter()
                    .map(|e| self.compile_attr_expr(e))
                    .collect(),
            };
        }

        self.base_address + addr_range.start..self.base_address + addr_range.end
    }

    /// Compiles the AST and appends the instructions to the program.
    pub fn compile_into(mut self, ast: &Ast<P>, program: &mut Program<P>) {
        self.base_address = program.instructions.len();
        self.instructions
            .resize_with(ast.cumulative_node_count, Instr::stub);

        let entry_points = self.compile_nodes(&ast.root);

        program.instructions.append(&mut self.instructions);
        program.entry_points.push(entry_points);
    }
}
