//! Pre-order traversal keyed on [`AnyNodeRef`] rather than one method per
//! node category. `walk` (§6) is built directly on top of this.

use crate::node::AnyNodeRef;
use crate::nodes::*;

/// `True`/`False`/`None`/`...` as distinguished from other constants, for
/// visitors (like the unparser's literal formatter) that special-case them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Singleton {
    None,
    True,
    False,
    Ellipsis,
}

impl Constant {
    pub fn as_singleton(&self) -> Option<Singleton> {
        match self {
            Constant::None => Some(Singleton::None),
            Constant::Bool(true) => Some(Singleton::True),
            Constant::Bool(false) => Some(Singleton::False),
            Constant::Ellipsis => Some(Singleton::Ellipsis),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalSignal {
    Traverse,
    Skip,
}

pub trait PreorderVisitor<'a> {
    fn enter_node(&mut self, node: AnyNodeRef<'a>) -> TraversalSignal {
        let _ = node;
        TraversalSignal::Traverse
    }

    fn leave_node(&mut self, node: AnyNodeRef<'a>) {
        let _ = node;
    }

    fn visit_mod(&mut self, module: &'a Mod) {
        walk_any(self, module.into());
    }

    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        walk_any(self, stmt.into());
    }

    fn visit_expr(&mut self, expr: &'a Expr) {
        walk_any(self, expr.into());
    }

    fn visit_pattern(&mut self, pattern: &'a Pattern) {
        walk_any(self, pattern.into());
    }

    fn visit_bool_op(&mut self, _bool_op: &'a BoolOp) {}
    fn visit_operator(&mut self, _operator: &'a Operator) {}
    fn visit_unary_op(&mut self, _unary_op: &'a UnaryOp) {}
    fn visit_cmp_op(&mut self, _cmp_op: &'a CmpOp) {}
    fn visit_singleton(&mut self, _singleton: &'a Singleton) {}
}

/// Recurses into every child of `node`, in field order, calling
/// `enter_node`/`leave_node` around each. This is also how `walk` (§6) is
/// implemented: a visitor that just records every `enter_node` call.
pub fn walk_any<'a, V: PreorderVisitor<'a> + ?Sized>(visitor: &mut V, node: AnyNodeRef<'a>) {
    if visitor.enter_node(node) == TraversalSignal::Skip {
        return;
    }

    // Emit leaf-value callbacks (operator/bool-op/singleton tags) the same
    // way the source-order visitor does, then recurse into children.
    match node {
        AnyNodeRef::ExprBoolOp(n) => visitor.visit_bool_op(&n.op),
        AnyNodeRef::ExprBinOp(n) => visitor.visit_operator(&n.op),
        AnyNodeRef::StmtAugAssign(n) => visitor.visit_operator(&n.op),
        AnyNodeRef::ExprUnaryOp(n) => visitor.visit_unary_op(&n.op),
        AnyNodeRef::ExprCompare(n) => {
            for op in &n.ops {
                visitor.visit_cmp_op(op);
            }
        }
        AnyNodeRef::ExprConstant(n) => {
            if let Some(singleton) = n.value.as_singleton() {
                visitor.visit_singleton(&singleton);
            }
        }
        AnyNodeRef::PatternMatchSingleton(n) => {
            if let Some(singleton) = n.value.as_singleton() {
                visitor.visit_singleton(&singleton);
            }
        }
        _ => {}
    }

    for child in crate::node::child_nodes(node) {
        dispatch_child(visitor, child);
    }

    visitor.leave_node(node);
}

fn dispatch_child<'a, V: PreorderVisitor<'a> + ?Sized>(visitor: &mut V, child: AnyNodeRef<'a>) {
    walk_any(visitor, child);
}

/// Adapter: drives a source-order [`visitor::Visitor`] preorder-style by
/// reusing [`walk_any`]'s field ordering, so `walk`/`iterChildNodes` do not
/// need to special-case `Stmt` vs `Expr` vs `Pattern`.
pub struct AnyVisitorAdapter<F> {
    pub callback: F,
}

impl<'a, F> PreorderVisitor<'a> for AnyVisitorAdapter<F>
where
    F: FnMut(AnyNodeRef<'a>),
{
    fn enter_node(&mut self, node: AnyNodeRef<'a>) -> TraversalSignal {
        (self.callback)(node);
        TraversalSignal::Traverse
    }
}
