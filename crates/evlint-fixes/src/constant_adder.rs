//! EV0002 fix: wrap a literal-only id as `constant + originalLiteral`.

use evlint_common::Span;
use evlint_rules::const_expr::{IdExprShape, classify};
use evlint_rules::model::{EventMethod, EventSourceClass};
use evlint_tree::{BinaryOp, NodeIndex, SymbolBank, TreeArena};

use crate::SuggestedFix;

/// One candidate per class constant. The declaration's id expression becomes
/// `constant + <original expression>` and every forwarding call's id argument
/// is rewritten to the identical expression, keeping the two in lock-step.
pub(crate) fn wrap_literal(
    arena: &TreeArena,
    bank: &SymbolBank,
    class: &EventSourceClass,
    method: &EventMethod,
) -> Vec<SuggestedFix> {
    let Some(declaration) = &method.declaration else { return Vec::new() };
    if declaration.id_expr.is_none() {
        return Vec::new();
    }
    // Stale-context guard: only literal-shaped ids are wrappable.
    if classify(arena, declaration.id_expr) != IdExprShape::Literal {
        return Vec::new();
    }

    let original_text = arena.expr_text(declaration.id_expr);
    let mut fixes = Vec::new();

    for (name, _) in bank.constants_of(class.node) {
        let mut tree = arena.clone();
        let wrapped = wrap_with_constant(&mut tree, declaration.id_expr, name);
        if !tree.set_attribute_arg(declaration.attribute, 0, wrapped) {
            continue;
        }
        for call in &method.forwarding_calls {
            let call_expr = wrap_with_constant(&mut tree, declaration.id_expr, name);
            tree.set_call_id_arg(call.call, call_expr);
        }
        fixes.push(SuggestedFix {
            title: format!("Use '{name} + {original_text}' for the event id"),
            tree,
        });
    }

    fixes
}

fn wrap_with_constant(tree: &mut TreeArena, original: NodeIndex, constant: &str) -> NodeIndex {
    let ident = tree.add_ident(constant, Span::EMPTY);
    let copy = tree.copy_expr(original);
    tree.add_binary(BinaryOp::Add, ident, copy, Span::EMPTY)
}
