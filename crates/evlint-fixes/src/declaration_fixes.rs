//! Fixes that assign an event id from a class constant's next free slot:
//! adding a missing declaration (EV0009) and renumbering a duplicate
//! (EV0001). Both keep any existing forwarding call's id argument in
//! lock-step with the new declared id.

use evlint_common::Span;
use evlint_rules::EventIdRegistry;
use evlint_rules::model::{EventMethod, EventSourceClass};
use evlint_tree::well_known::{EVENT_ATTRIBUTE_SHORT, NON_EVENT_ATTRIBUTE_SHORT};
use evlint_tree::{BinaryOp, NodeIndex, SymbolBank, TreeArena};

use crate::SuggestedFix;

/// EV0009: one candidate per class constant, each declaring
/// `constant + nextFreeOffset`, plus the opt-out marker as a final
/// alternative. No candidates when the method already carries a marker.
pub(crate) fn for_missing_declaration(
    arena: &TreeArena,
    bank: &SymbolBank,
    class: &EventSourceClass,
    method: &EventMethod,
) -> Vec<SuggestedFix> {
    if method.declaration.is_some() || method.opt_out {
        return Vec::new();
    }

    let registry = EventIdRegistry::build(class);
    let mut fixes = Vec::new();

    for (name, &value) in bank.constants_of(class.node) {
        let offset = registry.next_free_offset(value);
        let mut tree = arena.clone();
        let id_expr = constant_adder_expr(&mut tree, name, offset);
        let attr = tree.add_attribute(EVENT_ATTRIBUTE_SHORT, vec![id_expr], Vec::new(), Span::EMPTY);
        if !tree.push_method_attribute(method.node, attr) {
            continue;
        }
        retarget_forwarding_calls(&mut tree, method, id_expr);
        fixes.push(SuggestedFix {
            title: format!("Add Event attribute ({name} + {offset})"),
            tree,
        });
    }

    let mut tree = arena.clone();
    let attr = tree.add_attribute(NON_EVENT_ATTRIBUTE_SHORT, Vec::new(), Vec::new(), Span::EMPTY);
    if tree.push_method_attribute(method.node, attr) {
        fixes.push(SuggestedFix { title: "Add NonEvent attribute".to_string(), tree });
    }

    fixes
}

/// EV0001: renumber the anchored method under each class constant's next
/// free slot, rewriting the declaration and every forwarding call together.
pub(crate) fn for_duplicate_id(
    arena: &TreeArena,
    bank: &SymbolBank,
    class: &EventSourceClass,
    method: &EventMethod,
) -> Vec<SuggestedFix> {
    let Some(declaration) = &method.declaration else { return Vec::new() };

    let registry = EventIdRegistry::build(class);
    let mut fixes = Vec::new();

    for (name, &value) in bank.constants_of(class.node) {
        let offset = registry.next_free_offset(value);
        let mut tree = arena.clone();
        let id_expr = constant_adder_expr(&mut tree, name, offset);
        if !tree.set_attribute_arg(declaration.attribute, 0, id_expr) {
            continue;
        }
        retarget_forwarding_calls(&mut tree, method, id_expr);
        fixes.push(SuggestedFix {
            title: format!("Use next free id under '{name}' ({name} + {offset})"),
            tree,
        });
    }

    fixes
}

fn constant_adder_expr(tree: &mut TreeArena, constant: &str, offset: i32) -> NodeIndex {
    let ident = tree.add_ident(constant, Span::EMPTY);
    let literal = tree.add_int_literal(i64::from(offset), Span::EMPTY);
    tree.add_binary(BinaryOp::Add, ident, literal, Span::EMPTY)
}

/// Give every forwarding call its own copy of the new id expression.
fn retarget_forwarding_calls(tree: &mut TreeArena, method: &EventMethod, id_expr: NodeIndex) {
    for call in &method.forwarding_calls {
        let copy = tree.copy_expr(id_expr);
        if copy.is_some() {
            tree.set_call_id_arg(call.call, copy);
        }
    }
}
