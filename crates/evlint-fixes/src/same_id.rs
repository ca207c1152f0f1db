//! EV0003 fix: make the forwarding call use the declared id.

use evlint_rules::model::{EventMethod, ForwardingCall};
use evlint_tree::TreeArena;

use crate::SuggestedFix;

/// Replace the forwarding call's id argument with a copy of the method's
/// declared id expression.
pub(crate) fn use_declared_id(
    arena: &TreeArena,
    method: &EventMethod,
    call: &ForwardingCall,
) -> Vec<SuggestedFix> {
    let Some(declaration) = &method.declaration else { return Vec::new() };
    if declaration.id_expr.is_none() {
        return Vec::new();
    }

    let mut tree = arena.clone();
    let copy = tree.copy_expr(declaration.id_expr);
    if copy.is_none() || !tree.set_call_id_arg(call.call, copy) {
        return Vec::new();
    }

    vec![SuggestedFix { title: "Use the declared event id".to_string(), tree }]
}
