//! EV0007 / EV0008 fix: rebuild the forwarding call's argument list.

use evlint_common::Span;
use evlint_rules::model::{EventMethod, ForwardingCall};
use evlint_tree::TreeArena;

use crate::SuggestedFix;

/// Rebuild the arguments as `[id] ++ [one reference per declared parameter,
/// in declared order]`, discarding extra or misordered arguments. The id
/// argument is preserved; when the call has none, the declared id expression
/// is used instead.
pub(crate) fn rebuild(
    arena: &TreeArena,
    method: &EventMethod,
    call: &ForwardingCall,
) -> Vec<SuggestedFix> {
    let Some(data) = arena.get_method(method.node) else { return Vec::new() };
    let params: Vec<String> = data.params.iter().map(|p| p.name.clone()).collect();

    let mut tree = arena.clone();
    let id_arg = if call.id_arg.is_some() {
        call.id_arg
    } else {
        match &method.declaration {
            Some(declaration) if declaration.id_expr.is_some() => {
                tree.copy_expr(declaration.id_expr)
            }
            _ => return Vec::new(),
        }
    };
    if id_arg.is_none() {
        return Vec::new();
    }

    let mut args = Vec::with_capacity(params.len() + 1);
    args.push(id_arg);
    for name in &params {
        args.push(tree.add_ident(name, Span::EMPTY));
    }
    if !tree.set_call_args(call.call, args) {
        return Vec::new();
    }

    vec![SuggestedFix {
        title: "Forward the declared parameters to WriteEvent in order".to_string(),
        tree,
    }]
}
