//! Fix synthesis for evlint diagnostics.
//!
//! Every fix is a pure `(tree, diagnostic context) -> new tree` function: the
//! input arena is cloned, the clone is edited, and the result is returned as
//! an independently presentable candidate. Re-running the rule set over a
//! candidate must not re-report the fixed diagnostic.
//!
//! Anchors are re-located from the diagnostic's span through a freshly
//! derived model. A stale anchor — the span no longer matches the expected
//! shape — yields no candidates rather than a malformed tree.

use evlint_common::{Diagnostic, Span};
use evlint_common::diagnostics::diagnostic_codes;
use evlint_rules::model::{self, EventMethod, EventSourceClass, ForwardingCall};
use evlint_rules::AnalysisSession;
use evlint_tree::{SymbolBank, TreeArena};
use tracing::debug;

mod add_call;
mod constant_adder;
mod declaration_fixes;
mod forward_args;
mod same_id;

/// One candidate edit: a title for presentation and the resulting tree.
#[derive(Clone, Debug)]
pub struct SuggestedFix {
    pub title: String,
    pub tree: TreeArena,
}

/// Candidate fixes for one diagnostic, in stable order.
pub fn fixes_for(
    diagnostic: &Diagnostic,
    arena: &TreeArena,
    bank: &SymbolBank,
    session: &AnalysisSession<'_>,
) -> Vec<SuggestedFix> {
    let Some(well_known) = session.well_known() else { return Vec::new() };
    let classes = model::event_source_classes(arena, bank, &well_known);
    let span = diagnostic.span();

    let fixes = match diagnostic.code {
        diagnostic_codes::METHOD_NEEDS_EVENT_DECLARATION => {
            find_method_by_name_span(&classes, arena, span)
                .map(|(class, method)| {
                    declaration_fixes::for_missing_declaration(arena, bank, class, method)
                })
                .unwrap_or_default()
        }
        diagnostic_codes::DUPLICATE_EVENT_ID => find_method_by_name_span(&classes, arena, span)
            .map(|(class, method)| declaration_fixes::for_duplicate_id(arena, bank, class, method))
            .unwrap_or_default(),
        diagnostic_codes::USE_CONSTANT_ADDER_FOR_EVENT_ID => {
            find_method_by_id_expr_span(&classes, arena, span)
                .map(|(class, method)| constant_adder::wrap_literal(arena, bank, class, method))
                .unwrap_or_default()
        }
        diagnostic_codes::FORWARDED_ID_MUST_MATCH_DECLARED_ID => {
            find_call_by_id_arg_span(&classes, arena, span)
                .map(|(_, method, call)| same_id::use_declared_id(arena, method, call))
                .unwrap_or_default()
        }
        diagnostic_codes::PARAMETERS_OUT_OF_ORDER
        | diagnostic_codes::NOT_ALL_PARAMETERS_FORWARDED => {
            find_call_by_arguments_span(&classes, arena, span)
                .map(|(_, method, call)| forward_args::rebuild(arena, method, call))
                .unwrap_or_default()
        }
        diagnostic_codes::NO_FORWARDING_CALL => find_method_by_body_span(&classes, arena, span)
            .map(|(_, method)| add_call::append_forwarding_call(arena, method))
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    debug!(
        code = diagnostic.code,
        candidates = fixes.len(),
        "synthesized fixes for {}",
        diagnostic.display_code()
    );
    fixes
}

fn find_method_by_name_span<'a>(
    classes: &'a [EventSourceClass],
    arena: &TreeArena,
    span: Span,
) -> Option<(&'a EventSourceClass, &'a EventMethod)> {
    if span.is_empty() {
        return None;
    }
    for class in classes {
        for method in &class.methods {
            if arena.get_method(method.node).is_some_and(|m| m.name_span == span) {
                return Some((class, method));
            }
        }
    }
    None
}

fn find_method_by_id_expr_span<'a>(
    classes: &'a [EventSourceClass],
    arena: &TreeArena,
    span: Span,
) -> Option<(&'a EventSourceClass, &'a EventMethod)> {
    if span.is_empty() {
        return None;
    }
    for class in classes {
        for method in &class.methods {
            let Some(declaration) = &method.declaration else { continue };
            if declaration.id_expr.is_some() && arena.span(declaration.id_expr) == span {
                return Some((class, method));
            }
        }
    }
    None
}

fn find_call_by_id_arg_span<'a>(
    classes: &'a [EventSourceClass],
    arena: &TreeArena,
    span: Span,
) -> Option<(&'a EventSourceClass, &'a EventMethod, &'a ForwardingCall)> {
    if span.is_empty() {
        return None;
    }
    for class in classes {
        for method in &class.methods {
            for call in &method.forwarding_calls {
                if call.id_arg.is_some() && arena.span(call.id_arg) == span {
                    return Some((class, method, call));
                }
            }
        }
    }
    None
}

fn find_call_by_arguments_span<'a>(
    classes: &'a [EventSourceClass],
    arena: &TreeArena,
    span: Span,
) -> Option<(&'a EventSourceClass, &'a EventMethod, &'a ForwardingCall)> {
    if span.is_empty() {
        return None;
    }
    for class in classes {
        for method in &class.methods {
            for call in &method.forwarding_calls {
                if call.arguments_span(arena) == span {
                    return Some((class, method, call));
                }
            }
        }
    }
    None
}

fn find_method_by_body_span<'a>(
    classes: &'a [EventSourceClass],
    arena: &TreeArena,
    span: Span,
) -> Option<(&'a EventSourceClass, &'a EventMethod)> {
    if span.is_empty() {
        return None;
    }
    for class in classes {
        for method in &class.methods {
            let Some(data) = arena.get_method(method.node) else { continue };
            if data.body.is_some() && arena.span(data.body) == span {
                return Some((class, method));
            }
        }
    }
    None
}
