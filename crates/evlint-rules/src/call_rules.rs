//! Checks on forwarding calls: id agreement, call count, argument lists.

use evlint_common::Diagnostic;
use evlint_common::diagnostics::diagnostic_codes;

use crate::model::{EventMethod, EventSourceClass};
use crate::RuleCx;

/// EV0003: the id handed to the emission primitive must fold to the same
/// integer as the declared id.
pub(crate) fn check_forwarded_id_matches(
    cx: &RuleCx<'_>,
    class: &EventSourceClass,
    method: &EventMethod,
) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let Some(declared) = method.declaration.as_ref().and_then(|d| d.id_value) else {
        return out;
    };
    for call in &method.forwarding_calls {
        if call.id_arg.is_none() {
            continue;
        }
        let Some(forwarded) = cx.bank.fold_i32(cx.arena, call.id_arg, class.node) else {
            continue;
        };
        if forwarded != declared {
            out.push(cx.report(
                diagnostic_codes::FORWARDED_ID_MUST_MATCH_DECLARED_ID,
                cx.arena.span(call.id_arg),
                &[&forwarded.to_string(), &declared.to_string()],
            ));
        }
    }
    out
}

/// EV0004: the forwarded id must be a compile-time constant at all.
/// Independent of EV0003 and of whether the method declares an id.
pub(crate) fn check_forwarded_id_constant(
    cx: &RuleCx<'_>,
    class: &EventSourceClass,
    method: &EventMethod,
) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for call in &method.forwarding_calls {
        let span = if call.id_arg.is_some() {
            if cx.bank.fold_i32(cx.arena, call.id_arg, class.node).is_some() {
                continue;
            }
            cx.arena.span(call.id_arg)
        } else {
            cx.arena.span(call.call)
        };
        out.push(cx.report(diagnostic_codes::FORWARDED_ID_SHOULD_BE_CONSTANT, span, &[]));
    }
    out
}

/// EV0006: a declared event whose body never forwards anything.
/// Bodiless methods are still being typed and are skipped.
pub(crate) fn check_no_forwarding_call(cx: &RuleCx<'_>, method: &EventMethod) -> Vec<Diagnostic> {
    if method.declaration.is_none() {
        return Vec::new();
    }
    let Some(data) = cx.arena.get_method(method.node) else { return Vec::new() };
    if data.body.is_none() || !method.forwarding_calls.is_empty() {
        return Vec::new();
    }
    vec![cx.report(diagnostic_codes::NO_FORWARDING_CALL, cx.arena.span(data.body), &[])]
}

/// EV0005: more than one forwarding call in a declared event's body.
pub(crate) fn check_multiple_forwarding_calls(
    cx: &RuleCx<'_>,
    method: &EventMethod,
) -> Vec<Diagnostic> {
    if method.declaration.is_none() || method.forwarding_calls.len() <= 1 {
        return Vec::new();
    }
    let Some(data) = cx.arena.get_method(method.node) else { return Vec::new() };
    vec![cx.report(diagnostic_codes::MULTIPLE_FORWARDING_CALLS, cx.arena.span(data.body), &[])]
}

/// EV0007: forwarded arguments present and countable, but some position does
/// not name the parameter declared there. Only meaningful when the counts
/// agree; count mismatches are EV0008's.
pub(crate) fn check_parameter_order(cx: &RuleCx<'_>, method: &EventMethod) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    if method.declaration.is_none() {
        return out;
    }
    let Some(data) = cx.arena.get_method(method.node) else { return out };
    for call in &method.forwarding_calls {
        if call.forwarded.len() != data.params.len() {
            continue;
        }
        let misordered = data.params.iter().zip(&call.forwarded).any(|(param, &arg)| {
            cx.arena.get_ident(arg).is_none_or(|ident| ident.name != param.name)
        });
        if misordered {
            out.push(cx.report(
                diagnostic_codes::PARAMETERS_OUT_OF_ORDER,
                call.arguments_span(cx.arena),
                &[],
            ));
        }
    }
    out
}

/// EV0008: the forwarded argument count differs from the declared parameter
/// count.
pub(crate) fn check_all_parameters_passed(
    cx: &RuleCx<'_>,
    method: &EventMethod,
) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    if method.declaration.is_none() {
        return out;
    }
    let Some(data) = cx.arena.get_method(method.node) else { return out };
    for call in &method.forwarding_calls {
        if call.forwarded.len() == data.params.len() {
            continue;
        }
        out.push(cx.report(
            diagnostic_codes::NOT_ALL_PARAMETERS_FORWARDED,
            call.arguments_span(cx.arena),
            &[],
        ));
    }
    out
}
