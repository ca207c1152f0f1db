//! Method-granular checks on the declaration itself.

use evlint_common::Diagnostic;
use evlint_common::diagnostics::diagnostic_codes;

use crate::const_expr::{IdExprShape, classify};
use crate::model::EventMethod;
use crate::RuleCx;

/// EV0009: an externally visible instance method of an event source must
/// carry exactly one of the event declaration or the opt-out marker.
pub(crate) fn check_declaration_presence(
    cx: &RuleCx<'_>,
    method: &EventMethod,
) -> Vec<Diagnostic> {
    let Some(data) = cx.arena.get_method(method.node) else { return Vec::new() };
    if data.is_static() || !data.is_public() {
        return Vec::new();
    }
    // Exactly one marker: both present and both absent are violations.
    if method.declaration.is_some() != method.opt_out {
        return Vec::new();
    }
    vec![cx.report(
        diagnostic_codes::METHOD_NEEDS_EVENT_DECLARATION,
        data.name_span,
        &[&data.name],
    )]
}

/// EV0002: prefer `NamedConstant + offset` over an id that folds from
/// literals alone, however parenthesized.
pub(crate) fn check_constant_adder(cx: &RuleCx<'_>, method: &EventMethod) -> Vec<Diagnostic> {
    let Some(declaration) = &method.declaration else { return Vec::new() };
    if declaration.id_expr.is_none() {
        return Vec::new();
    }
    if classify(cx.arena, declaration.id_expr) != IdExprShape::Literal {
        return Vec::new();
    }
    vec![cx.report(
        diagnostic_codes::USE_CONSTANT_ADDER_FOR_EVENT_ID,
        cx.arena.span(declaration.id_expr),
        &[],
    )]
}
