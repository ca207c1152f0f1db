//! Class-granular checks.

use evlint_common::Diagnostic;
use evlint_common::diagnostics::diagnostic_codes;

use crate::event_ids::EventIdRegistry;
use crate::model::EventSourceClass;
use crate::RuleCx;

/// EV0001: every event id may be declared by at most one method per class.
///
/// Fires once per duplicated id, anchored at the first declaring method and
/// naming every sharer; each sharer is attached as related information.
pub(crate) fn check_duplicate_event_ids(
    cx: &RuleCx<'_>,
    class: &EventSourceClass,
    registry: &EventIdRegistry,
) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for (id, methods) in registry.duplicates() {
        let names: Vec<String> = methods.iter().map(|&m| cx.method_name(m)).collect();
        let first = methods[0];
        let mut diagnostic = cx.report(
            diagnostic_codes::DUPLICATE_EVENT_ID,
            cx.method_name_span(first),
            &[&id.to_string(), &names.join(", ")],
        );
        for (&method, name) in methods.iter().zip(&names) {
            diagnostic = diagnostic.with_related(
                cx.file(),
                cx.method_name_span(method),
                format!("Method '{name}' declares event id {id}"),
            );
        }
        out.push(diagnostic);
    }
    out
}
