//! Rule engine for the event-source logging convention.
//!
//! The engine is organized like a small checker pipeline:
//! - `session` - per-compilation context: well-known type resolution and
//!   cancellation (the capability gate)
//! - `model` - derived views of event-source classes, recomputed per pass
//! - `const_expr` - id expression shape classification
//! - `event_ids` - per-class id table, duplicates and next-free-slot
//! - `class_rules` / `method_rules` / `call_rules` - the nine checks
//!
//! [`analyze`] runs everything over one bound program and returns an ordered
//! diagnostic list. Each rule is isolated: a panic inside one rule drops that
//! rule's output for that class and nothing else.

use std::panic::{AssertUnwindSafe, catch_unwind};

use evlint_common::diagnostics::{
    DiagnosticCategory, format_message, get_category, get_message_template,
};
use evlint_common::{Diagnostic, Span};
use evlint_tree::{NodeIndex, SymbolBank, TreeArena};
use tracing::{debug, warn};

pub mod const_expr;
pub mod event_ids;
pub mod model;
pub mod session;

mod call_rules;
mod class_rules;
mod method_rules;

pub use const_expr::{IdExprShape, classify};
pub use event_ids::EventIdRegistry;
pub use session::{AnalysisSession, WellKnownTypes};

/// Shared read-only context handed to every rule.
pub struct RuleCx<'a> {
    pub arena: &'a TreeArena,
    pub bank: &'a SymbolBank,
    file: &'a str,
}

impl<'a> RuleCx<'a> {
    pub(crate) fn file(&self) -> &'a str {
        self.file
    }

    pub(crate) fn report(&self, code: u32, span: Span, args: &[&str]) -> Diagnostic {
        let category = get_category(code).unwrap_or(DiagnosticCategory::Error);
        let template = get_message_template(code).unwrap_or("");
        Diagnostic::new(category, code, self.file, span, format_message(template, args))
    }

    pub(crate) fn method_name(&self, method: NodeIndex) -> String {
        self.arena.get_method(method).map(|m| m.name.clone()).unwrap_or_default()
    }

    pub(crate) fn method_name_span(&self, method: NodeIndex) -> Span {
        self.arena.get_method(method).map(|m| m.name_span).unwrap_or(Span::EMPTY)
    }
}

/// Run the full rule set over one bound program.
///
/// Returns the empty list when the well-known types do not resolve (the
/// capability gate) or when the session is cancelled mid-pass — never a
/// truncated set.
pub fn analyze(arena: &TreeArena, bank: &SymbolBank, session: &AnalysisSession<'_>) -> Vec<Diagnostic> {
    let Some(well_known) = session.well_known() else {
        debug!("well-known types unresolved; analysis disabled for {}", arena.source_name());
        return Vec::new();
    };

    let cx = RuleCx { arena, bank, file: arena.source_name() };
    let mut diagnostics = Vec::new();

    for class in model::event_source_classes(arena, bank, &well_known) {
        if session.token().is_cancelled() {
            debug!("analysis cancelled; discarding partial results");
            return Vec::new();
        }

        let registry = EventIdRegistry::build(&class);
        run_rule("duplicate_event_ids", &mut diagnostics, || {
            class_rules::check_duplicate_event_ids(&cx, &class, &registry)
        });

        for method in &class.methods {
            if session.token().is_cancelled() {
                debug!("analysis cancelled; discarding partial results");
                return Vec::new();
            }
            run_rule("declaration_presence", &mut diagnostics, || {
                method_rules::check_declaration_presence(&cx, method)
            });
            run_rule("constant_adder_id", &mut diagnostics, || {
                method_rules::check_constant_adder(&cx, method)
            });
            run_rule("forwarded_id_matches", &mut diagnostics, || {
                call_rules::check_forwarded_id_matches(&cx, &class, method)
            });
            run_rule("forwarded_id_constant", &mut diagnostics, || {
                call_rules::check_forwarded_id_constant(&cx, &class, method)
            });
            run_rule("no_forwarding_call", &mut diagnostics, || {
                call_rules::check_no_forwarding_call(&cx, method)
            });
            run_rule("multiple_forwarding_calls", &mut diagnostics, || {
                call_rules::check_multiple_forwarding_calls(&cx, method)
            });
            run_rule("parameter_order", &mut diagnostics, || {
                call_rules::check_parameter_order(&cx, method)
            });
            run_rule("all_parameters_passed", &mut diagnostics, || {
                call_rules::check_all_parameters_passed(&cx, method)
            });
        }
    }

    diagnostics
}

/// Isolate one rule evaluation: its diagnostics are kept on success and
/// dropped on panic, without disturbing sibling rules or classes.
fn run_rule(name: &str, sink: &mut Vec<Diagnostic>, rule: impl FnOnce() -> Vec<Diagnostic>) {
    match catch_unwind(AssertUnwindSafe(rule)) {
        Ok(mut found) => sink.append(&mut found),
        Err(_) => warn!(rule = name, "rule evaluation panicked; its diagnostics were dropped"),
    }
}
