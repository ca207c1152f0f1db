//! EV0002 fix: wrap a bare-literal id as `constant + literal`, rewriting the
//! declaration and the forwarding call identically.

use evlint_common::{Diagnostic, Span};
use evlint_common::diagnostics::{DiagnosticCategory, diagnostic_codes};
use evlint_fixes::{SuggestedFix, fixes_for};
use evlint_rules::const_expr::{IdExprShape, classify};
use evlint_rules::{AnalysisSession, analyze, model};
use evlint_tree::{AmbientTypes, ProgramBuilder, SymbolBank, TreeArena};

fn bind(arena: &TreeArena) -> SymbolBank {
    SymbolBank::bind(arena, &AmbientTypes::tracing_defaults())
}

fn analyze_tree(arena: &TreeArena) -> Vec<Diagnostic> {
    let bank = bind(arena);
    let session = AnalysisSession::with_defaults(&bank);
    analyze(arena, &bank, &session)
}

fn fixes(arena: &TreeArena, diagnostic: &Diagnostic) -> Vec<SuggestedFix> {
    let bank = bind(arena);
    let session = AnalysisSession::with_defaults(&bank);
    fixes_for(diagnostic, arena, &bank, &session)
}

fn literal_id_program() -> TreeArena {
    let mut b = ProgramBuilder::new("test_events");
    let class = b.start_class("TestEvents", Some("EventSource"));
    b.const_field(class, "Base", 100);
    let m = b.start_method(class, "EventOne", &[("arg1", "string")]);
    let id = b.lit(1);
    b.event_attribute(m, id);
    let call_id = b.lit(1);
    b.write_event(m, call_id, &["arg1"]);
    b.finish()
}

fn event_one(arena: &TreeArena) -> (Option<i32>, String, String) {
    let bank = bind(arena);
    let session = AnalysisSession::with_defaults(&bank);
    let wk = session.well_known().expect("defaults registered");
    let classes = model::event_source_classes(arena, &bank, &wk);
    let method = &classes[0].methods[0];
    let declaration = method.declaration.as_ref().expect("declared");
    let call = method.forwarding_calls.first().expect("one forwarding call");
    (
        declaration.id_value,
        arena.expr_text(declaration.id_expr),
        arena.expr_text(call.id_arg),
    )
}

#[test]
fn wraps_declaration_and_call_in_lock_step() {
    let arena = literal_id_program();
    let diags = analyze_tree(&arena);
    let diag = diags
        .iter()
        .find(|d| d.code == diagnostic_codes::USE_CONSTANT_ADDER_FOR_EVENT_ID)
        .expect("EV0002 expected for a bare literal");

    let candidates = fixes(&arena, diag);
    assert_eq!(candidates.len(), 1, "one candidate per class constant");
    assert_eq!(candidates[0].title, "Use 'Base + 1' for the event id");

    let fixed = &candidates[0].tree;
    let (id_value, id_text, call_text) = event_one(fixed);
    assert_eq!(id_text, "Base + 1");
    assert_eq!(call_text, "Base + 1", "the forwarding call is rewritten identically");
    assert_eq!(id_value, Some(101), "Base(100) + original literal 1");
}

#[test]
fn rewrapped_id_classifies_as_adder_and_stays_silent() {
    let arena = literal_id_program();
    let diags = analyze_tree(&arena);
    let diag = diags
        .iter()
        .find(|d| d.code == diagnostic_codes::USE_CONSTANT_ADDER_FOR_EVENT_ID)
        .expect("EV0002 expected");

    let fixed = &fixes(&arena, diag)[0].tree;

    // The classifier itself agrees the new shape is the canonical style.
    let bank = bind(fixed);
    let session = AnalysisSession::with_defaults(&bank);
    let wk = session.well_known().expect("defaults registered");
    let classes = model::event_source_classes(fixed, &bank, &wk);
    let declaration = classes[0].methods[0].declaration.as_ref().expect("declared");
    assert_eq!(classify(fixed, declaration.id_expr), IdExprShape::ConstantAdder);

    let after = analyze_tree(fixed);
    assert!(
        !after.iter().any(|d| d.code == diagnostic_codes::USE_CONSTANT_ADDER_FOR_EVENT_ID),
        "re-analysis must not re-report EV0002: {after:?}"
    );
    assert!(
        !after.iter().any(|d| d.code == diagnostic_codes::FORWARDED_ID_MUST_MATCH_DECLARED_ID),
        "lock-step rewrite keeps the ids equal: {after:?}"
    );
}

#[test]
fn one_candidate_per_constant_in_declaration_order() {
    let mut b = ProgramBuilder::new("test_events");
    let class = b.start_class("TestEvents", Some("EventSource"));
    b.const_field(class, "NormalEvents", 100);
    b.const_field(class, "ErrorEvents", 200);
    let m = b.start_method(class, "EventOne", &[]);
    let id = b.lit(3);
    b.event_attribute(m, id);
    let call_id = b.lit(3);
    b.write_event(m, call_id, &[]);
    let arena = b.finish();

    let diags = analyze_tree(&arena);
    let diag = diags
        .iter()
        .find(|d| d.code == diagnostic_codes::USE_CONSTANT_ADDER_FOR_EVENT_ID)
        .expect("EV0002 expected");
    let titles: Vec<String> = fixes(&arena, diag).iter().map(|f| f.title.clone()).collect();
    assert_eq!(titles, vec![
        "Use 'NormalEvents + 3' for the event id",
        "Use 'ErrorEvents + 3' for the event id",
    ]);
}

#[test]
fn stale_or_mismatched_anchor_yields_no_candidates() {
    let arena = literal_id_program();

    let fabricated = Diagnostic::new(
        DiagnosticCategory::Warning,
        diagnostic_codes::USE_CONSTANT_ADDER_FOR_EVENT_ID,
        "test_events",
        Span::EMPTY,
        "stale",
    );
    assert!(fixes(&arena, &fabricated).is_empty(), "empty spans never anchor");

    // A span pointing at an already-canonical id is shape-mismatched.
    let mut b = ProgramBuilder::new("test_events");
    let class = b.start_class("TestEvents", Some("EventSource"));
    b.const_field(class, "Base", 100);
    let m = b.start_method(class, "EventOne", &[]);
    let id = b.constant_adder("Base", 1);
    b.event_attribute(m, id);
    let call_id = b.constant_adder("Base", 1);
    b.write_event(m, call_id, &[]);
    let adder_arena = b.finish();
    let id_span = adder_arena.span(id);

    let mismatched = Diagnostic::new(
        DiagnosticCategory::Warning,
        diagnostic_codes::USE_CONSTANT_ADDER_FOR_EVENT_ID,
        "test_events",
        id_span,
        "stale",
    );
    assert!(fixes(&adder_arena, &mismatched).is_empty());
}
