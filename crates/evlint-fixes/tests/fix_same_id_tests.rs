//! EV0003 fix: replace the forwarded id with a copy of the declared one.

use evlint_common::Diagnostic;
use evlint_common::diagnostics::diagnostic_codes;
use evlint_fixes::{SuggestedFix, fixes_for};
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

fn mismatched_program() -> TreeArena {
    let mut b = ProgramBuilder::new("test_events");
    let class = b.start_class("TestEvents", Some("EventSource"));
    b.const_field(class, "NormalEvents", 100);
    let m = b.start_method(class, "EventTwo", &[("arg1", "string"), ("arg2", "string")]);
    let id = b.constant_adder("NormalEvents", 2);
    b.event_attribute(m, id);
    let call_id = b.constant_adder("NormalEvents", 10);
    b.write_event(m, call_id, &["arg1", "arg2"]);
    b.finish()
}

#[test]
fn single_candidate_replaces_the_forwarded_id() {
    let arena = mismatched_program();
    let diags = analyze_tree(&arena);
    let diag = diags
        .iter()
        .find(|d| d.code == diagnostic_codes::FORWARDED_ID_MUST_MATCH_DECLARED_ID)
        .expect("EV0003 expected");

    let candidates = fixes(&arena, diag);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].title, "Use the declared event id");

    let fixed = &candidates[0].tree;
    let bank = bind(fixed);
    let session = AnalysisSession::with_defaults(&bank);
    let wk = session.well_known().expect("defaults registered");
    let classes = model::event_source_classes(fixed, &bank, &wk);
    let method = &classes[0].methods[0];
    let call = method.forwarding_calls.first().expect("one call");
    assert_eq!(fixed.expr_text(call.id_arg), "NormalEvents + 2", "copy of the declared id");
    assert_eq!(bank.fold_i32(fixed, call.id_arg, classes[0].node), Some(102));
}

#[test]
fn refolding_after_the_fix_reports_nothing() {
    let arena = mismatched_program();
    let diags = analyze_tree(&arena);
    let diag = diags
        .iter()
        .find(|d| d.code == diagnostic_codes::FORWARDED_ID_MUST_MATCH_DECLARED_ID)
        .expect("EV0003 expected");

    let fixed = &fixes(&arena, diag)[0].tree;
    let after = analyze_tree(fixed);
    assert!(
        !after.iter().any(|d| d.code == diagnostic_codes::FORWARDED_ID_MUST_MATCH_DECLARED_ID),
        "re-analysis must not re-report EV0003: {after:?}"
    );
}

#[test]
fn stale_anchor_yields_no_candidates() {
    let arena = mismatched_program();
    let diags = analyze_tree(&arena);
    let mut diag = diags
        .iter()
        .find(|d| d.code == diagnostic_codes::FORWARDED_ID_MUST_MATCH_DECLARED_ID)
        .expect("EV0003 expected")
        .clone();
    diag.start += 10_000;
    assert!(fixes(&arena, &diag).is_empty());
}
