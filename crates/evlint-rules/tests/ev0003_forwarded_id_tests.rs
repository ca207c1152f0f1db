//! EV0003 / EV0004: the forwarded event id must be a constant and must agree
//! with the declared id. The two checks are independent.

use evlint_common::Diagnostic;
use evlint_common::diagnostics::diagnostic_codes;
use evlint_rules::{AnalysisSession, analyze};
use evlint_tree::{AmbientTypes, ProgramBuilder, SymbolBank};

fn run(build: impl FnOnce(&mut ProgramBuilder)) -> Vec<Diagnostic> {
    let mut b = ProgramBuilder::new("test_events");
    build(&mut b);
    let arena = b.finish();
    let bank = SymbolBank::bind(&arena, &AmbientTypes::tracing_defaults());
    let session = AnalysisSession::with_defaults(&bank);
    analyze(&arena, &bank, &session)
}

fn codes(diags: &[Diagnostic]) -> Vec<u32> {
    diags.iter().map(|d| d.code).collect()
}

#[test]
fn mismatched_constant_id_reports_both_values() {
    let diags = run(|b| {
        let class = b.start_class("TestEvents", Some("EventSource"));
        b.const_field(class, "NormalEvents", 100);
        let m = b.start_method(class, "EventTwo", &[("arg1", "string"), ("arg2", "string")]);
        let id = b.constant_adder("NormalEvents", 2);
        b.event_attribute(m, id);
        let call_id = b.constant_adder("NormalEvents", 10);
        b.write_event(m, call_id, &["arg1", "arg2"]);
    });

    let diag = diags
        .iter()
        .find(|d| d.code == diagnostic_codes::FORWARDED_ID_MUST_MATCH_DECLARED_ID)
        .expect("EV0003 expected for a mismatched id");
    assert!(diag.message_text.contains("110"), "forwarded value: {}", diag.message_text);
    assert!(diag.message_text.contains("102"), "declared value: {}", diag.message_text);
}

#[test]
fn agreeing_ids_are_silent() {
    let diags = run(|b| {
        let class = b.start_class("TestEvents", Some("EventSource"));
        b.const_field(class, "NormalEvents", 100);
        let m = b.start_method(class, "EventOne", &[("arg1", "string")]);
        let id = b.constant_adder("NormalEvents", 1);
        b.event_attribute(m, id);
        // Written differently but folding to the same value.
        let call_id = b.lit(101);
        b.write_event(m, call_id, &["arg1"]);
    });
    assert!(
        !codes(&diags).contains(&diagnostic_codes::FORWARDED_ID_MUST_MATCH_DECLARED_ID),
        "EV0003 compares folded values, not spellings: {diags:?}"
    );
    assert!(!codes(&diags).contains(&diagnostic_codes::FORWARDED_ID_SHOULD_BE_CONSTANT));
}

#[test]
fn parameter_in_forwarded_id_is_not_constant() {
    // A method parameter leaking into the id expression defeats folding.
    let diags = run(|b| {
        let class = b.start_class("TestEvents", Some("EventSource"));
        b.const_field(class, "NormalEvents", 100);
        let m = b.start_method(class, "EventThree", &[
            ("arg1", "string"),
            ("arg2", "string"),
            ("outer", "int"),
        ]);
        let id = b.constant_adder("NormalEvents", 1);
        b.event_attribute(m, id);
        let partial = b.constant_adder("NormalEvents", 1);
        let extra = b.ident("outer");
        let call_id = b.add_expr(partial, extra);
        b.write_event(m, call_id, &["arg1", "arg2", "outer"]);
    });

    assert!(
        codes(&diags).contains(&diagnostic_codes::FORWARDED_ID_SHOULD_BE_CONSTANT),
        "EV0004 expected when the id references a parameter: {diags:?}"
    );
    assert!(
        !codes(&diags).contains(&diagnostic_codes::FORWARDED_ID_MUST_MATCH_DECLARED_ID),
        "an unfoldable id cannot also mismatch: {diags:?}"
    );
}

#[test]
fn zero_argument_forwarding_call_reports_without_panicking() {
    let diags = run(|b| {
        let class = b.start_class("TestEvents", Some("EventSource"));
        b.const_field(class, "NormalEvents", 100);
        let m = b.start_method(class, "EventOne", &[("arg1", "string")]);
        let id = b.constant_adder("NormalEvents", 1);
        b.event_attribute(m, id);
        b.write_event_args(m, vec![]);
    });
    let found = codes(&diags);
    assert!(found.contains(&diagnostic_codes::FORWARDED_ID_SHOULD_BE_CONSTANT), "{diags:?}");
    assert!(found.contains(&diagnostic_codes::NOT_ALL_PARAMETERS_FORWARDED), "{diags:?}");
}

#[test]
fn several_call_rules_accumulate_on_one_method() {
    // An unfoldable id and a short argument list co-fire (EV0004 + EV0008).
    let diags = run(|b| {
        let class = b.start_class("TestEvents", Some("EventSource"));
        b.const_field(class, "NormalEvents", 100);
        let m = b.start_method(class, "EventOne", &[("arg1", "string"), ("arg2", "string")]);
        let id = b.constant_adder("NormalEvents", 1);
        b.event_attribute(m, id);
        let call_id = b.ident("someVariable");
        b.write_event(m, call_id, &["arg1"]);
    });
    let found = codes(&diags);
    assert!(found.contains(&diagnostic_codes::FORWARDED_ID_SHOULD_BE_CONSTANT), "{diags:?}");
    assert!(found.contains(&diagnostic_codes::NOT_ALL_PARAMETERS_FORWARDED), "{diags:?}");
}

#[test]
fn declaration_without_id_is_not_compared() {
    // The declared id is absent, not defaulted: a foldable forwarded id does
    // not produce a mismatch against it.
    let diags = run(|b| {
        let class = b.start_class("TestEvents", Some("EventSource"));
        b.const_field(class, "NormalEvents", 100);
        let m = b.start_method(class, "EventOne", &[("arg1", "string")]);
        b.event_attribute_empty(m);
        let call_id = b.lit(101);
        b.write_event(m, call_id, &["arg1"]);
    });
    assert!(
        !codes(&diags).contains(&diagnostic_codes::FORWARDED_ID_MUST_MATCH_DECLARED_ID),
        "{diags:?}"
    );
}
