//! EV0009: every externally visible instance method of an event source
//! carries exactly one of the event declaration or the opt-out marker.

use evlint_common::Diagnostic;
use evlint_common::diagnostics::diagnostic_codes;
use evlint_rules::{AnalysisSession, analyze};
use evlint_tree::{AmbientTypes, ProgramBuilder, SymbolBank, method_flags};

fn run(build: impl FnOnce(&mut ProgramBuilder)) -> Vec<Diagnostic> {
    let mut b = ProgramBuilder::new("test_events");
    build(&mut b);
    let arena = b.finish();
    let bank = SymbolBank::bind(&arena, &AmbientTypes::tracing_defaults());
    let session = AnalysisSession::with_defaults(&bank);
    analyze(&arena, &bank, &session)
}

fn ev0009(diags: &[Diagnostic]) -> Vec<&Diagnostic> {
    diags.iter().filter(|d| d.code == diagnostic_codes::METHOD_NEEDS_EVENT_DECLARATION).collect()
}

#[test]
fn unmarked_method_is_flagged_by_name() {
    let diags = run(|b| {
        let class = b.start_class("TestEvents", Some("EventSource"));
        b.const_field(class, "NormalEvents", 100);

        let m1 = b.start_method(class, "EventOne", &[("arg1", "string")]);
        let id = b.constant_adder("NormalEvents", 1);
        b.event_attribute(m1, id);
        let call_id = b.constant_adder("NormalEvents", 1);
        b.write_event(m1, call_id, &["arg1"]);

        let m2 = b.start_method(class, "EventTwo", &[("arg1", "string")]);
        let call_id = b.constant_adder("NormalEvents", 2);
        b.write_event(m2, call_id, &["arg1"]);
    });

    let flagged = ev0009(&diags);
    assert_eq!(flagged.len(), 1, "{diags:?}");
    assert!(flagged[0].message_text.contains("EventTwo"), "{}", flagged[0].message_text);
}

#[test]
fn either_marker_satisfies_the_rule() {
    let diags = run(|b| {
        let class = b.start_class("TestEvents", Some("EventSource"));
        b.const_field(class, "NormalEvents", 100);

        let m1 = b.start_method(class, "EventOne", &[]);
        let id = b.constant_adder("NormalEvents", 1);
        b.event_attribute(m1, id);
        let call_id = b.constant_adder("NormalEvents", 1);
        b.write_event(m1, call_id, &[]);

        let m2 = b.start_method(class, "Flush", &[]);
        b.non_event_attribute(m2);
    });
    assert!(ev0009(&diags).is_empty(), "{diags:?}");
}

#[test]
fn both_markers_violate_the_exactly_one_invariant() {
    let diags = run(|b| {
        let class = b.start_class("TestEvents", Some("EventSource"));
        b.const_field(class, "NormalEvents", 100);
        let m = b.start_method(class, "EventOne", &[]);
        let id = b.constant_adder("NormalEvents", 1);
        b.event_attribute(m, id);
        b.non_event_attribute(m);
        let call_id = b.constant_adder("NormalEvents", 1);
        b.write_event(m, call_id, &[]);
    });
    assert_eq!(ev0009(&diags).len(), 1, "{diags:?}");
}

#[test]
fn static_and_non_public_methods_are_exempt() {
    let diags = run(|b| {
        let class = b.start_class("TestEvents", Some("EventSource"));
        b.const_field(class, "NormalEvents", 100);
        b.start_method_with_flags(
            class,
            "CreateInstance",
            &[],
            method_flags::PUBLIC | method_flags::STATIC,
        );
        b.start_method_with_flags(class, "FormatPayload", &[("value", "string")], 0);
    });
    assert!(ev0009(&diags).is_empty(), "{diags:?}");
}

#[test]
fn classes_outside_the_event_source_chain_are_ignored() {
    let diags = run(|b| {
        let class = b.start_class("PlainService", None);
        b.start_method(class, "DoWork", &[]);
    });
    assert!(diags.is_empty(), "non-derived classes produce no diagnostics: {diags:?}");
}

#[test]
fn derivation_through_an_intermediate_class_counts() {
    let diags = run(|b| {
        let base = b.start_class("BaseEvents", Some("EventSource"));
        let _ = base;
        let class = b.start_class("AppEvents", Some("BaseEvents"));
        b.start_method(class, "EventOne", &[]);
    });
    // AppEvents derives from EventSource through BaseEvents.
    assert!(
        ev0009(&diags).iter().any(|d| d.message_text.contains("EventOne")),
        "{diags:?}"
    );
}
