//! Diagnostic values produced by the rule set.
//!
//! Codes are stable and displayed with the `EV` prefix (`EV0001` ..
//! `EV0009`). Message templates use `{0}`-style placeholders filled by
//! [`format_message`].

use crate::Span;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

/// Static descriptor tying a code to its category and message template.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const DUPLICATE_EVENT_ID: u32 = 1;
    pub const USE_CONSTANT_ADDER_FOR_EVENT_ID: u32 = 2;
    pub const FORWARDED_ID_MUST_MATCH_DECLARED_ID: u32 = 3;
    pub const FORWARDED_ID_SHOULD_BE_CONSTANT: u32 = 4;
    pub const MULTIPLE_FORWARDING_CALLS: u32 = 5;
    pub const NO_FORWARDING_CALL: u32 = 6;
    pub const PARAMETERS_OUT_OF_ORDER: u32 = 7;
    pub const NOT_ALL_PARAMETERS_FORWARDED: u32 = 8;
    pub const METHOD_NEEDS_EVENT_DECLARATION: u32 = 9;
}

pub mod diagnostic_messages {
    pub const DUPLICATE_EVENT_ID: &str = "Duplicate event id {0} in methods {1}";
    pub const USE_CONSTANT_ADDER_FOR_EVENT_ID: &str =
        "Consider using a named constant plus offset for the event id";
    pub const FORWARDED_ID_MUST_MATCH_DECLARED_ID: &str =
        "Event id {0} passed to WriteEvent differs from the declared event id {1}";
    pub const FORWARDED_ID_SHOULD_BE_CONSTANT: &str =
        "Event id passed to WriteEvent is not a compile-time constant";
    pub const MULTIPLE_FORWARDING_CALLS: &str =
        "WriteEvent should be called exactly once per event method";
    pub const NO_FORWARDING_CALL: &str = "Event method never calls WriteEvent";
    pub const PARAMETERS_OUT_OF_ORDER: &str =
        "Parameters should be forwarded to WriteEvent in the order they were declared";
    pub const NOT_ALL_PARAMETERS_FORWARDED: &str =
        "All event method parameters should be forwarded to WriteEvent";
    pub const METHOD_NEEDS_EVENT_DECLARATION: &str =
        "Method '{0}' must either declare an event id or be marked as a non-event";
}

pub const DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::DUPLICATE_EVENT_ID,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::DUPLICATE_EVENT_ID,
    },
    DiagnosticMessage {
        code: diagnostic_codes::USE_CONSTANT_ADDER_FOR_EVENT_ID,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::USE_CONSTANT_ADDER_FOR_EVENT_ID,
    },
    DiagnosticMessage {
        code: diagnostic_codes::FORWARDED_ID_MUST_MATCH_DECLARED_ID,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::FORWARDED_ID_MUST_MATCH_DECLARED_ID,
    },
    DiagnosticMessage {
        code: diagnostic_codes::FORWARDED_ID_SHOULD_BE_CONSTANT,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::FORWARDED_ID_SHOULD_BE_CONSTANT,
    },
    DiagnosticMessage {
        code: diagnostic_codes::MULTIPLE_FORWARDING_CALLS,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::MULTIPLE_FORWARDING_CALLS,
    },
    DiagnosticMessage {
        code: diagnostic_codes::NO_FORWARDING_CALL,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::NO_FORWARDING_CALL,
    },
    DiagnosticMessage {
        code: diagnostic_codes::PARAMETERS_OUT_OF_ORDER,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::PARAMETERS_OUT_OF_ORDER,
    },
    DiagnosticMessage {
        code: diagnostic_codes::NOT_ALL_PARAMETERS_FORWARDED,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::NOT_ALL_PARAMETERS_FORWARDED,
    },
    DiagnosticMessage {
        code: diagnostic_codes::METHOD_NEEDS_EVENT_DECLARATION,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::METHOD_NEEDS_EVENT_DECLARATION,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    pub fn new(
        category: DiagnosticCategory,
        code: u32,
        file: impl Into<String>,
        span: Span,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            code,
            file: file.into(),
            start: span.start,
            length: span.len,
            message_text: message.into(),
            related_information: Vec::new(),
        }
    }

    pub fn with_related(
        mut self,
        file: impl Into<String>,
        span: Span,
        message: impl Into<String>,
    ) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            file: file.into(),
            start: span.start,
            length: span.len,
            message_text: message.into(),
        });
        self
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.length)
    }

    /// Display form of the code, e.g. `EV0003`.
    pub fn display_code(&self) -> String {
        format!("EV{:04}", self.code)
    }
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code).map(|m| m.message)
}

pub fn get_category(code: u32) -> Option<DiagnosticCategory> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code).map(|m| m.category)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_has_a_template() {
        for code in 1..=9 {
            assert!(get_message_template(code).is_some(), "no template for code {code}");
            assert!(get_category(code).is_some(), "no category for code {code}");
        }
    }

    #[test]
    fn format_message_fills_placeholders() {
        let text = format_message(diagnostic_messages::FORWARDED_ID_MUST_MATCH_DECLARED_ID, &[
            "110", "101",
        ]);
        assert_eq!(text, "Event id 110 passed to WriteEvent differs from the declared event id 101");
    }

    #[test]
    fn display_code_is_zero_padded() {
        let d = Diagnostic::new(
            DiagnosticCategory::Error,
            diagnostic_codes::DUPLICATE_EVENT_ID,
            "events",
            Span::new(0, 1),
            "x",
        );
        assert_eq!(d.display_code(), "EV0001");
    }
}
