//! Names the analyzer must recognize to activate.

/// Qualified names of the three well-known types: the emitting base class,
/// the event-declaration marker and the opt-out marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WellKnownNames {
    pub event_source: String,
    pub event_attribute: String,
    pub non_event_attribute: String,
}

impl Default for WellKnownNames {
    fn default() -> Self {
        WellKnownNames {
            event_source: QUALIFIED_EVENT_SOURCE.to_string(),
            event_attribute: QUALIFIED_EVENT_ATTRIBUTE.to_string(),
            non_event_attribute: QUALIFIED_NON_EVENT_ATTRIBUTE.to_string(),
        }
    }
}

pub const QUALIFIED_EVENT_SOURCE: &str = "Diagnostics.Tracing.EventSource";
pub const QUALIFIED_EVENT_ATTRIBUTE: &str = "Diagnostics.Tracing.EventAttribute";
pub const QUALIFIED_NON_EVENT_ATTRIBUTE: &str = "Diagnostics.Tracing.NonEventAttribute";

/// Short attribute names as they appear at use sites.
pub const EVENT_ATTRIBUTE_SHORT: &str = "Event";
pub const NON_EVENT_ATTRIBUTE_SHORT: &str = "NonEvent";

/// Method on the emitting base that events forward to.
pub const EMISSION_PRIMITIVE: &str = "WriteEvent";
/// Guard predicate on the emitting base, used by synthesized fixes.
pub const ENABLED_PREDICATE: &str = "IsEnabled";

/// Named properties of the event declaration that seed fix content.
pub const LEVEL_PROPERTY: &str = "Level";
pub const KEYWORDS_PROPERTY: &str = "Keywords";

/// Defaults for the guarded forwarding-call fix.
pub const LEVEL_TYPE: &str = "EventLevel";
pub const LEVEL_DEFAULT: &str = "LogAlways";
pub const KEYWORDS_TYPE: &str = "EventKeywords";
pub const KEYWORDS_DEFAULT: &str = "None";
