//! Diagnostic code and message tables. One code per error kind named in
//! spec.md §7. Codes are stable across compiler versions once assigned.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const UNDEFINED_BINDING: u32 = 1001;
    pub const TYPE_MISMATCH: u32 = 1002;
    pub const NON_CALLABLE: u32 = 1003;
    pub const ARITY_ERROR: u32 = 1004;
    pub const NO_MATCHING_OVERLOAD: u32 = 1005;
    pub const PROPERTY_MISSING: u32 = 1006;
    pub const INVALID_TYPE_EXPRESSION: u32 = 1007;
    pub const CYCLE_IN_COMPTIME: u32 = 1008;
    pub const FUEL_EXHAUSTED: u32 = 1009;
    pub const PATTERN_EXHAUSTION: u32 = 1010;
    pub const ASSERTION_FAILED: u32 = 1011;
    pub const SPREAD_MUST_BE_ARRAY: u32 = 1012;
    pub const AMBIGUOUS_INTERSECTION_ACCESS: u32 = 1013;
    pub const COMPTIME_UNAVAILABLE: u32 = 1014;
    pub const COMPTIME_UNSUPPORTED_CONSTRUCT: u32 = 1015;
    pub const SPREAD_MUST_BE_RECORD: u32 = 1016;
}

pub mod diagnostic_messages {
    pub const UNDEFINED_BINDING: &str = "Cannot find name '{0}'.";
    pub const TYPE_MISMATCH: &str = "Type '{0}' is not assignable to type '{1}'.";
    pub const NON_CALLABLE: &str = "Type '{0}' is not callable.";
    pub const ARITY_ERROR: &str = "Expected {0} arguments, but got {1}.";
    pub const NO_MATCHING_OVERLOAD: &str =
        "No overload matches this call. Attempted signatures: {0}.";
    pub const PROPERTY_MISSING: &str = "Property '{0}' does not exist on type '{1}'.";
    pub const INVALID_TYPE_EXPRESSION: &str = "'{0}' does not evaluate to a type.";
    pub const CYCLE_IN_COMPTIME: &str = "'{0}' is referenced directly or indirectly in its own initializer.";
    pub const FUEL_EXHAUSTED: &str = "Compile-time evaluation exceeded its fuel budget at '{0}'.";
    pub const PATTERN_EXHAUSTION: &str = "No arm of this match matched the scrutinee at compile time.";
    pub const ASSERTION_FAILED: &str = "Assertion failed: {0}";
    pub const SPREAD_MUST_BE_ARRAY: &str = "Spread element '{0}' is not an array type.";
    pub const AMBIGUOUS_INTERSECTION_ACCESS: &str =
        "'{0}' is ambiguous on an intersection of function types; use '.signatures' instead.";
    pub const COMPTIME_UNAVAILABLE: &str = "'{0}' could not be evaluated at compile time.";
    pub const COMPTIME_UNSUPPORTED_CONSTRUCT: &str = "'{0}' has no compile-time evaluation semantics.";
    pub const SPREAD_MUST_BE_RECORD: &str = "Spread element '{0}' is not a record type.";
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage { code: diagnostic_codes::UNDEFINED_BINDING, message: diagnostic_messages::UNDEFINED_BINDING },
    DiagnosticMessage { code: diagnostic_codes::TYPE_MISMATCH, message: diagnostic_messages::TYPE_MISMATCH },
    DiagnosticMessage { code: diagnostic_codes::NON_CALLABLE, message: diagnostic_messages::NON_CALLABLE },
    DiagnosticMessage { code: diagnostic_codes::ARITY_ERROR, message: diagnostic_messages::ARITY_ERROR },
    DiagnosticMessage { code: diagnostic_codes::NO_MATCHING_OVERLOAD, message: diagnostic_messages::NO_MATCHING_OVERLOAD },
    DiagnosticMessage { code: diagnostic_codes::PROPERTY_MISSING, message: diagnostic_messages::PROPERTY_MISSING },
    DiagnosticMessage { code: diagnostic_codes::INVALID_TYPE_EXPRESSION, message: diagnostic_messages::INVALID_TYPE_EXPRESSION },
    DiagnosticMessage { code: diagnostic_codes::CYCLE_IN_COMPTIME, message: diagnostic_messages::CYCLE_IN_COMPTIME },
    DiagnosticMessage { code: diagnostic_codes::FUEL_EXHAUSTED, message: diagnostic_messages::FUEL_EXHAUSTED },
    DiagnosticMessage { code: diagnostic_codes::PATTERN_EXHAUSTION, message: diagnostic_messages::PATTERN_EXHAUSTION },
    DiagnosticMessage { code: diagnostic_codes::ASSERTION_FAILED, message: diagnostic_messages::ASSERTION_FAILED },
    DiagnosticMessage { code: diagnostic_codes::SPREAD_MUST_BE_ARRAY, message: diagnostic_messages::SPREAD_MUST_BE_ARRAY },
    DiagnosticMessage { code: diagnostic_codes::AMBIGUOUS_INTERSECTION_ACCESS, message: diagnostic_messages::AMBIGUOUS_INTERSECTION_ACCESS },
    DiagnosticMessage { code: diagnostic_codes::COMPTIME_UNAVAILABLE, message: diagnostic_messages::COMPTIME_UNAVAILABLE },
    DiagnosticMessage { code: diagnostic_codes::COMPTIME_UNSUPPORTED_CONSTRUCT, message: diagnostic_messages::COMPTIME_UNSUPPORTED_CONSTRUCT },
    DiagnosticMessage { code: diagnostic_codes::SPREAD_MUST_BE_RECORD, message: diagnostic_messages::SPREAD_MUST_BE_RECORD },
];
