use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Ignore,
}

impl Severity {
    pub fn parse(value: &str) -> Option<Severity> {
        match value.trim() {
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            "info" => Some(Severity::Info),
            "ignore" => Some(Severity::Ignore),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Ignore => "ignore",
        }
    }
}

/// Integer problem code. Values are stable: they are shared by every producer of
/// unified trees, so existing constants must never be renumbered.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProblemId(pub i32);

pub mod category {
    pub const TYPE_RELATED: i32 = 0x0100_0000;
    pub const FIELD_RELATED: i32 = 0x0200_0000;
    pub const METHOD_RELATED: i32 = 0x0400_0000;
    pub const CONSTRUCTOR_RELATED: i32 = 0x0800_0000;
    pub const IMPORT_RELATED: i32 = 0x1000_0000;
    pub const INTERNAL: i32 = 0x2000_0000;
    pub const SYNTAX: i32 = 0x4000_0000;
    pub const JAVADOC: i32 = 0x8000_0000_u32 as i32;
    pub const MODULE_RELATED: i32 = 0x0080_0000;
    pub const COMPLIANCE: i32 = 0x0040_0000;
    pub const PREVIEW_RELATED: i32 = 0x0020_0000;
    pub const IGNORE_CATEGORIES_MASK: i32 = 0x00FF_FFFF;
}

macro_rules! problem_ids {
    ($($name:ident = $value:expr),* $(,)?) => {
        impl ProblemId {
            $(pub const $name: ProblemId = ProblemId($value);)*

            /// Symbolic name of a known problem id.
            pub fn name(self) -> Option<&'static str> {
                $(if self.0 == $value {
                    return Some(stringify!($name));
                })*
                None
            }
        }
    };
}

use category::*;

problem_ids! {
    IGNORED = 0,

    UNDEFINED_TYPE = TYPE_RELATED + 2,
    NOT_VISIBLE_TYPE = TYPE_RELATED + 3,
    AMBIGUOUS_TYPE = TYPE_RELATED + 4,
    TYPE_MISMATCH = TYPE_RELATED + 17,
    UNHANDLED_EXCEPTION = TYPE_RELATED + 156,
    UNHANDLED_EXCEPTION_IN_DEFAULT_CONSTRUCTOR = TYPE_RELATED + 157,
    UNHANDLED_EXCEPTION_ON_AUTO_CLOSE = TYPE_RELATED + 885,
    INVALID_CLASS_INSTANTIATION = TYPE_RELATED + 160,
    CLASS_EXTEND_FINAL_CLASS = TYPE_RELATED + 311,
    ANONYMOUS_CLASS_CANNOT_EXTEND_FINAL_CLASS = TYPE_RELATED + 307,
    PUBLIC_CLASS_MUST_MATCH_FILE_NAME = TYPE_RELATED + 325,
    ABSTRACT_METHOD_MUST_BE_IMPLEMENTED = TYPE_RELATED + 400,
    RAW_TYPE_REFERENCE = TYPE_RELATED + 658,
    MISSING_SERIAL_VERSION = TYPE_RELATED + 660,
    TYPE_MISSING_DEPRECATED_ANNOTATION = INTERNAL + TYPE_RELATED + 629,
    SHOULD_IMPLEMENT_HASHCODE = TYPE_RELATED + 659,
    INVALID_UNION_TYPE_REFERENCE_SEQUENCE = INTERNAL + TYPE_RELATED + 863,
    ILLEGAL_MODIFIER_FOR_CLASS = TYPE_RELATED + 301,
    ILLEGAL_MODIFIER_FOR_INTERFACE = TYPE_RELATED + 302,
    ILLEGAL_MODIFIER_FOR_MEMBER_CLASS = TYPE_RELATED + 303,
    ILLEGAL_MODIFIER_FOR_MEMBER_INTERFACE = TYPE_RELATED + 304,
    ILLEGAL_MODIFIER_FOR_LOCAL_CLASS = TYPE_RELATED + 305,
    ILLEGAL_MODIFIER_FOR_ENUM = TYPE_RELATED + 750,
    ILLEGAL_MODIFIER_FOR_MEMBER_ENUM = TYPE_RELATED + 752,
    ILLEGAL_MODIFIER_FOR_LOCAL_ENUM_DECLARATION = TYPE_RELATED + 1833,
    ILLEGAL_VISIBILITY_MODIFIER_COMBINATION_FOR_MEMBER_TYPE = TYPE_RELATED + 308,
    ILLEGAL_VISIBILITY_MODIFIER_FOR_INTERFACE_MEMBER_TYPE = TYPE_RELATED + 309,
    ILLEGAL_MODIFIER_COMBINATION_FINAL_ABSTRACT_FOR_CLASS = TYPE_RELATED + 310,
    RECORD_ILLEGAL_MODIFIER_FOR_RECORD = TYPE_RELATED + 1720,
    RECORD_ILLEGAL_MODIFIER_FOR_INNER_RECORD = TYPE_RELATED + 1721,
    RECORD_ILLEGAL_MODIFIER_FOR_LOCAL_RECORD = TYPE_RELATED + 1722,
    SEALED_MISSING_CLASS_MODIFIER = TYPE_RELATED + 1850,
    SEALED_SEALED_TYPE_MISSING_PERMITS = TYPE_RELATED + 1854,
    SEALED_SUPER_CLASS_DOES_NOT_PERMIT = TYPE_RELATED + 1856,
    SEALED_SUPER_INTERFACE_DOES_NOT_PERMIT = TYPE_RELATED + 1857,

    UNDEFINED_FIELD = FIELD_RELATED + 70,
    NOT_VISIBLE_FIELD = FIELD_RELATED + 71,
    FINAL_FIELD_ASSIGNMENT = FIELD_RELATED + 80,
    UNRESOLVED_VARIABLE = FIELD_RELATED + 83,
    UNDEFINED_NAME = INTERNAL + FIELD_RELATED + 50,
    INSTANCE_FIELD_DURING_CONSTRUCTOR_INVOCATION = FIELD_RELATED + 119,
    FIELD_MISSING_DEPRECATED_ANNOTATION = INTERNAL + FIELD_RELATED + 627,
    ILLEGAL_MODIFIER_FOR_FIELD = FIELD_RELATED + 340,
    ILLEGAL_MODIFIER_FOR_INTERFACE_FIELD = FIELD_RELATED + 341,
    ILLEGAL_VISIBILITY_MODIFIER_COMBINATION_FOR_FIELD = FIELD_RELATED + 342,
    ILLEGAL_MODIFIER_COMBINATION_FINAL_VOLATILE_FOR_FIELD = FIELD_RELATED + 343,

    UNDEFINED_METHOD = METHOD_RELATED + 100,
    NOT_VISIBLE_METHOD = METHOD_RELATED + 101,
    AMBIGUOUS_METHOD = METHOD_RELATED + 102,
    PARAMETER_MISMATCH = METHOD_RELATED + 115,
    NO_MESSAGE_SEND_ON_ARRAY_TYPE = METHOD_RELATED + 117,
    NON_STATIC_ACCESS_TO_STATIC_METHOD = INTERNAL + METHOD_RELATED + 118,
    MISSING_RETURN_TYPE = TYPE_RELATED + 346,
    BODY_FOR_ABSTRACT_METHOD = METHOD_RELATED + 354,
    DUPLICATE_METHOD = METHOD_RELATED + 355,
    METHOD_REQUIRES_BODY = INTERNAL + METHOD_RELATED + 390,
    METHOD_RETURNS_VOID = METHOD_RELATED + 357,
    VOID_METHOD_RETURNS_VALUE = METHOD_RELATED + 358,
    SHOULD_RETURN_VALUE = INTERNAL + METHOD_RELATED + 330,
    INCOMPATIBLE_EXCEPTION_IN_THROWS_CLAUSE = METHOD_RELATED + 408,
    INCOMPATIBLE_RETURN_TYPE = METHOD_RELATED + 411,
    FINAL_METHOD_CANNOT_BE_OVERRIDDEN = METHOD_RELATED + 405,
    CANNOT_OVERRIDE_A_STATIC_METHOD_WITH_AN_INSTANCE_METHOD = METHOD_RELATED + 406,
    UNSAFE_RAW_METHOD_INVOCATION = METHOD_RELATED + 520,
    METHOD_MISSING_DEPRECATED_ANNOTATION = INTERNAL + METHOD_RELATED + 628,
    ILLEGAL_MODIFIER_FOR_METHOD = METHOD_RELATED + 359,
    ILLEGAL_MODIFIER_FOR_INTERFACE_METHOD = METHOD_RELATED + 360,
    ILLEGAL_MODIFIER_FOR_INTERFACE_METHOD_18 = METHOD_RELATED + 1050,
    ILLEGAL_MODIFIER_FOR_INTERFACE_METHOD_9 = METHOD_RELATED + 1059,
    ILLEGAL_MODIFIER_FOR_ANNOTATION_METHOD = METHOD_RELATED + 600,
    ILLEGAL_VISIBILITY_MODIFIER_COMBINATION_FOR_METHOD = METHOD_RELATED + 361,
    ILLEGAL_MODIFIER_COMBINATION_FOR_INTERFACE_METHOD = METHOD_RELATED + 1051,
    ILLEGAL_STRICTFP_FOR_ABSTRACT_INTERFACE_METHOD = METHOD_RELATED + 362,
    UNDEFINED_ANNOTATION_MEMBER = INTERNAL + METHOD_RELATED + 614,
    MISSING_VALUE_FOR_ANNOTATION_MEMBER = INTERNAL + METHOD_RELATED + 615,
    ANNOTATION_VALUE_MUST_BE_CONSTANT = INTERNAL + 640,

    UNDEFINED_CONSTRUCTOR = CONSTRUCTOR_RELATED + 130,
    NOT_VISIBLE_CONSTRUCTOR = CONSTRUCTOR_RELATED + 131,
    UNDEFINED_CONSTRUCTOR_IN_DEFAULT_CONSTRUCTOR = CONSTRUCTOR_RELATED + 140,
    NOT_VISIBLE_CONSTRUCTOR_IN_DEFAULT_CONSTRUCTOR = CONSTRUCTOR_RELATED + 141,
    ILLEGAL_MODIFIER_FOR_CONSTRUCTOR = CONSTRUCTOR_RELATED + 143,
    ILLEGAL_MODIFIER_FOR_ENUM_CONSTRUCTOR = CONSTRUCTOR_RELATED + 144,

    CONFLICTING_IMPORT = IMPORT_RELATED + 385,
    PACKAGE_DOES_NOT_EXIST_OR_IS_EMPTY = IMPORT_RELATED + 1450,

    UNINITIALIZED_LOCAL_VARIABLE = INTERNAL + 55,
    CODE_CANNOT_BE_REACHED = INTERNAL + 161,
    UNREACHABLE_CATCH = TYPE_RELATED + METHOD_RELATED + 165,
    INVALID_CATCH_BLOCK_SEQUENCE = INTERNAL + TYPE_RELATED + 166,
    INVALID_EXPRESSION_AS_STATEMENT = INTERNAL + 167,
    VARARGS_CONFLICT = INTERNAL + 179,
    DUPLICATE_MODIFIER_FOR_ARGUMENT = INTERNAL + 180,
    ILLEGAL_MODIFIER_FOR_ARGUMENT = INTERNAL + 181,
    ILLEGAL_MODIFIERS = INTERNAL + 182,
    EMPTY_CONTROL_FLOW_STATEMENT = INTERNAL + 187,
    UNNECESSARY_CAST = INTERNAL + TYPE_RELATED + 101,
    STRICTFP_NOT_REQUIRED = INTERNAL + 186,
    NON_SERIALIZABLE_INSTANCE_FIELD = 99_999_999,

    SYNTAX = SYNTAX,
    PARSING_ERROR_INSERT_TOKEN_BEFORE = SYNTAX + INTERNAL + 231,
    PARSING_ERROR_INSERT_TOKEN_AFTER = SYNTAX + INTERNAL + 232,
    PARSING_ERROR_INSERT_TO_COMPLETE = SYNTAX + INTERNAL + 240,
    PARSING_ERROR_UNEXPECTED_EOF = SYNTAX + INTERNAL + 210,
    INVALID_CHARACTER_CONSTANT = SYNTAX + INTERNAL + 252,
    INVALID_FLOAT = SYNTAX + INTERNAL + 254,
    UNTERMINATED_STRING = SYNTAX + INTERNAL + 258,
    UNTERMINATED_COMMENT = SYNTAX + INTERNAL + 259,

    JAVADOC_UNEXPECTED_TAG = JAVADOC + INTERNAL + 470,
    JAVADOC_MISSING_PARAM_TAG = JAVADOC + INTERNAL + 471,
    JAVADOC_MISSING_IDENTIFIER = JAVADOC + INTERNAL + 472,
    JAVADOC_DUPLICATE_PARAM_NAME = JAVADOC + INTERNAL + 473,
    JAVADOC_INVALID_PARAM_NAME = JAVADOC + INTERNAL + 474,
    JAVADOC_MISSING_RETURN_TAG = JAVADOC + INTERNAL + 475,
    JAVADOC_MISSING_THROWS_TAG = JAVADOC + INTERNAL + 477,
    JAVADOC_INVALID_THROWS_CLASS_NAME = JAVADOC + INTERNAL + 481,
    JAVADOC_UNTERMINATED_INLINE_TAG = JAVADOC + INTERNAL + 492,
    JAVADOC_UNEXPECTED_TEXT = JAVADOC + INTERNAL + 518,
}

impl ProblemId {
    pub fn is_ignored(self) -> bool {
        self.0 == 0
    }

    pub fn has_category(self, category: i32) -> bool {
        self.0 & category != 0
    }

    pub fn is_javadoc(self) -> bool {
        self.0 & category::JAVADOC != 0
    }
}

impl std::fmt::Display for ProblemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}({})", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

/// A converted compiler diagnostic. Created once and never mutated afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub original_file: String,
    pub message: String,
    /// Code string reported by the producing compiler.
    pub foreign_code: String,
    pub id: ProblemId,
    pub arguments: Vec<String>,
    pub severity: Severity,
    pub source_start: i32,
    /// Inclusive end offset.
    pub source_end: i32,
    pub line: i32,
    pub column: i32,
}

impl Problem {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_id_names() {
        assert_eq!(ProblemId::UNDEFINED_TYPE.name(), Some("UNDEFINED_TYPE"));
        assert_eq!(ProblemId(12345).name(), None);
        assert!(ProblemId::IGNORED.is_ignored());
        assert!(ProblemId::JAVADOC_MISSING_PARAM_TAG.is_javadoc());
        assert!(ProblemId::UNDEFINED_METHOD.has_category(category::METHOD_RELATED));
    }
}
