//! Decisions taken from the rendered diagnostic message rather than from its
//! structured arguments. Every such check goes through [`MessageHeuristics`]
//! so a localized front end only needs a different implementation.

use jdt_bridge_api::ProblemId;
use once_cell::sync::Lazy;
use regex::Regex;

static MISSING_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^no @param for (\S+)").expect("valid regex"));
static SOURCE_LEVEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"not supported in -source (\d+)").expect("valid regex"));
static DUPLICATE_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@param \S+ has already been specified$").expect("valid regex"));

pub trait MessageHeuristics: Send + Sync {
    /// Javadoc problem reported through the annotation processor messager.
    fn doclint_problem(&self, message: &str) -> ProblemId;

    /// Parameter named by a "missing @param" message.
    fn missing_param_name<'m>(&self, message: &'m str) -> Option<&'m str>;

    /// Source level named by a "not supported in -source N" message.
    fn unsupported_source_level(&self, message: &str) -> Option<u32>;

    /// Whether an override error is about a static method.
    fn is_static_override(&self, message: &str) -> bool;

    /// Whether the message names the modifier keyword.
    fn mentions_modifier(&self, message: &str, keyword: &str) -> bool;
}

/// Heuristics for javac's default English messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishHeuristics;

impl MessageHeuristics for EnglishHeuristics {
    fn doclint_problem(&self, message: &str) -> ProblemId {
        let message = message.to_lowercase();
        if message.contains("no @param for") {
            ProblemId::JAVADOC_MISSING_PARAM_TAG
        } else if message.contains("no @return") {
            ProblemId::JAVADOC_MISSING_RETURN_TAG
        } else if message.contains("@param name not found") {
            ProblemId::JAVADOC_INVALID_PARAM_NAME
        } else if message.contains("no @throws for ") {
            ProblemId::JAVADOC_MISSING_THROWS_TAG
        } else if message.contains("invalid use of @return") {
            ProblemId::JAVADOC_UNEXPECTED_TAG
        } else if message.starts_with("exception not thrown: ") {
            ProblemId::JAVADOC_INVALID_THROWS_CLASS_NAME
        } else if DUPLICATE_PARAM.is_match(&message) {
            ProblemId::JAVADOC_DUPLICATE_PARAM_NAME
        } else {
            ProblemId::IGNORED
        }
    }

    fn missing_param_name<'m>(&self, message: &'m str) -> Option<&'m str> {
        MISSING_PARAM
            .captures(message)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    fn unsupported_source_level(&self, message: &str) -> Option<u32> {
        SOURCE_LEVEL
            .captures(message)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }

    fn is_static_override(&self, message: &str) -> bool {
        message.contains("static")
    }

    fn mentions_modifier(&self, message: &str, keyword: &str) -> bool {
        message
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .any(|word| word == keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doclint_messages() {
        let h = EnglishHeuristics;
        assert_eq!(
            h.doclint_problem("no @param for count"),
            ProblemId::JAVADOC_MISSING_PARAM_TAG
        );
        assert_eq!(
            h.doclint_problem("@param x has already been specified"),
            ProblemId::JAVADOC_DUPLICATE_PARAM_NAME
        );
        assert_eq!(h.doclint_problem("something else"), ProblemId::IGNORED);
        assert_eq!(h.missing_param_name("no @param for count"), Some("count"));
    }

    #[test]
    fn test_source_level_and_modifiers() {
        let h = EnglishHeuristics;
        assert_eq!(
            h.unsupported_source_level("private interface methods are not supported in -source 8"),
            Some(8)
        );
        assert_eq!(h.unsupported_source_level("other"), None);
        assert!(h.mentions_modifier("illegal combination of modifiers: public and private", "private"));
        assert!(!h.mentions_modifier("illegal combination of modifiers: abstract and final", "static"));
    }
}
