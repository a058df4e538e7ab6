use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};

/// Requested shape level of the unified tree, as an integer ordinal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "u32", into = "u32")]
pub struct ApiLevel(u32);

impl ApiLevel {
    pub const JLS2: ApiLevel = ApiLevel(2);
    pub const JLS3: ApiLevel = ApiLevel(3);
    pub const JLS4: ApiLevel = ApiLevel(4);
    pub const JLS8: ApiLevel = ApiLevel(8);
    pub const JLS14: ApiLevel = ApiLevel(14);
    pub const JLS16: ApiLevel = ApiLevel(16);
    pub const JLS17: ApiLevel = ApiLevel(17);
    pub const JLS21: ApiLevel = ApiLevel(21);

    pub const fn latest() -> ApiLevel {
        Self::JLS21
    }

    pub fn from_ordinal(ordinal: u32) -> ApiResult<ApiLevel> {
        match ordinal {
            2 | 3 | 4 | 8..=21 => Ok(ApiLevel(ordinal)),
            other => Err(ApiError::UnknownApiLevel(other)),
        }
    }

    pub fn ordinal(self) -> u32 {
        self.0
    }

    /// Pre-generics shape: modifiers as a flag word, supertypes as names.
    pub fn is_legacy(self) -> bool {
        self.0 < 3
    }

    pub fn supports_sealed_types(self) -> bool {
        self.0 >= 17
    }
}

impl Default for ApiLevel {
    fn default() -> Self {
        Self::latest()
    }
}

impl TryFrom<u32> for ApiLevel {
    type Error = ApiError;

    fn try_from(value: u32) -> ApiResult<Self> {
        ApiLevel::from_ordinal(value)
    }
}

impl From<ApiLevel> for u32 {
    fn from(level: ApiLevel) -> u32 {
        level.0
    }
}

impl std::fmt::Display for ApiLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JLS{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals() {
        assert_eq!(ApiLevel::from_ordinal(8).unwrap(), ApiLevel::JLS8);
        assert!(ApiLevel::from_ordinal(5).is_err());
        assert!(ApiLevel::from_ordinal(22).is_err());
        assert!(ApiLevel::JLS2.is_legacy());
        assert!(!ApiLevel::JLS3.is_legacy());
        assert!(ApiLevel::latest().supports_sealed_types());
    }
}
