use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of an authenticated principal; always a positive integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SubjectId(i64);

impl SubjectId {
    /// Returns `None` for zero and negative values
    pub fn new(value: i64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for SubjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Self::new(value).ok_or_else(|| {
            serde::de::Error::custom(format!("subject id must be positive, got {}", value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_ids_are_accepted() {
        assert_eq!(SubjectId::new(1).map(|id| id.get()), Some(1));
        assert_eq!(SubjectId::new(i64::MAX).map(|id| id.get()), Some(i64::MAX));
    }

    #[test]
    fn test_zero_and_negative_are_rejected() {
        assert!(SubjectId::new(0).is_none());
        assert!(SubjectId::new(-5).is_none());
    }

    #[test]
    fn test_deserialize_rejects_non_positive() {
        assert!(serde_json::from_str::<SubjectId>("42").is_ok());
        assert!(serde_json::from_str::<SubjectId>("0").is_err());
        assert!(serde_json::from_str::<SubjectId>("\"42\"").is_err());
    }
}
