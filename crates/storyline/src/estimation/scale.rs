//! The discrete effort scale.

use serde::{Deserialize, Serialize};

use crate::error::StorylineError;

/// Allowed effort values, in order.
pub const EFFORT_SCALE: [u8; 7] = [1, 2, 3, 5, 8, 13, 21];

/// A value on the effort scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct EffortPoints(u8);

impl EffortPoints {
    /// Smallest scale value.
    pub const MIN: EffortPoints = EffortPoints(1);
    /// Largest scale value.
    pub const MAX: EffortPoints = EffortPoints(21);

    /// Smallest scale value that is at least `total`, or the ceiling if none is.
    pub fn at_least(total: i64) -> Self {
        EFFORT_SCALE
            .iter()
            .copied()
            .find(|&p| i64::from(p) >= total)
            .map(EffortPoints)
            .unwrap_or(Self::MAX)
    }

    /// The raw value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Position on the scale (0 for 1, 6 for 21).
    pub fn position(self) -> usize {
        EFFORT_SCALE.iter().position(|&p| p == self.0).unwrap_or(0)
    }

    /// Number of scale steps between two values.
    pub fn steps_to(self, other: EffortPoints) -> usize {
        self.position().abs_diff(other.position())
    }
}

impl TryFrom<i64> for EffortPoints {
    type Error = StorylineError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        EFFORT_SCALE
            .iter()
            .copied()
            .find(|&p| i64::from(p) == value)
            .map(EffortPoints)
            .ok_or(StorylineError::InvalidPoints(value))
    }
}

impl From<EffortPoints> for i64 {
    fn from(points: EffortPoints) -> Self {
        i64::from(points.0)
    }
}

impl std::fmt::Display for EffortPoints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_least() {
        assert_eq!(EffortPoints::at_least(-3).value(), 1);
        assert_eq!(EffortPoints::at_least(1).value(), 1);
        assert_eq!(EffortPoints::at_least(4).value(), 5);
        assert_eq!(EffortPoints::at_least(13).value(), 13);
        assert_eq!(EffortPoints::at_least(14).value(), 21);
        assert_eq!(EffortPoints::at_least(400).value(), 21);
    }

    #[test]
    fn test_try_from() {
        assert_eq!(EffortPoints::try_from(8).unwrap().value(), 8);
        assert!(matches!(
            EffortPoints::try_from(4),
            Err(StorylineError::InvalidPoints(4))
        ));
    }

    #[test]
    fn test_steps() {
        let three = EffortPoints::try_from(3).unwrap();
        let thirteen = EffortPoints::try_from(13).unwrap();
        assert_eq!(three.position(), 2);
        assert_eq!(three.steps_to(thirteen), 3);
        assert_eq!(thirteen.steps_to(three), 3);
    }

    #[test]
    fn test_serde_as_integer() {
        let points = EffortPoints::try_from(5).unwrap();
        assert_eq!(serde_json::to_string(&points).unwrap(), "5");
        assert_eq!(serde_json::from_str::<EffortPoints>("21").unwrap(), EffortPoints::MAX);
        assert!(serde_json::from_str::<EffortPoints>("20").is_err());
    }
}
