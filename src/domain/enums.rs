use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How hard a subject is; scales the requested daily hours into effective workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty '{0}' (expected easy, medium or hard)")]
pub struct ParseDifficultyError(pub String);

impl Difficulty {
    /// Workload multiplier for this difficulty
    pub fn weight(&self) -> f64 {
        match self {
            Self::Easy => 0.7,
            Self::Medium => 1.0,
            Self::Hard => 1.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which half of the focus cycle the timer is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Study,
    Break,
}

impl TimerMode {
    /// The mode that follows this one when a session expires
    pub fn flipped(&self) -> Self {
        match self {
            Self::Study => Self::Break,
            Self::Break => Self::Study,
        }
    }

    /// Display label for the running session
    pub fn label(&self) -> &'static str {
        match self {
            Self::Study => "Study Session",
            Self::Break => "Break Time",
        }
    }

    /// Message shown when a session of this mode runs out
    pub fn completion_message(&self) -> &'static str {
        match self {
            Self::Study => "Study session complete! Time for a break.",
            Self::Break => "Break time over! Ready to study again.",
        }
    }
}

/// How a day's schedule is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// One row per task
    #[default]
    Timetable,
    /// One card per subject
    Cards,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown view '{0}' (expected timetable or cards)")]
pub struct ParseViewModeError(pub String);

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timetable => "timetable",
            Self::Cards => "cards",
        }
    }
}

impl FromStr for ViewMode {
    type Err = ParseViewModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "timetable" => Ok(Self::Timetable),
            "cards" => Ok(Self::Cards),
            _ => Err(ParseViewModeError(s.to_string())),
        }
    }
}

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_weights() {
        assert_eq!(Difficulty::Easy.weight(), 0.7);
        assert_eq!(Difficulty::Medium.weight(), 1.0);
        assert_eq!(Difficulty::Hard.weight(), 1.5);
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("Medium".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert_eq!(" HARD ".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(
            "brutal".parse::<Difficulty>(),
            Err(ParseDifficultyError("brutal".to_string()))
        );
    }

    #[test]
    fn test_difficulty_serde_is_lowercase() {
        let json = serde_json::to_string(&Difficulty::Hard).unwrap();
        assert_eq!(json, "\"hard\"");
        let back: Difficulty = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(back, Difficulty::Easy);
    }

    #[test]
    fn test_timer_mode_flipped() {
        assert_eq!(TimerMode::Study.flipped(), TimerMode::Break);
        assert_eq!(TimerMode::Break.flipped(), TimerMode::Study);
    }

    #[test]
    fn test_view_mode_from_str() {
        assert_eq!("cards".parse::<ViewMode>(), Ok(ViewMode::Cards));
        assert_eq!("Timetable".parse::<ViewMode>(), Ok(ViewMode::Timetable));
        assert!("grid".parse::<ViewMode>().is_err());
        assert_eq!(ViewMode::default(), ViewMode::Timetable);
    }
}
