use std::str::FromStr;

use serde::{Deserialize, Serialize};

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;

/// The focus lengths offered by the duration picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusPreset {
    TestMode,
    ShortFocus,
    DeepFocus,
}

impl FocusPreset {
    pub const fn duration_ms(&self) -> i64 {
        match self {
            Self::TestMode => 10 * SECOND_MS,
            Self::ShortFocus => 25 * MINUTE_MS,
            Self::DeepFocus => 45 * MINUTE_MS,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::TestMode => "10 seconds (test)",
            Self::ShortFocus => "25 minutes (Pomodoro)",
            Self::DeepFocus => "45 minutes (deep work)",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TestMode => "test-mode",
            Self::ShortFocus => "short-focus",
            Self::DeepFocus => "deep-focus",
        }
    }

    /// Picker order.
    pub const fn all() -> &'static [FocusPreset] {
        &[
            FocusPreset::TestMode,
            FocusPreset::ShortFocus,
            FocusPreset::DeepFocus,
        ]
    }
}

impl Default for FocusPreset {
    fn default() -> Self {
        Self::ShortFocus
    }
}

impl std::fmt::Display for FocusPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FocusPreset {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "test" | "test-mode" | "test_mode" | "10s" => Ok(Self::TestMode),
            "short" | "short-focus" | "short_focus" | "pomodoro" | "25m" => Ok(Self::ShortFocus),
            "deep" | "deep-focus" | "deep_focus" | "45m" => Ok(Self::DeepFocus),
            _ => Err(format!("unknown focus preset: {value}")),
        }
    }
}
