//! Class-to-color encoding.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::scheme::ClassAssignment;
use crate::error::{Result, TractMapError};

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());

/// Sequential purple-blue palette, light to dark.
const DEFAULT_COLORS: [&str; 5] = ["#f1eef6", "#bdc9e1", "#74a9cf", "#2b8cbe", "#045a8d"];

/// Neutral gray for features with no value.
const DEFAULT_UNAVAILABLE: &str = "#cccccc";

/// Ordered color tokens, one per class, plus a "no data" color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRamp {
    colors: Vec<String>,
    unavailable: String,
}

impl ColorRamp {
    /// Create a ramp. Every token must be a `#rgb` or `#rrggbb` hex color.
    pub fn new<S: Into<String>>(
        colors: impl IntoIterator<Item = S>,
        unavailable: impl Into<String>,
    ) -> Result<Self> {
        let ramp = Self {
            colors: colors.into_iter().map(Into::into).collect(),
            unavailable: unavailable.into(),
        };
        ramp.validate()?;
        Ok(ramp)
    }

    /// Check every token is a hex color and the ramp is non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.colors.is_empty() {
            return Err(TractMapError::Config("color ramp has no colors".to_string()));
        }
        for token in self.colors.iter().chain(std::iter::once(&self.unavailable)) {
            if !HEX_COLOR.is_match(token) {
                return Err(TractMapError::Config(format!(
                    "invalid color '{}': expected #rgb or #rrggbb",
                    token
                )));
            }
        }
        Ok(())
    }

    /// Fail unless the ramp has exactly `class_count` colors.
    pub fn check_class_count(&self, class_count: usize) -> Result<()> {
        if self.colors.len() != class_count {
            return Err(TractMapError::Config(format!(
                "color ramp has {} colors but the scheme has {} classes",
                self.colors.len(),
                class_count
            )));
        }
        Ok(())
    }

    /// Class colors in class order.
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// The "no data" color.
    pub fn unavailable(&self) -> &str {
        &self.unavailable
    }

    /// Color for a class assignment.
    pub fn color_for(&self, assignment: ClassAssignment) -> &str {
        match assignment {
            ClassAssignment::Class(i) => self
                .colors
                .get(i)
                .map(String::as_str)
                .unwrap_or(&self.unavailable),
            ClassAssignment::Unavailable => &self.unavailable,
        }
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            unavailable: DEFAULT_UNAVAILABLE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ramp_is_valid() {
        let ramp = ColorRamp::default();
        assert!(ramp.validate().is_ok());
        assert!(ramp.check_class_count(5).is_ok());
        assert!(ramp.check_class_count(4).is_err());
    }

    #[test]
    fn test_color_for() {
        let ramp = ColorRamp::new(["#fff", "#000"], "#ccc").unwrap();
        assert_eq!(ramp.color_for(ClassAssignment::Class(1)), "#000");
        assert_eq!(ramp.color_for(ClassAssignment::Unavailable), "#ccc");
        assert_eq!(ramp.color_for(ClassAssignment::Class(7)), "#ccc");
    }

    #[test]
    fn test_rejects_bad_tokens() {
        assert!(matches!(
            ColorRamp::new(["red"], "#ccc"),
            Err(TractMapError::Config(_))
        ));
        assert!(matches!(
            ColorRamp::new(["#fff"], "gray"),
            Err(TractMapError::Config(_))
        ));
        assert!(ColorRamp::new(Vec::<String>::new(), "#ccc").is_err());
    }
}
