use std::fmt;

use clap::ValueEnum;
use colored::Colorize;

/// Priority levels of the default Jira priority scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Priority {
    Highest,
    High,
    Medium,
    Low,
    Lowest,
}

impl Priority {
    /// Get the Jira priority name.
    pub fn label(self) -> &'static str {
        match self {
            Priority::Highest => "Highest",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Lowest => "Lowest",
        }
    }

    /// Parse a priority name as Jira reports it (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "highest" | "blocker" => Some(Priority::Highest),
            "high" | "critical" | "major" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" | "minor" => Some(Priority::Low),
            "lowest" | "trivial" => Some(Priority::Lowest),
            _ => None,
        }
    }
}

/// Colour a priority name for terminal output; unknown names stay plain.
pub fn colored_priority(name: &str) -> String {
    match Priority::from_name(name) {
        Some(Priority::Highest) => name.red().bold().to_string(),
        Some(Priority::High) => name.yellow().bold().to_string(),
        Some(Priority::Medium) => name.blue().to_string(),
        Some(Priority::Low) | Some(Priority::Lowest) => name.bright_black().to_string(),
        None => name.to_string(),
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_legacy_priority_names() {
        assert_eq!(Priority::from_name("Blocker"), Some(Priority::Highest));
        assert_eq!(Priority::from_name("minor"), Some(Priority::Low));
        assert_eq!(Priority::from_name("P9"), None);
    }
}
