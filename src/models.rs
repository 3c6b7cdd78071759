use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Priority given to tasks whose stored priority is missing or unusable
pub const DEFAULT_PRIORITY: i64 = 2;

/// Priorities offered when creating a task (1 = highest)
pub const PRIORITIES: [i64; 3] = [1, 2, 3];

/// Marker placed between the prefix and the text of a completed task
pub const DONE_MARKER: &str = "✅";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    Work,
    Study,
    #[default]
    Personal,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Work,
        Category::Study,
        Category::Personal,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Study => "Study",
            Category::Personal => "Personal",
            Category::Other => "Other",
        }
    }

    /// Three-letter upper-case tag used in list rows ("WOR", "STU", ...)
    pub fn abbreviation(&self) -> String {
        self.as_str().chars().take(3).collect::<String>().to_uppercase()
    }

    /// Map a stored category name to a category, falling back to `Other`
    pub fn from_stored(name: &str) -> Self {
        name.parse().unwrap_or(Category::Other)
    }

    /// Next category in selector order, wrapping around
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous category in selector order, wrapping around
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown category '{}' (expected Work, Study, Personal or Other)",
            self.0
        )
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    pub category: Category,
    pub priority: i64,
    pub done: bool,
}

impl Task {
    pub fn new(text: String, category: Category, priority: i64) -> Self {
        Self {
            text,
            category,
            priority,
            done: false,
        }
    }

    /// Row text shown by list views: `[WOR][P1] ✅ Write report`
    pub fn display_line(&self) -> String {
        let mut line = format!("[{}][P{}] ", self.category.abbreviation(), self.priority);
        if self.done {
            line.push_str(DONE_MARKER);
            line.push(' ');
        }
        line.push_str(&self.text);
        line
    }

    /// Case-insensitive substring match against an already lower-cased needle
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.text.to_lowercase().contains(needle)
    }
}

/// Totals shown under the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub done: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} tasks • {} done", self.total, self.done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_line_for_open_task() {
        let task = Task::new("Buy milk".to_string(), Category::Personal, 2);
        assert_eq!(task.display_line(), "[PER][P2] Buy milk");
    }

    #[test]
    fn display_line_marks_done() {
        let mut task = Task::new("Write report".to_string(), Category::Work, 1);
        task.done = true;
        assert_eq!(task.display_line(), "[WOR][P1] ✅ Write report");
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!("study".parse::<Category>(), Ok(Category::Study));
        assert_eq!(" WORK ".parse::<Category>(), Ok(Category::Work));
        assert!("Errands".parse::<Category>().is_err());
    }

    #[test]
    fn unknown_stored_category_falls_back_to_other() {
        assert_eq!(Category::from_stored("Errands"), Category::Other);
        assert_eq!(Category::from_stored("Personal"), Category::Personal);
    }

    #[test]
    fn category_cycling_wraps() {
        assert_eq!(Category::Other.next(), Category::Work);
        assert_eq!(Category::Work.prev(), Category::Other);
        assert_eq!(Category::Study.next().prev(), Category::Study);
    }

    #[test]
    fn stats_line() {
        let stats = Stats { total: 3, done: 1 };
        assert_eq!(stats.to_string(), "3 tasks • 1 done");
    }
}
