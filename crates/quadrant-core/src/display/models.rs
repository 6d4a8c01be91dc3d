//! Display implementations for domain models.
//!
//! Kept apart from the model definitions so the data types stay free of
//! presentation concerns. Everything renders as markdown for the terminal
//! renderer.

use std::fmt;

use super::datetime::{DueDate, LocalDateTime};
use crate::models::{AppSettings, Quadrant, StudentContext, Task, TaskStatus};

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Task {
    /// One-line form used on the board and in lists.
    pub(crate) fn fmt_line(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "{:indent$}- `{}` {}", "", self.id.short(), self.name)?;
        if let Some(due) = self.due_date {
            write!(f, " (due {due})")?;
        }
        if self.recurring.is_some() {
            write!(f, " ↻")?;
        }
        if !self.is_active() {
            write!(f, " {}", self.status.with_icon())?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} ({})", self.name, self.status.with_icon())?;
        writeln!(f)?;

        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Quadrant: {}", self.quadrant.label())?;
        if let Some(due) = self.due_date {
            let today = jiff::Zoned::now().date();
            writeln!(f, "- Due: {}", DueDate::new(due, today))?;
        }
        if let Some(recurring) = &self.recurring {
            writeln!(f, "- Repeats: {recurring}")?;
        }
        if let Some(parent) = &self.parent_id {
            writeln!(f, "- Parent: {parent}")?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;

        if let Some(reasoning) = &self.reasoning {
            writeln!(f)?;
            writeln!(f, "> {reasoning}")?;
        }
        if let Some(date_reasoning) = &self.date_reasoning {
            writeln!(f)?;
            writeln!(f, "**Why this date:** {date_reasoning}")?;
        }
        if let Some(hint) = &self.scheduling_hint {
            writeln!(f)?;
            writeln!(f, "**When to work on it:** {hint}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for StudentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No context recorded yet.");
        }
        for (heading, notes) in [("Exams", &self.exams), ("Assignments", &self.assignments)] {
            if notes.is_empty() {
                continue;
            }
            writeln!(f, "## {heading}")?;
            writeln!(f)?;
            for note in notes {
                match note.date {
                    Some(date) => writeln!(f, "- {} ({date})", note.text)?,
                    None => writeln!(f, "- {}", note.text)?,
                }
            }
            writeln!(f)?;
        }
        for (label, value) in [
            ("Goals", &self.goals),
            ("Mood", &self.mood),
            ("Notes", &self.notes),
        ] {
            if !value.trim().is_empty() {
                writeln!(f, "- **{label}**: {}", value.trim())?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.credential() {
            Some(key) => {
                let skip = key.chars().count().saturating_sub(4);
                let tail: String = key.chars().skip(skip).collect();
                writeln!(f, "- **API key**: set (ending in `{tail}`)")?;
            }
            None => writeln!(f, "- **API key**: not set")?,
        }
        let coaching = if self.coaching_enabled { "on" } else { "off" };
        writeln!(f, "- **Coaching after manual moves**: {coaching}")
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::models::{DatedNote, Recurrence, RecurrenceKind};

    #[test]
    fn test_task_display_sections() {
        let mut task = Task::new("Lab report", Some(date(2030, 1, 1)));
        task.quadrant = Quadrant::Schedule;
        task.reasoning = Some("Important but due later".to_string());
        task.recurring = Some(Recurrence::new(RecurrenceKind::Weekly, 2));

        let output = task.to_string();

        assert!(output.starts_with("### Lab report (○ Active)"));
        assert!(output.contains("- Quadrant: Schedule (important, not urgent)"));
        assert!(output.contains("- Due: 2030-01-01"));
        assert!(output.contains("- Repeats: every 2 weeks"));
        assert!(output.contains("> Important but due later"));
        assert!(!output.contains("Why this date"));
    }

    #[test]
    fn test_context_display() {
        assert_eq!(
            StudentContext::default().to_string(),
            "No context recorded yet.\n"
        );

        let context = StudentContext {
            exams: vec![DatedNote {
                text: "Algebra".to_string(),
                date: Some(date(2024, 6, 2)),
            }],
            mood: "tired".to_string(),
            ..StudentContext::default()
        };
        let output = context.to_string();
        assert!(output.contains("## Exams"));
        assert!(output.contains("- Algebra (2024-06-02)"));
        assert!(output.contains("- **Mood**: tired"));
        assert!(!output.contains("Assignments"));
    }

    #[test]
    fn test_settings_display_masks_key() {
        let settings = AppSettings {
            api_key: Some("secret-abcd".to_string()),
            coaching_enabled: false,
        };
        let output = settings.to_string();
        assert!(output.contains("ending in `abcd`"));
        assert!(!output.contains("secret"));
        assert!(output.contains("manual moves**: off"));
        assert!(AppSettings::default().to_string().contains("not set"));
    }
}
