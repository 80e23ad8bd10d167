use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => anyhow::bail!("unknown priority {other:?}"),
        }
    }
}

/// A task as returned to its owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    #[serde(with = "due_date")]
    pub due_date: Option<time::Date>,
    pub owner_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Row shape of the `tasks` table; priority is stored as text.
#[derive(Debug, FromRow)]
pub struct TaskRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: String,
    pub due_date: Option<time::Date>,
    pub created_at: OffsetDateTime,
}

impl TryFrom<TaskRow> for Task {
    type Error = anyhow::Error;

    fn try_from(r: TaskRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            title: r.title,
            description: r.description,
            completed: r.completed,
            priority: r.priority.parse()?,
            due_date: r.due_date,
            owner_id: r.owner_id,
            created_at: r.created_at,
        })
    }
}

/// Validated fields of a task about to be created.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<time::Date>,
}

/// Fields to change on an existing task. `None` leaves a field alone; for
/// nullable fields `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<time::Date>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }

    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

/// `YYYY-MM-DD` dates. Empty strings and `null` read as no date; a full
/// RFC 3339 timestamp is accepted and truncated to its date.
pub(crate) mod due_date {
    use serde::{de::Error as _, ser::Error as _, Deserialize, Deserializer, Serializer};
    use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};

    pub fn parse(s: &str) -> Result<Date, time::error::Parse> {
        let s = s.trim();
        match Date::parse(s, format_description!("[year]-[month]-[day]")) {
            Ok(d) => Ok(d),
            Err(e) => OffsetDateTime::parse(s, &Rfc3339).map(|t| t.date()).map_err(|_| e),
        }
    }

    pub fn serialize<S: Serializer>(date: &Option<Date>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => {
                let text = d
                    .format(format_description!("[year]-[month]-[day]"))
                    .map_err(S::Error::custom)?;
                s.serialize_str(&text)
            }
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Date>, D::Error> {
        match Option::<String>::deserialize(d)? {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse(&s).map(Some).map_err(D::Error::custom),
        }
    }

    /// For patches: a present key (even `null`) yields `Some`.
    pub fn deserialize_patch<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Option<Date>>, D::Error> {
        deserialize(d).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn sample() -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Buy milk".into(),
            description: Some("2 litres".into()),
            completed: false,
            priority: Priority::High,
            due_date: Some(date!(2025 - 03 - 01)),
            owner_id: Uuid::new_v4(),
            created_at: datetime!(2025-02-01 10:00 UTC),
        }
    }

    #[test]
    fn priority_defaults_to_medium_and_parses() {
        assert_eq!(Priority::default(), Priority::Medium);
        for p in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(p.as_str().parse::<Priority>().unwrap(), p);
        }
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn task_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["dueDate"], "2025-03-01");
        assert_eq!(json["priority"], "high");
        assert!(json.get("ownerId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("owner_id").is_none());
    }

    #[test]
    fn row_with_bad_priority_is_an_error() {
        let t = sample();
        let row = TaskRow {
            id: t.id,
            owner_id: t.owner_id,
            title: t.title,
            description: None,
            completed: false,
            priority: "urgent".into(),
            due_date: None,
            created_at: t.created_at,
        };
        assert!(Task::try_from(row).is_err());
    }

    #[test]
    fn due_date_accepts_date_or_timestamp() {
        assert_eq!(due_date::parse("2025-03-01").unwrap(), date!(2025 - 03 - 01));
        assert_eq!(
            due_date::parse("2025-03-01T18:30:00Z").unwrap(),
            date!(2025 - 03 - 01)
        );
        assert!(due_date::parse("next tuesday").is_err());
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let original = sample();
        let mut task = original.clone();
        TaskPatch {
            title: Some("Buy oat milk".into()),
            ..TaskPatch::default()
        }
        .apply(&mut task);

        assert_eq!(task.title, "Buy oat milk");
        assert_eq!(task.description, original.description);
        assert_eq!(task.priority, original.priority);
        assert_eq!(task.due_date, original.due_date);
        assert_eq!(task.completed, original.completed);
    }

    #[test]
    fn patch_can_clear_nullable_fields() {
        let mut task = sample();
        TaskPatch {
            description: Some(None),
            due_date: Some(None),
            ..TaskPatch::default()
        }
        .apply(&mut task);
        assert_eq!(task.description, None);
        assert_eq!(task.due_date, None);
        assert!(TaskPatch::default().is_empty());
    }
}
