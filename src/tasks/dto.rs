use serde::{Deserialize, Deserializer};

use crate::tasks::repo_types::{due_date, Priority};

/// Body of `POST /api/tasks`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    #[serde(default, with = "due_date")]
    pub due_date: Option<time::Date>,
}

/// Body of `PUT /api/tasks/:id`. Absent keys are left untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "due_date::deserialize_patch")]
    pub due_date: Option<Option<time::Date>>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent key (`None`).
fn present<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(d).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn create_defaults() {
        let req: CreateTaskRequest = serde_json::from_str(r#"{"title":"Buy milk"}"#).unwrap();
        assert_eq!(req.title, "Buy milk");
        assert!(req.priority.is_none());
        assert!(req.due_date.is_none());
    }

    #[test]
    fn create_reads_camel_case_due_date() {
        let req: CreateTaskRequest = serde_json::from_str(
            r#"{"title":"t","priority":"low","dueDate":"2025-03-01","description":"d"}"#,
        )
        .unwrap();
        assert_eq!(req.priority, Some(Priority::Low));
        assert_eq!(req.due_date, Some(date!(2025 - 03 - 01)));
    }

    #[test]
    fn create_rejects_unknown_fields_and_owner_override() {
        assert!(serde_json::from_str::<CreateTaskRequest>(r#"{"title":"t","ownerId":"x"}"#).is_err());
        assert!(serde_json::from_str::<CreateTaskRequest>(r#"{"title":"t","priority":"urgent"}"#).is_err());
    }

    #[test]
    fn update_distinguishes_null_from_absent() {
        let absent: UpdateTaskRequest = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(absent.description, None);
        assert_eq!(absent.due_date, None);

        let cleared: UpdateTaskRequest =
            serde_json::from_str(r#"{"description":null,"dueDate":null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));
        assert_eq!(cleared.due_date, Some(None));

        let set: UpdateTaskRequest =
            serde_json::from_str(r#"{"dueDate":"2025-12-24","completed":true}"#).unwrap();
        assert_eq!(set.due_date, Some(Some(date!(2025 - 12 - 24))));
        assert_eq!(set.completed, Some(true));
    }
}
