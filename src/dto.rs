use serde::Serialize;

/// `{"message": ...}` body shared by endpoints with nothing else to return.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_message_object() {
        let json = serde_json::to_value(MessageResponse {
            message: "Task deleted",
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Task deleted" }));
    }
}
