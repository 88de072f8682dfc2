use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A message delivered to a user's inbox. Created by the engine and the
/// approval workflow; only the read flag changes afterwards, and rows are
/// never deleted.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: Uuid, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            message: message.into(),
            is_read: false,
            created_at: Utc::now(),
        }
    }
}
