//! Web push subscription Model

use serde::{Deserialize, Serialize};

/// Stored browser push subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PushSubscription {
    pub id: i64,
    pub user_id: Option<i64>,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub created_at: i64,
}

/// Browser `PushSubscription.toJSON()` shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushSubscriptionInput {
    pub endpoint: String,
    pub keys: PushKeys,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushKeys {
    pub p256dh: String,
    pub auth: String,
}

impl PushSubscriptionInput {
    /// Endpoint must be https and both keys present
    pub fn is_valid(&self) -> bool {
        self.endpoint.starts_with("https://")
            && !self.keys.p256dh.trim().is_empty()
            && !self.keys.auth.trim().is_empty()
    }
}

/// Notification payload delivered to the service worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_json_shape() {
        let input: PushSubscriptionInput = serde_json::from_str(
            r#"{"endpoint":"https://fcm.googleapis.com/fcm/send/abc","expirationTime":null,
               "keys":{"p256dh":"BNc...","auth":"tBH..."}}"#,
        )
        .unwrap();
        assert!(input.is_valid());
    }

    #[test]
    fn test_rejects_plain_http_and_empty_keys() {
        let input = PushSubscriptionInput {
            endpoint: "http://push.example.org/1".to_string(),
            keys: PushKeys {
                p256dh: "k".to_string(),
                auth: "a".to_string(),
            },
        };
        assert!(!input.is_valid());

        let input = PushSubscriptionInput {
            endpoint: "https://push.example.org/1".to_string(),
            keys: PushKeys {
                p256dh: " ".to_string(),
                auth: "a".to_string(),
            },
        };
        assert!(!input.is_valid());
    }
}
