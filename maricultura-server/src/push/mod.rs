//! Web push delivery (VAPID, aes128gcm)
//!
//! Subscriptions the push service reports as gone (404/410) are collected so
//! the caller can delete them.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use shared::models::{PushMessage, PushSubscription};
use web_push::{
    ContentEncoding, IsahcWebPushClient, SubscriptionInfo, URL_SAFE_NO_PAD, VapidSignatureBuilder,
    WebPushClient, WebPushError, WebPushMessageBuilder,
};

use crate::config::Config;

/// Notification TTL at the push service (seconds)
const PUSH_TTL: u32 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Sent,
    /// Endpoint expired or unsubscribed
    Gone,
    Failed(String),
}

/// Something that can deliver an encrypted payload to one subscription
pub trait Deliver {
    fn deliver(
        &self,
        subscription: &PushSubscription,
        payload: &[u8],
    ) -> impl Future<Output = Delivery> + Send;
}

#[derive(Clone)]
pub struct PushSender {
    client: Option<Arc<IsahcWebPushClient>>,
    vapid_private_key: Option<String>,
    subject: String,
}

impl PushSender {
    pub fn from_config(config: &Config) -> Self {
        let client = match (&config.vapid_private_key, IsahcWebPushClient::new()) {
            (Some(_), Ok(client)) => Some(Arc::new(client)),
            (Some(_), Err(e)) => {
                tracing::error!("Failed to create web push client: {e}");
                None
            }
            (None, _) => {
                tracing::warn!("VAPID_PRIVATE_KEY not set, web push disabled");
                None
            }
        };
        Self {
            client,
            vapid_private_key: config.vapid_private_key.clone(),
            subject: config.vapid_subject.clone(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            client: None,
            vapid_private_key: None,
            subject: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some() && self.vapid_private_key.is_some()
    }

    async fn try_deliver(
        &self,
        subscription: &PushSubscription,
        payload: &[u8],
    ) -> Result<(), WebPushError> {
        let (Some(client), Some(key)) = (&self.client, &self.vapid_private_key) else {
            return Err(WebPushError::Unspecified);
        };
        let info = SubscriptionInfo::new(
            &subscription.endpoint,
            &subscription.p256dh,
            &subscription.auth,
        );

        let mut signature = VapidSignatureBuilder::from_base64(key, URL_SAFE_NO_PAD, &info)?;
        signature.add_claim("sub", self.subject.as_str());
        let signature = signature.build()?;

        let mut builder = WebPushMessageBuilder::new(&info);
        builder.set_payload(ContentEncoding::Aes128Gcm, payload);
        builder.set_ttl(PUSH_TTL);
        builder.set_vapid_signature(signature);

        client.send(builder.build()?).await
    }
}

impl Deliver for PushSender {
    async fn deliver(&self, subscription: &PushSubscription, payload: &[u8]) -> Delivery {
        classify(self.try_deliver(subscription, payload).await)
    }
}

fn classify(result: Result<(), WebPushError>) -> Delivery {
    match result {
        Ok(()) => Delivery::Sent,
        Err(WebPushError::EndpointNotValid | WebPushError::EndpointNotFound) => Delivery::Gone,
        Err(e) => Delivery::Failed(e.to_string()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BroadcastReport {
    pub sent: usize,
    pub failed: usize,
    pub removed: usize,
}

/// Deliver `message` to every subscription.
///
/// Returns the report plus the ids of gone subscriptions; `removed` counts
/// them but deleting is left to the caller.
pub async fn fan_out<D: Deliver>(
    deliverer: &D,
    subscriptions: &[PushSubscription],
    message: &PushMessage,
) -> (BroadcastReport, Vec<i64>) {
    let mut report = BroadcastReport::default();
    let mut gone = Vec::new();

    let payload = match serde_json::to_vec(message) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Failed to encode push payload: {e}");
            report.failed = subscriptions.len();
            return (report, gone);
        }
    };

    for subscription in subscriptions {
        match deliverer.deliver(subscription, &payload).await {
            Delivery::Sent => report.sent += 1,
            Delivery::Gone => {
                report.removed += 1;
                gone.push(subscription.id);
            }
            Delivery::Failed(reason) => {
                tracing::warn!(subscription_id = subscription.id, %reason, "Push delivery failed");
                report.failed += 1;
            }
        }
    }

    (report, gone)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeDeliverer;

    impl Deliver for FakeDeliverer {
        async fn deliver(&self, subscription: &PushSubscription, payload: &[u8]) -> Delivery {
            assert!(!payload.is_empty());
            if subscription.endpoint.ends_with("/gone") {
                Delivery::Gone
            } else if subscription.endpoint.ends_with("/down") {
                Delivery::Failed("503".to_string())
            } else {
                Delivery::Sent
            }
        }
    }

    fn subscription(id: i64, endpoint: &str) -> PushSubscription {
        PushSubscription {
            id,
            user_id: None,
            endpoint: format!("https://push.example.org{endpoint}"),
            p256dh: "key".to_string(),
            auth: "auth".to_string(),
            created_at: 0,
        }
    }

    fn message() -> PushMessage {
        PushMessage {
            title: "Mensalidade".to_string(),
            body: "Sua mensalidade vence hoje".to_string(),
            url: Some("/area-do-maricultor".to_string()),
        }
    }

    #[tokio::test]
    async fn test_fan_out_counts_outcomes() {
        let subs = vec![
            subscription(1, "/ok"),
            subscription(2, "/gone"),
            subscription(3, "/down"),
            subscription(4, "/ok"),
        ];
        let (report, gone) = fan_out(&FakeDeliverer, &subs, &message()).await;
        assert_eq!(
            report,
            BroadcastReport {
                sent: 2,
                failed: 1,
                removed: 1
            }
        );
        assert_eq!(gone, vec![2]);
    }

    #[tokio::test]
    async fn test_fan_out_empty() {
        let (report, gone) = fan_out(&FakeDeliverer, &[], &message()).await;
        assert_eq!(report, BroadcastReport::default());
        assert!(gone.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_sender_fails_delivery() {
        let sender = PushSender::disabled();
        assert!(!sender.is_enabled());
        let outcome = sender.deliver(&subscription(1, "/ok"), b"{}").await;
        assert!(matches!(outcome, Delivery::Failed(_)));
    }

    #[test]
    fn test_gone_endpoints_are_classified() {
        assert_eq!(classify(Ok(())), Delivery::Sent);
        assert_eq!(classify(Err(WebPushError::EndpointNotFound)), Delivery::Gone);
        assert_eq!(classify(Err(WebPushError::EndpointNotValid)), Delivery::Gone);
        assert!(matches!(
            classify(Err(WebPushError::Unspecified)),
            Delivery::Failed(_)
        ));
    }
}
