//! Fire-and-forget notification dispatch.
//!
//! Events are published to NATS on a background task; failures are logged and
//! dropped. At-most-once, no delivery guarantee, never blocks a request.

use serde_json::Value;

/// Template codes understood by the downstream notification service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    OrderProcessing,
    OrderPayment,
    ProductDispatched,
    ProductAdded,
    CommentPosted,
}

impl Event {
    pub fn code(self) -> &'static str {
        match self {
            Event::OrderProcessing => "ORDPRCS",
            Event::OrderPayment => "ORDPYMT",
            Event::ProductDispatched => "PRDDISP",
            Event::ProductAdded => "PRDAD",
            Event::CommentPosted => "CMTPST",
        }
    }
}

#[derive(Clone)]
pub struct Notifier {
    client: Option<async_nats::Client>,
}

impl Notifier {
    /// Connects if a NATS URL is configured; otherwise the notifier is a
    /// no-op and the service runs without it.
    pub async fn connect(url: Option<String>) -> Self {
        let client = match url {
            Some(url) => match async_nats::connect(&url).await {
                Ok(client) => Some(client),
                Err(err) => {
                    tracing::warn!(error = %err, "notifier unavailable, events will be dropped");
                    None
                }
            },
            None => None,
        };
        Self { client }
    }

    pub fn send(&self, event: Event, payload: Value) {
        let code = event.code();
        let Some(client) = self.client.clone() else {
            tracing::debug!(code, "notifier disabled, dropping event");
            return;
        };
        let body = serde_json::json!({ "code": code, "payload": payload });
        tokio::spawn(async move {
            let bytes = serde_json::to_vec(&body).unwrap_or_default();
            if let Err(err) = client.publish(format!("notify.{code}"), bytes.into()).await {
                tracing::warn!(code, error = %err, "failed to publish notification");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_codes() {
        assert_eq!(Event::OrderProcessing.code(), "ORDPRCS");
        assert_eq!(Event::OrderPayment.code(), "ORDPYMT");
        assert_eq!(Event::ProductDispatched.code(), "PRDDISP");
        assert_eq!(Event::ProductAdded.code(), "PRDAD");
        assert_eq!(Event::CommentPosted.code(), "CMTPST");
    }
}
