use chrono::{DateTime, Utc};
use serde::Serialize;

/// What the notification sink receives when a reminder fires.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderNotice {
    pub application_id: String,
    pub company: String,
    pub role: String,
    pub deadline: DateTime<Utc>,
    /// Ceiling of the time left until the deadline, in days. Zero or
    /// negative once the reminder window has opened.
    pub days_until_deadline: i64,
}

impl ReminderNotice {
    pub fn message(&self) -> String {
        format!(
            "REMINDER: Application deadline for {} at {} is in {} days ({})",
            self.role,
            self.company,
            self.days_until_deadline,
            self.deadline.format("%Y-%m-%d")
        )
    }
}

/// Delivery channel for reminder notices.
///
/// The engine guarantees at-most-once delivery per scheduled timer and per
/// reconciliation catch-up; manual re-sends deliberately re-invoke the sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &ReminderNotice);
}

/// Default sink: writes the reminder to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &ReminderNotice) {
        tracing::info!(
            application_id = %notice.application_id,
            "{}",
            notice.message()
        );
    }
}

/// Posts reminder notices to a webhook as JSON, fire-and-forget.
///
/// Delivery failures are logged, never propagated: a broken webhook must
/// not affect the instance that triggered the reminder.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, notice: &ReminderNotice) {
        let client = self.client.clone();
        let url = self.url.clone();
        let notice = notice.clone();
        tokio::spawn(async move {
            match client.post(&url).json(&notice).send().await {
                Ok(resp) if resp.status().is_success() => {}
                Ok(resp) => tracing::warn!(
                    application_id = %notice.application_id,
                    status = resp.status().as_u16(),
                    "webhook rejected reminder"
                ),
                Err(err) => tracing::warn!(
                    application_id = %notice.application_id,
                    error = %err,
                    "webhook delivery failed"
                ),
            }
        });
    }
}
