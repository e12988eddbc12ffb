use serde::Serialize;

use crate::notify::ReminderNotice;

/// What one reconciliation pass decided about one instance.
///
/// `reminder` and `overdue` are the derived flags recomputed from the
/// clock; `archived_now` and `reminder_notice` report the transitions this
/// pass actually performed (both empty when the pass changed nothing).
#[derive(Debug)]
pub struct Reconciliation {
    pub reminder: bool,
    pub overdue: bool,
    pub archived_now: bool,
    pub reminder_notice: Option<ReminderNotice>,
}

impl Reconciliation {
    /// An archived instance: nothing derived, nothing to do.
    pub fn settled() -> Self {
        Self {
            reminder: false,
            overdue: false,
            archived_now: false,
            reminder_notice: None,
        }
    }
}

/// Aggregate result of one sweep over the registry.
#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
    pub scanned: usize,
    pub reminders_sent: usize,
    pub archived: usize,
    /// Ids of the applications found past their grace period this sweep.
    pub overdue: Vec<String>,
}

impl ScanReport {
    pub fn record(&mut self, application_id: &str, rec: &Reconciliation) {
        self.scanned += 1;
        if rec.reminder_notice.is_some() {
            self.reminders_sent += 1;
        }
        if rec.archived_now {
            self.archived += 1;
        }
        if rec.overdue {
            self.overdue.push(application_id.to_string());
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.reminders_sent == 0 && self.archived == 0
    }
}
