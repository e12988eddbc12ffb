use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::ApplicationStatus;
use crate::error::EngineError;
use crate::notify::ReminderNotice;
use crate::reconcile::Reconciliation;
use crate::scheduler::TimerHandle;

/// The generated cover-letter artifact. Set at most once by the generation
/// side effect; regeneration is last-write-wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverLetter {
    pub content: String,
    pub generated_at: DateTime<Utc>,
    pub company: String,
    pub role: String,
}

/// Point-in-time answer to a status query.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub status: ApplicationStatus,
    pub archived: bool,
    pub reminder_sent: bool,
    pub last_updated_at: DateTime<Utc>,
}

/// One row of a workflow listing.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSummary {
    pub application_id: String,
    pub workflow_id: String,
    pub company: String,
    pub role: String,
    pub status: ApplicationStatus,
    pub archived: bool,
}

// Mutable part of an instance, guarded by the per-instance lock. Two
// operations on the same instance never interleave their read-modify-write;
// operations on different instances proceed in parallel.
#[derive(Debug)]
struct InstanceState {
    status: ApplicationStatus,
    archived: bool,
    reminder_sent: bool,
    cover_letter: Option<CoverLetter>,
    last_updated_at: DateTime<Utc>,
    reminder_timer: Option<TimerHandle>,
    archive_timer: Option<TimerHandle>,
}

/// One workflow state machine bound to one application.
///
/// Identity and deadline are fixed at creation; a rescheduled deadline
/// requires a new instance. Everything mutable lives behind the instance
/// lock. Timer callbacks, external signals and the reconciliation scan all
/// funnel through the named transitions below.
#[derive(Debug)]
pub struct WorkflowInstance {
    application_id: String,
    workflow_id: String,
    company: String,
    role: String,
    deadline: DateTime<Utc>,
    created_at: DateTime<Utc>,
    state: Mutex<InstanceState>,
}

impl WorkflowInstance {
    pub fn new(
        application_id: String,
        company: String,
        role: String,
        deadline: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            application_id,
            workflow_id: Uuid::new_v4().to_string(),
            company,
            role,
            deadline,
            created_at: now,
            state: Mutex::new(InstanceState {
                status: ApplicationStatus::Applied,
                archived: false,
                reminder_sent: false,
                cover_letter: None,
                last_updated_at: now,
                reminder_timer: None,
                archive_timer: None,
            }),
        }
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Install timer handles produced at creation time.
    ///
    /// Only empty slots are filled, so re-entry cannot leave two reminder
    /// or two archive timers outstanding. If the instance archived before
    /// the handles arrived, they are cancelled instead of stored.
    pub fn arm_timers(&self, reminder: Option<TimerHandle>, archive: Option<TimerHandle>) {
        let mut state = self.lock_state();
        if state.archived {
            // Dropping the handles aborts the underlying timers.
            return;
        }
        if state.reminder_timer.is_none() {
            state.reminder_timer = reminder;
        }
        if state.archive_timer.is_none() {
            state.archive_timer = archive;
        }
    }

    /// External status signal. Rejected once archived; `Archived` as the
    /// requested value is routed through the archive transition so the
    /// status/flag pair cannot diverge.
    pub fn signal_update_status(
        &self,
        new_status: ApplicationStatus,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        let mut state = self.lock_state();
        if state.archived {
            return Err(EngineError::InvalidTransition {
                id: self.application_id.clone(),
                requested: new_status,
            });
        }
        if new_status.is_terminal() {
            Self::archive_locked(&mut state, now);
            tracing::info!(application_id = %self.application_id, "archived by signal");
            return Ok(());
        }
        state.status = new_status;
        state.last_updated_at = now;
        tracing::info!(
            application_id = %self.application_id,
            status = %new_status,
            "status updated"
        );
        Ok(())
    }

    /// Manual reminder signal. Sets `reminder_sent` (monotonic) and hands
    /// back the notice for the sink; repeated calls re-notify on purpose.
    pub fn send_reminder(&self, now: DateTime<Utc>) -> ReminderNotice {
        let mut state = self.lock_state();
        state.reminder_sent = true;
        state.last_updated_at = now;
        self.notice(now)
    }

    /// Reminder-timer callback. Unlike the manual signal this is a no-op
    /// once the instance has archived (the timer lost the race with
    /// archive).
    pub fn timer_reminder(&self, now: DateTime<Utc>) -> Option<ReminderNotice> {
        let mut state = self.lock_state();
        if state.archived {
            return None;
        }
        state.reminder_sent = true;
        state.last_updated_at = now;
        Some(self.notice(now))
    }

    /// Archive transition, shared by the archive timer, the reconciliation
    /// scan and an explicit `Archived` signal. Returns whether this call
    /// performed the transition; firing again is a no-op.
    pub fn archive(&self, now: DateTime<Utc>) -> bool {
        let mut state = self.lock_state();
        Self::archive_locked(&mut state, now)
    }

    fn archive_locked(state: &mut InstanceState, now: DateTime<Utc>) -> bool {
        if state.archived {
            return false;
        }
        state.archived = true;
        state.status = ApplicationStatus::Archived;
        state.last_updated_at = now;
        // A still-outstanding reminder must not fire for an archived
        // application; the archive timer handle is spent either way.
        if let Some(timer) = state.reminder_timer.take() {
            timer.cancel();
        }
        state.archive_timer.take();
        true
    }

    /// Store the generation result, last-write-wins. A letter arriving
    /// after archive is still kept for audit but leaves `last_updated_at`
    /// untouched.
    pub fn set_cover_letter(&self, letter: CoverLetter, now: DateTime<Utc>) {
        let mut state = self.lock_state();
        state.cover_letter = Some(letter);
        if !state.archived {
            state.last_updated_at = now;
        }
    }

    pub fn status_snapshot(&self) -> StatusSnapshot {
        let state = self.lock_state();
        StatusSnapshot {
            status: state.status,
            archived: state.archived,
            reminder_sent: state.reminder_sent,
            last_updated_at: state.last_updated_at,
        }
    }

    pub fn cover_letter(&self) -> Option<CoverLetter> {
        self.lock_state().cover_letter.clone()
    }

    pub fn summary(&self) -> WorkflowSummary {
        let state = self.lock_state();
        WorkflowSummary {
            application_id: self.application_id.clone(),
            workflow_id: self.workflow_id.clone(),
            company: self.company.clone(),
            role: self.role.clone(),
            status: state.status,
            archived: state.archived,
        }
    }

    /// Recompute the derived flags from the clock and apply whatever the
    /// timers should have done by `now`: force-archive past the grace
    /// period, or catch up a missed reminder inside the window. Idempotent;
    /// changes nothing when nothing is due.
    pub fn reconcile(&self, now: DateTime<Utc>, grace: Duration) -> Reconciliation {
        let mut state = self.lock_state();
        if state.archived {
            return Reconciliation::settled();
        }

        let grace_end = self.deadline + grace;
        let reminder = now > self.deadline && now <= grace_end;
        let overdue = now > grace_end;

        let mut archived_now = false;
        let mut reminder_notice = None;
        if overdue {
            archived_now = Self::archive_locked(&mut state, now);
        } else if reminder && !state.reminder_sent {
            state.reminder_sent = true;
            state.last_updated_at = now;
            reminder_notice = Some(self.notice(now));
        }

        Reconciliation {
            reminder,
            overdue,
            archived_now,
            reminder_notice,
        }
    }

    fn notice(&self, now: DateTime<Utc>) -> ReminderNotice {
        ReminderNotice {
            application_id: self.application_id.clone(),
            company: self.company.clone(),
            role: self.role.clone(),
            deadline: self.deadline,
            days_until_deadline: days_until(self.deadline, now),
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, InstanceState> {
        self.state.lock().expect("instance state lock poisoned")
    }
}

// Ceiling of the distance to the deadline in days, matching how the
// notification message has always counted.
fn days_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    ((deadline - now).num_milliseconds() as f64 / 86_400_000.0).ceil() as i64
}
