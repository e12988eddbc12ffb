use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::clock::Clock;
use crate::error::EngineError;
use crate::generator::CoverLetterGenerator;
use crate::notify::Notifier;
use crate::reconcile::ScanReport;
use crate::scheduler::{TimerHandle, TimerScheduler};
use crate::workflow::{
    ApplicationStatus, CoverLetter, StatusSnapshot, WorkflowInstance, WorkflowRegistry,
    WorkflowSummary,
};

/// Inputs for creating a workflow. The application record itself lives with
/// the calling service; the engine keeps only what its side effects need.
#[derive(Debug, Clone)]
pub struct CreateWorkflow {
    pub application_id: String,
    pub company: String,
    pub role: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
}

/// The lifecycle engine: registry, timers, generation and notification
/// wired together behind the operations the owning service calls.
///
/// Everything here is single-process and in-memory. After a restart the
/// timers are gone; running [`WorkflowEngine::run_scan`] re-derives the
/// correct flags from the clock alone.
pub struct WorkflowEngine {
    clock: Arc<dyn Clock>,
    scheduler: TimerScheduler,
    registry: WorkflowRegistry,
    generator: Arc<CoverLetterGenerator>,
    notifier: Arc<dyn Notifier>,
    grace_period: Duration,
}

impl WorkflowEngine {
    pub fn new(
        clock: Arc<dyn Clock>,
        generator: CoverLetterGenerator,
        notifier: Arc<dyn Notifier>,
        grace_period: Duration,
    ) -> Self {
        Self {
            scheduler: TimerScheduler::new(clock.clone()),
            clock,
            registry: WorkflowRegistry::new(),
            generator: Arc::new(generator),
            notifier,
            grace_period,
        }
    }

    /// Start a workflow for a submitted application: register the
    /// instance, kick off cover-letter generation in the background and
    /// arm the reminder and auto-archive timers. Returns the engine's
    /// workflow id for the new instance.
    pub fn create_workflow(&self, req: CreateWorkflow) -> Result<String, EngineError> {
        let now = self.clock.now();
        let instance = Arc::new(WorkflowInstance::new(
            req.application_id.clone(),
            req.company.clone(),
            req.role.clone(),
            req.deadline,
            now,
        ));
        self.registry.insert(instance.clone())?;
        let workflow_id = instance.workflow_id().to_string();

        // Generation runs detached; its failure mode is the fallback
        // letter, never an error for the caller. A result landing after
        // the instance moved on is still applied, last-write-wins.
        {
            let generator = self.generator.clone();
            let instance = instance.clone();
            let clock = self.clock.clone();
            tokio::spawn(async move {
                let letter = generator
                    .generate(&req.company, &req.role, &req.description, clock.now())
                    .await;
                instance.set_cover_letter(letter, clock.now());
            });
        }

        let reminder = self.schedule_reminder(&instance);
        let archive = self.schedule_archive(&instance);
        instance.arm_timers(reminder, archive);

        tracing::info!(
            application_id = %instance.application_id(),
            workflow_id = %workflow_id,
            deadline = %instance.deadline(),
            "workflow started"
        );
        Ok(workflow_id)
    }

    // Reminder fires at the deadline instant; the window it opens stays
    // open until the end of the grace period.
    fn schedule_reminder(&self, instance: &Arc<WorkflowInstance>) -> Option<TimerHandle> {
        let callback_instance = instance.clone();
        let notifier = self.notifier.clone();
        let clock = self.clock.clone();
        let scheduled = self.scheduler.schedule(instance.deadline(), move || {
            if let Some(notice) = callback_instance.timer_reminder(clock.now()) {
                notifier.notify(&notice);
            }
        });
        match scheduled {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::debug!(
                    application_id = %instance.application_id(),
                    error = %err,
                    "reminder timer not armed, reconciliation scan takes over"
                );
                None
            }
        }
    }

    fn schedule_archive(&self, instance: &Arc<WorkflowInstance>) -> Option<TimerHandle> {
        let callback_instance = instance.clone();
        let clock = self.clock.clone();
        let at = instance.deadline() + self.grace_period;
        let scheduled = self.scheduler.schedule(at, move || {
            if callback_instance.archive(clock.now()) {
                tracing::info!(
                    application_id = %callback_instance.application_id(),
                    "auto-archived after grace period"
                );
            }
        });
        match scheduled {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::debug!(
                    application_id = %instance.application_id(),
                    error = %err,
                    "archive timer not armed, reconciliation scan takes over"
                );
                None
            }
        }
    }

    /// External status signal for one application.
    pub fn signal_status(
        &self,
        application_id: &str,
        new_status: ApplicationStatus,
    ) -> Result<(), EngineError> {
        let instance = self.lookup(application_id)?;
        instance.signal_update_status(new_status, self.clock.now())
    }

    /// Manual reminder: marks the instance and invokes the sink, also on
    /// repeat calls (re-sending is the point of the manual signal).
    pub fn signal_reminder(&self, application_id: &str) -> Result<(), EngineError> {
        let instance = self.lookup(application_id)?;
        let notice = instance.send_reminder(self.clock.now());
        self.notifier.notify(&notice);
        Ok(())
    }

    pub fn query_status(&self, application_id: &str) -> Result<StatusSnapshot, EngineError> {
        Ok(self.lookup(application_id)?.status_snapshot())
    }

    pub fn query_cover_letter(
        &self,
        application_id: &str,
    ) -> Result<Option<CoverLetter>, EngineError> {
        Ok(self.lookup(application_id)?.cover_letter())
    }

    pub fn list_workflows(&self) -> Vec<WorkflowSummary> {
        self.registry
            .snapshot()
            .iter()
            .map(|instance| instance.summary())
            .collect()
    }

    /// Sweep every instance and apply whatever elapsed time demands:
    /// catch-up reminders inside the window, force-archive past grace.
    /// Safe to run at any moment, any number of times.
    pub fn run_scan(&self) -> ScanReport {
        let mut report = ScanReport::default();
        for instance in self.registry.snapshot() {
            let rec = instance.reconcile(self.clock.now(), self.grace_period);
            if let Some(notice) = &rec.reminder_notice {
                self.notifier.notify(notice);
            }
            if rec.archived_now {
                tracing::info!(
                    application_id = %instance.application_id(),
                    "archived by reconciliation scan"
                );
            }
            report.record(instance.application_id(), &rec);
        }
        if report.is_quiet() {
            tracing::debug!(scanned = report.scanned, "reconciliation scan: nothing due");
        } else {
            tracing::info!(
                scanned = report.scanned,
                reminders = report.reminders_sent,
                archived = report.archived,
                "reconciliation scan applied changes"
            );
        }
        report
    }

    /// Run the scan on a fixed interval until the task is aborted.
    pub fn spawn_scan_loop(self: Arc<Self>, every: std::time::Duration) -> tokio::task::JoinHandle<()> {
        let engine = self;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                engine.run_scan();
            }
        })
    }

    fn lookup(&self, application_id: &str) -> Result<Arc<WorkflowInstance>, EngineError> {
        self.registry
            .get(application_id)
            .ok_or_else(|| EngineError::NotFound(application_id.to_string()))
    }
}
