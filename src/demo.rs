//! Scripted end-to-end demonstration of the lifecycle engine.
//!
//! Seeds a handful of applications with deadlines compressed to seconds,
//! then walks through everything the engine does: timer-driven reminders
//! and auto-archive, reconciliation catch-up for deadlines that were
//! already past at creation, status signals, queries and the error paths.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::Result;
use chrono::{Duration, Utc};

use crate::clock::SystemClock;
use crate::config::EngineConfig;
use crate::engine::{CreateWorkflow, WorkflowEngine};
use crate::generator::CoverLetterGenerator;
use crate::notify::{LogNotifier, Notifier, WebhookNotifier};
use crate::ui::DemoScreen;
use crate::workflow::ApplicationStatus;

pub async fn run(config: EngineConfig) -> Result<()> {
    tracing::debug!(
        lead_days = config.reminder_lead_days,
        "reminder lead time is informational, reminders fire at the deadline"
    );
    tracing::debug!(
        configured = %config.grace_period(),
        "compressing the grace period to seconds for the demo"
    );

    // Compressed timing: grace period and first deadline small enough to
    // watch and far enough apart for the two timers to be visibly distinct.
    let demo_grace = Duration::seconds(4);
    let demo_deadline = Duration::seconds(6);

    let notifier: Arc<dyn Notifier> = match &config.webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
        None => Arc::new(LogNotifier),
    };
    let engine = Arc::new(WorkflowEngine::new(
        Arc::new(SystemClock),
        CoverLetterGenerator::from_config(&config),
        notifier,
        demo_grace,
    ));
    let scan_loop = engine.clone().spawn_scan_loop(config.scan_interval());

    let ui = DemoScreen::new();
    let now = Utc::now();

    ui.section("Creating applications");
    engine.create_workflow(CreateWorkflow {
        application_id: "1".into(),
        company: "ActiveCorp".into(),
        role: "Frontend Developer".into(),
        description: "Building responsive UI components using React.".into(),
        deadline: now + demo_deadline,
    })?;
    engine.create_workflow(CreateWorkflow {
        application_id: "2".into(),
        company: "ReminderCorp".into(),
        role: "Backend Developer".into(),
        description: "Develop scalable APIs with Node.js and Express.".into(),
        // Already past the deadline but inside the grace window.
        deadline: now - Duration::seconds(2),
    })?;
    engine.create_workflow(CreateWorkflow {
        application_id: "3".into(),
        company: "OverdueCorp".into(),
        role: "QA Engineer".into(),
        description: "Manual and automated testing of web applications.".into(),
        // Deadline and grace long gone; only the scan can settle this one.
        deadline: now - Duration::days(3),
    })?;
    ui.print_summaries(&engine.list_workflows());

    if let Err(err) = engine.create_workflow(CreateWorkflow {
        application_id: "1".into(),
        company: "ActiveCorp".into(),
        role: "Frontend Developer".into(),
        description: String::new(),
        deadline: now + demo_deadline,
    }) {
        ui.print_rejection("duplicate create rejected:", &err);
    }

    ui.section("Reconciliation scan (catch-up for past deadlines)");
    let report = engine.run_scan();
    ui.print_scan_report(&report);
    ui.print_summaries(&engine.list_workflows());

    ui.section("Status signal");
    engine.signal_status("1", ApplicationStatus::Interview)?;
    let snap = engine.query_status("1")?;
    println!("  application 1 is now [{}]", snap.status);

    ui.section("Manual reminder re-send");
    engine.signal_reminder("2")?;
    println!(
        "  application 2: reminder_sent={}",
        engine.query_status("2")?.reminder_sent
    );

    let spinner = ui.spinner("waiting for the deadline reminder on application 1...");
    tokio::time::sleep(StdDuration::from_secs(7)).await;
    spinner.finish_and_clear();

    let snap = engine.query_status("1")?;
    println!(
        "  application 1: status [{}], reminder_sent={}",
        snap.status, snap.reminder_sent
    );

    ui.section("Cover letter");
    match engine.query_cover_letter("1")? {
        Some(letter) => println!("{}", letter.content),
        None => println!("  still generating..."),
    }

    let spinner = ui.spinner("waiting for the grace period to run out...");
    tokio::time::sleep(StdDuration::from_secs(4)).await;
    spinner.finish_and_clear();

    ui.section("After the grace period");
    if let Err(err) = engine.signal_status("1", ApplicationStatus::Offer) {
        ui.print_rejection("late signal rejected:", &err);
    }
    ui.print_summaries(&engine.list_workflows());

    scan_loop.abort();
    Ok(())
}
