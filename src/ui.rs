//! Interface de terminal do Applyflow — spinners e saída colorida.
//!
//! Usa as crates `indicatif` para spinners de progresso e `console` para
//! estilização com cores. O [`DemoScreen`] acompanha visualmente a
//! demonstração do motor no terminal.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::reconcile::ScanReport;
use crate::workflow::{ApplicationStatus, WorkflowSummary};

/// Saída estilizada para a demonstração no terminal.
pub struct DemoScreen {
    // Estilo para títulos de seção.
    bold: Style,
    // Estilo verde para estados ativos/positivos.
    green: Style,
    // Estilo vermelho para rejeições.
    red: Style,
    // Estilo amarelo para lembretes e arquivamentos.
    yellow: Style,
    // Estilo atenuado para metadados.
    dim: Style,
}

impl DemoScreen {
    pub fn new() -> Self {
        Self {
            bold: Style::new().bold(),
            green: Style::new().green(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
        }
    }

    /// Imprime um título de seção.
    pub fn section(&self, title: &str) {
        println!("\n{}", self.bold.apply_to(title));
    }

    /// Inicia um spinner com a mensagem dada; o chamador decide quando parar.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Imprime uma linha por workflow, com o status colorido.
    pub fn print_summaries(&self, summaries: &[WorkflowSummary]) {
        for s in summaries {
            let status = self.status_style(s.status).apply_to(s.status.to_string());
            println!(
                "  {} {} @ {} [{}] {}",
                self.bold.apply_to(&s.application_id),
                s.role,
                s.company,
                status,
                self.dim.apply_to(&s.workflow_id),
            );
        }
    }

    /// Resume o resultado de uma varredura de reconciliação.
    pub fn print_scan_report(&self, report: &ScanReport) {
        if report.is_quiet() {
            println!(
                "  {}",
                self.dim
                    .apply_to(format!("scan: {} instances, nothing due", report.scanned))
            );
        } else {
            println!(
                "  scan: {} instances, {} reminder(s), {} archived",
                report.scanned,
                self.yellow.apply_to(report.reminders_sent),
                self.yellow.apply_to(report.archived),
            );
        }
    }

    /// Imprime uma falha esperada (demonstrações de erros do motor).
    pub fn print_rejection(&self, context: &str, err: &impl std::fmt::Display) {
        println!("  {} {}", self.red.apply_to(context), err);
    }

    fn status_style(&self, status: ApplicationStatus) -> &Style {
        match status {
            ApplicationStatus::Offer | ApplicationStatus::Interview => &self.green,
            ApplicationStatus::Rejected => &self.red,
            ApplicationStatus::Archived | ApplicationStatus::Withdrawn => &self.yellow,
            ApplicationStatus::Applied | ApplicationStatus::Pending => &self.dim,
        }
    }
}

impl Default for DemoScreen {
    fn default() -> Self {
        Self::new()
    }
}
