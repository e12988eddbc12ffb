//! Interface de linha de comando do Applyflow baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (demo, letter)
//! e a flag global `--verbose`.

use clap::{Parser, Subcommand};

/// Applyflow — Motor de workflow para o ciclo de vida de candidaturas.
#[derive(Debug, Parser)]
#[command(name = "applyflow", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Executa a demonstração embutida do motor de workflow, com prazos
    /// comprimidos para segundos.
    Demo,

    /// Gera uma carta de apresentação avulsa para a vaga informada.
    Letter {
        /// Nome da empresa.
        company: String,

        /// Título da vaga.
        role: String,

        /// Descrição da vaga usada para personalizar a carta.
        #[arg(long)]
        description: Option<String>,
    },
}
