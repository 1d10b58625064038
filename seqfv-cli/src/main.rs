use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use anyhow::Result;

mod config;
mod commands;
mod error;

use commands::view::ViewKind;
use config::Config;
use error::{print_error_and_exit, CliError, CliResult};
use seqfv_core::{MergePolicy, RowOrder};

#[derive(Parser)]
#[command(name = "seqfv")]
#[command(about = "SeqFV - Sequence Feature Viewer track assembly")]
#[command(version)]
#[command(long_about = "
SeqFV assembles feature viewer boards: query and target sequence rows,
aligned blocks with mismatch pins, and classified annotation rows.
Responses are read from a recorded fixture bundle.

Examples:
  seqfv entity 4HHB_1 --fixtures responses.json --out board.json
  seqfv uniprot P69905 --fixtures responses.json --filter 4HHB
  seqfv instance 4HHB.A --fixtures responses.json --merge chain
  seqfv chromosome NC_000001 --fixtures responses.json
  seqfv config --example > seqfv.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// UniProt accession aligned to PDB entities
    Uniprot {
        /// UniProt accession (e.g. P69905)
        accession: String,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// PDB entity aligned to UniProt
    Entity {
        /// Entity identifier (e.g. 4HHB_1)
        entity_id: String,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// PDB instance shown through its entity alignments
    Instance {
        /// Instance identifier (e.g. 4HHB.A)
        instance_id: String,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Chromosome with mapped PDB entities as exon blocks
    Chromosome {
        /// NCBI genome identifier
        ncbi_id: String,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Print or write configuration
    Config {
        /// Emit the default configuration instead of the loaded one
        #[arg(long)]
        example: bool,

        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Clone, Debug)]
pub struct ViewArgs {
    /// Recorded responses (JSON fixture bundle)
    #[arg(long, required = true)]
    pub fixtures: PathBuf,

    /// Output board JSON (stdout if omitted)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Keep only targets whose id contains this text
    #[arg(long)]
    pub filter: Option<String>,

    /// Title for the query sequence row
    #[arg(long)]
    pub title: Option<String>,

    /// How adjacent aligned regions are folded into blocks
    #[arg(long, value_enum)]
    pub merge: Option<MergeArg>,

    /// Override the default row ordering
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Collapse residues when zoomed out
    #[arg(long)]
    pub dynamic_display: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum MergeArg {
    Pairwise,
    Chain,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OrderArg {
    AlignmentsFirst,
    AnnotationsFirst,
}

impl From<MergeArg> for MergePolicy {
    fn from(arg: MergeArg) -> Self {
        match arg {
            MergeArg::Pairwise => MergePolicy::Pairwise,
            MergeArg::Chain => MergePolicy::Chain,
        }
    }
}

impl From<OrderArg> for RowOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::AlignmentsFirst => RowOrder::AlignmentsFirst,
            OrderArg::AnnotationsFirst => RowOrder::AnnotationsFirst,
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    if quiet {
        std::env::set_var("RUST_LOG", "error");
    } else {
        let level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        std::env::set_var("RUST_LOG", level);
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();

    Ok(())
}

async fn run_view(config: &Config, kind: ViewKind, id: String, view: ViewArgs) -> CliResult<()> {
    commands::view::execute(
        config,
        kind,
        id,
        view.fixtures,
        view.out,
        view.filter,
        view.title,
        view.merge.map(Into::into),
        view.order.map(Into::into),
        view.dynamic_display,
    )
    .await
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = Config::load(cli.config.as_deref())
        .map_err(|e| CliError::config(format!("{:#}", e)))?;

    match cli.command {
        Commands::Uniprot { accession, view } => run_view(&config, ViewKind::Uniprot, accession, view).await,
        Commands::Entity { entity_id, view } => run_view(&config, ViewKind::Entity, entity_id, view).await,
        Commands::Instance { instance_id, view } => run_view(&config, ViewKind::Instance, instance_id, view).await,
        Commands::Chromosome { ncbi_id, view } => run_view(&config, ViewKind::Chromosome, ncbi_id, view).await,
        Commands::Config { example, out } => commands::config::execute(&config, example, out),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose, cli.quiet)?;

    if let Err(err) = run(cli).await {
        print_error_and_exit(&err);
    }

    Ok(())
}
