use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{Instrument, Mode};

#[derive(Debug, Parser)]
#[command(
    name = "kira-smacn",
    version,
    about = "SMN1/SMN2 copy-number calling for calibrated qPCR plates"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Run(RunArgs),
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct LayoutArgs {
    #[arg(long, help = "No-template control well (e.g. H12)")]
    pub ntc: String,

    #[arg(long, help = "1-copy calibrator well")]
    pub ref1: String,

    #[arg(long, help = "2-copy calibrator well")]
    pub ref2: String,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long, num_args = 1.., required = true, help = "Plate export (.tsv/.csv, optionally .gz; repeatable)")]
    pub input: Vec<PathBuf>,

    #[arg(long)]
    pub out: PathBuf,

    #[command(flatten)]
    pub layout: LayoutArgs,

    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    #[arg(long, value_enum)]
    pub instrument: Option<InstrumentArg>,

    #[arg(long, help = "Analysis config JSON; flags override its fields")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub run_label: Option<String>,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub tsv: bool,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long, help = "Plate export (.tsv/.csv, optionally .gz)")]
    pub input: PathBuf,

    #[command(flatten)]
    pub layout: LayoutArgs,

    #[arg(long, value_enum)]
    pub instrument: Option<InstrumentArg>,

    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Relaxed,
    Restricted,
    Corrected,
    Custom,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Relaxed => Mode::Relaxed,
            ModeArg::Restricted => Mode::Restricted,
            ModeArg::Corrected => Mode::Corrected,
            ModeArg::Custom => Mode::Custom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InstrumentArg {
    Qs3,
    Tower,
    Z480,
}

impl From<InstrumentArg> for Instrument {
    fn from(arg: InstrumentArg) -> Self {
        match arg {
            InstrumentArg::Qs3 => Instrument::Qs3,
            InstrumentArg::Tower => Instrument::Tower,
            InstrumentArg::Z480 => Instrument::Z480,
        }
    }
}
