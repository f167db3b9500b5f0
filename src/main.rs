use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use kira_smacn::batch::{self, BatchSettings};
use kira_smacn::cli::{Cli, Commands, InstrumentArg, LayoutArgs, ModeArg};
use kira_smacn::config::AnalysisConfig;
use kira_smacn::ctx::Ctx;
use kira_smacn::io;
use kira_smacn::model::PlateLayout;
use kira_smacn::pipeline::Pipeline;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let config = load_config(
                args.config.as_deref(),
                args.mode,
                args.instrument,
                args.run_label,
            )?;
            let layout = layout_from(&args.layout);

            if args.input.len() == 1 {
                let mut ctx = Ctx::new(
                    args.input.into_iter().next(),
                    args.out,
                    layout,
                    config,
                    args.json,
                    args.tsv,
                );
                Pipeline::standard().run(&mut ctx)?;
                print_summary(&ctx)?;
            } else {
                let settings = BatchSettings {
                    out_dir: args.out,
                    layout,
                    config,
                    write_json: args.json,
                    write_tsv: args.tsv,
                    threads: args.threads,
                };
                let runs = batch::run_batch(&args.input, &settings)?;
                for ctx in &runs {
                    print_summary(ctx)?;
                }
            }
        }
        Commands::Validate(args) => {
            let config = load_config(args.config.as_deref(), None, args.instrument, None)?;
            let mut ctx = Ctx::new(
                Some(args.input),
                PathBuf::from("."),
                layout_from(&args.layout),
                config,
                false,
                false,
            );
            Pipeline::validate().run(&mut ctx)?;
            print_validate_summary(&ctx)?;
        }
    }

    Ok(())
}

fn load_config(
    path: Option<&Path>,
    mode: Option<ModeArg>,
    instrument: Option<InstrumentArg>,
    run_label: Option<String>,
) -> Result<AnalysisConfig> {
    let mut config = match path {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(mode) = mode {
        config.mode = mode.into();
    }
    if let Some(instrument) = instrument {
        config.instrument = Some(instrument.into());
    }
    if run_label.is_some() {
        config.run_label = run_label;
    }
    Ok(config)
}

fn layout_from(args: &LayoutArgs) -> PlateLayout {
    PlateLayout::new(&args.ntc, &args.ref1, &args.ref2)
}

fn print_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::summary::format_summary(ctx)?;
    print!("{}", summary);
    print_warnings(ctx);
    Ok(())
}

fn print_validate_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::summary::format_qc(ctx)?;
    print!("{}", summary);
    print_warnings(ctx);
    Ok(())
}

fn print_warnings(ctx: &Ctx) {
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
}
