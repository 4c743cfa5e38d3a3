use anyhow::Result;
use clap::{Parser, error::ErrorKind};
use log::LevelFilter;
use std::{env, io::Write};

use aspx2blazor::{cli, config::Config, convert, mapping, reporter};

fn main() -> Result<()> {
    let raw_args: Vec<String> = env::args().collect();
    let cli = parse_cli(raw_args).unwrap_or_else(|err| err.exit());

    let log_level_filter = cli.verbose.log_level_filter();

    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "{}:\n{}", record.level(), record.args()))
        .filter_level(log_level_filter)
        .target(env_logger::fmt::Target::Stdout)
        .init();

    // Per-file progress lines only at the default level; -q silences them
    // and -v mixes them with debug logs.
    let show_progress = log_level_filter >= LevelFilter::Info;

    match cli.command {
        cli::Command::Mappings => {
            reporter::print_mappings(mapping::controls());
            Ok(())
        }
        cli::Command::Convert(convert_args) => {
            let config = Config::load(convert_args.config.as_deref(), &env::current_dir()?)?;
            let inputs = convert::collect_inputs(&convert_args.paths);
            if inputs.is_empty() {
                println!("No .aspx files found");
                std::process::exit(1);
            }

            let terminal = reporter::TerminalReporter::new(convert_args.no_timing, show_progress);
            let summary = convert::convert_files(&inputs, &config, convert_args.dry_run, &terminal);

            if summary.failed > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn parse_cli(raw_args: Vec<String>) -> Result<cli::Cli, clap::Error> {
    match cli::Cli::try_parse_from(&raw_args) {
        Ok(cli) => Ok(cli),
        Err(err) => {
            if should_default_to_convert(&err, &raw_args) {
                let mut fallback_args = raw_args.clone();
                let insert_at = index_after_global_flags(&fallback_args);
                fallback_args.insert(insert_at, "convert".into());

                cli::Cli::try_parse_from(&fallback_args)
            } else {
                Err(err)
            }
        }
    }
}

fn should_default_to_convert(err: &clap::Error, args: &[String]) -> bool {
    match err.kind() {
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => true,
        ErrorKind::UnknownArgument | ErrorKind::InvalidSubcommand => {
            args.iter().skip(1).any(|arg| !is_global_flag(arg))
        }
        _ => false,
    }
}

fn index_after_global_flags(args: &[String]) -> usize {
    let mut idx = 1;
    while let Some(arg) = args.get(idx) {
        if is_global_flag(arg) {
            idx += 1;
        } else {
            break;
        }
    }
    idx.min(args.len())
}

fn is_global_flag(arg: &str) -> bool {
    matches!(
        arg,
        "-v" | "-vv"
            | "-vvv"
            | "-vvvv"
            | "-q"
            | "-qq"
            | "-qqq"
            | "-qqqq"
            | "--verbose"
            | "--quiet"
            | "-h"
            | "--help"
            | "-V"
            | "--version"
    )
}
