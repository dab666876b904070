//! Command-line interface for the confmerge binary.
//!
//! The CLI merges monitoring target configuration files and either writes
//! the merged tree as JSON or prints a per-target summary.

use std::{
    io::{self, Write},
    path::PathBuf,
    process,
};

use clap::{ArgAction, Args, Parser, Subcommand};
use confmerge::{Error, MergedDocument, load_merged};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Command line interface for merging monitoring target configurations.
#[derive(Debug, Parser,)]
#[command(name = "confmerge", version, about = "Merge monitoring target configurations")]
/// Top-level CLI options parsed from user input.
struct Cli
{
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Merge configuration files and write the result as JSON.
    Merge(MergeArgs,),
    /// Merge configuration files and print one summary line per target.
    Inspect(InspectArgs,),
}

#[derive(Debug, Args,)]
/// Arguments accepted by the `merge` subcommand.
struct MergeArgs
{
    /// Configuration file or directory; may be repeated.
    #[arg(long = "config", value_name = "PATH", required = true)]
    config: Vec<PathBuf,>,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

#[derive(Debug, Args,)]
/// Arguments accepted by the `inspect` subcommand.
struct InspectArgs
{
    /// Configuration file or directory; may be repeated.
    #[arg(long = "config", value_name = "PATH", required = true)]
    config: Vec<PathBuf,>,
}

/// Entry point that reports errors and sets the appropriate exit status.
fn main()
{
    init_tracing();

    if let Err(error,) = run() {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

/// Logs go to stderr so that stdout only carries the merged document.
fn init_tracing()
{
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),),)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr,),)
        .init();
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates errors originating from configuration loading and output.
fn run() -> Result<(), Error,>
{
    let cli = Cli::parse();

    match cli.command {
        Command::Merge(args,) => run_merge(args,),
        Command::Inspect(args,) => run_inspect(args,),
    }
}

fn run_merge(args: MergeArgs,) -> Result<(), Error,>
{
    let document = load_merged(&args.config,)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_merged_document(&mut handle, &document, args.pretty,)?;
    writeln!(handle)?;

    Ok((),)
}

fn write_merged_document<W: Write,>(
    writer: &mut W,
    document: &MergedDocument,
    pretty: bool,
) -> Result<(), Error,>
{
    if pretty {
        serde_json::to_writer_pretty(writer, document,)?;
    } else {
        serde_json::to_writer(writer, document,)?;
    }

    Ok((),)
}

fn run_inspect(args: InspectArgs,) -> Result<(), Error,>
{
    let document = load_merged(&args.config,)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_summary(&mut handle, &document,)
}

fn write_summary<W: Write,>(writer: &mut W, document: &MergedDocument,) -> Result<(), Error,>
{
    for target in &document.targets {
        let query_sinks: usize = target.queries().iter().map(|query| query.sinks().len(),).sum();
        writeln!(
            writer,
            "{}: {} queries, {} target sinks, {} query sink references",
            target.endpoint(),
            target.queries().len(),
            target.sinks().len(),
            query_sinks
        )?;
    }
    writeln!(writer, "{} targets, {} distinct sinks", document.targets.len(), document.distinct_sinks)?;

    Ok((),)
}

#[cfg(test)]
mod tests
{
    use std::{fs, io::Cursor, path::Path};

    use clap::Parser;
    use confmerge::{Error, MergedDocument, load_merged};
    use tempfile::tempdir;

    use super::{Cli, Command, write_merged_document, write_summary};

    #[test]
    fn merge_accepts_repeated_config_flags()
    {
        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "merge",
            "--config",
            "a.yaml",
            "--config",
            "conf.d",
            "--pretty",
        ],)
        .expect("failed to parse CLI",);

        match cli.command {
            Command::Merge(args,) => {
                assert_eq!(args.config, [Path::new("a.yaml"), Path::new("conf.d")]);
                assert!(args.pretty);
            }
            other => panic!("unexpected command variant: {other:?}"),
        }
    }

    #[test]
    fn merge_requires_config_flag()
    {
        let result = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "merge",],);
        assert!(result.is_err());
    }

    #[test]
    fn pretty_flag_uses_pretty_writer()
    {
        let document = MergedDocument {
            targets:        Vec::new(),
            distinct_sinks: 0,
        };
        let mut buffer = Cursor::new(Vec::new(),);
        write_merged_document(&mut buffer, &document, true,).expect("failed to serialize",);

        let output = String::from_utf8(buffer.into_inner(),).expect("invalid UTF-8",);
        assert_eq!(output, "{\n  \"targets\": [],\n  \"distinct_sinks\": 0\n}");
    }

    #[test]
    fn compact_writer_is_default()
    {
        let document = MergedDocument {
            targets:        Vec::new(),
            distinct_sinks: 0,
        };
        let mut buffer = Cursor::new(Vec::new(),);
        write_merged_document(&mut buffer, &document, false,).expect("failed to serialize",);

        let output = String::from_utf8(buffer.into_inner(),).expect("invalid UTF-8",);
        assert_eq!(output, "{\"targets\":[],\"distinct_sinks\":0}");
    }

    #[test]
    fn inspect_summarizes_merged_targets()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let first = temp.path().join("first.yaml",);
        let second = temp.path().join("second.yaml",);
        fs::write(
            &first,
            "targets:\n  - host: app-1\n    port: 9999\n    alias: app\n    sinks:\n      - type: stdout\n",
        )
        .expect("failed to write config",);
        fs::write(
            &second,
            "targets:\n  - host: app-1\n    port: 9999\n    alias: app\n    queries:\n      - object: java.lang:type=Memory\n        sinks:\n          - type: stdout\n",
        )
        .expect("failed to write config",);

        let document = load_merged(&[first, second,],).expect("failed to merge",);
        let mut buffer = Cursor::new(Vec::new(),);
        write_summary(&mut buffer, &document,).expect("failed to write summary",);

        let output = String::from_utf8(buffer.into_inner(),).expect("invalid UTF-8",);
        assert_eq!(
            output,
            "app (app-1:9999): 1 queries, 1 target sinks, 1 query sink references\n1 targets, 1 distinct sinks\n"
        );
    }

    #[test]
    fn malformed_config_error_names_the_file()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let broken = temp.path().join("broken.yaml",);
        fs::write(&broken, "targets:\n  - host: [\n",).expect("failed to write config",);

        let error = load_merged(&[temp.path()],).expect_err("expected parse failure",);
        assert!(matches!(error, Error::Parse { .. }));
        assert!(error.to_display_string().contains("broken.yaml"));
    }
}
