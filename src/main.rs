/*!
Main binary for jpath.
*/

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use colored::Colorize;
use memmap2::Mmap;
use std::io::{self, IsTerminal, Read, Write};
use std::{fs::File, path::PathBuf};

use jpath::{
    Document, InputFormat, commands,
    path::{ContainerPolicy, Evaluator, PathExpression},
    utils::{Report, write_colored_error, write_colored_match},
};

/// Extract values from a JSON (or YAML, TOML, CBOR, MessagePack) document
/// with a dot-separated path expression.
#[derive(Parser)]
#[allow(clippy::struct_excessive_bools)]
#[command(
    name = "jp",
    version,
    about,
    arg_required_else_help = true,
    long_about = None,
    disable_help_subcommand = true
)]
struct Args {
    /// Optional subcommands
    #[command(subcommand)]
    command: Option<Commands>,
    /// Path expression (e.g., ".companies[1:3].name")
    expression: Option<String>,
    #[arg(value_name = "FILE")]
    /// Optional path to input file. If omitted, reads from STDIN
    input: Option<PathBuf>,
    /// Input format. Guessed from the file extension if omitted, else JSON
    #[arg(short, long, value_enum)]
    format: Option<InputFormat>,
    /// Do not pretty-print the JSON output, instead use compact
    #[arg(long, action = ArgAction::SetTrue)]
    compact: bool,
    /// Display count of matches and errors
    #[arg(long, action = ArgAction::SetTrue)]
    count: bool,
    /// Do not display matched JSON values
    #[arg(short, long, action = ArgAction::SetTrue)]
    no_display: bool,
    /// Do not print the location header above each match
    #[arg(long, action = ArgAction::SetTrue)]
    no_path: bool,
    /// Print one JSON object per result instead of colorized values
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "compact")]
    json: bool,
    /// Report an error instead of a match when the path ends on an object or
    /// array
    #[arg(long, action = ArgAction::SetTrue)]
    reject_containers: bool,
    /// Stop after this many results (matches and errors)
    #[arg(short, long, value_name = "N")]
    max_results: Option<usize>,
    #[command(flatten)]
    verbose: Verbosity,
}

/// Available subcommands for `jp`
#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    /// Generate additional documentation and/or completions
    Generate(GenerateCommand),
}

/// Generate shell completions and man page
#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate shell completions for the given shell to stdout.
    Shell { shell: clap_complete::Shell },
    /// Generate a man page for jp to output directory if specified, else
    /// the current directory.
    Man {
        /// The output directory to write the man pages.
        #[clap(short, long)]
        output_dir: Option<PathBuf>,
    },
}

/// Entry point for main binary.
///
/// This decodes the input document and streams the results of the path
/// expression. If no file is given, the input is read from STDIN. Matches are
/// printed to STDOUT and branch errors to STDERR, with formatting determined
/// by the command line arguments.
fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match &args.command {
        Some(Commands::Generate(cmd)) => match cmd {
            GenerateCommand::Shell { shell } => {
                commands::generate::generate_completions(
                    *shell,
                    &mut Args::command(),
                    &mut io::stdout().lock(),
                );
            }
            GenerateCommand::Man { output_dir } => {
                for page in commands::generate::generate_man_pages(
                    &Args::command(),
                    output_dir.clone(),
                )? {
                    println!("Generated: {}", page.display());
                }
            }
        },
        None => run(&args)?,
    }

    Ok(())
}

/// Evaluates the expression of `args` against the input document.
fn run(args: &Args) -> Result<()> {
    let expression = args.expression.as_deref().ok_or_else(|| {
        anyhow::anyhow!("Path expression required unless using subcommand")
    })?;
    let path = PathExpression::parse(expression);

    let format = args
        .format
        .or_else(|| args.input.as_deref().and_then(InputFormat::from_path))
        .unwrap_or_default();

    // Decode the whole input before evaluating anything
    let document = match &args.input {
        Some(file) => {
            let file_handle = File::open(file).with_context(|| {
                format!("Failed to open file {}", file.display())
            })?;
            // SAFETY: the map is only read while decoding and the file is
            // not modified by this process.
            let bytes = unsafe { Mmap::map(&file_handle) }.with_context(|| {
                format!("Failed to read file {}", file.display())
            })?;
            Document::from_slice(&bytes, format)
        }
        None => {
            if io::stdin().is_terminal() {
                // No piped input and no file specified
                let mut cmd = Args::command();
                return Ok(cmd.print_help()?);
            }
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            Document::from_slice(&buffer, format)
        }
    }
    .with_context(|| "Failed to decode input")?;

    let policy = if args.reject_containers {
        ContainerPolicy::Reject
    } else {
        ContainerPolicy::Match
    };
    let evaluator = Evaluator::new().containers(policy);

    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    let (mut matches, mut errors) = (0usize, 0usize);

    // Dropping the stream after `take` abandons the rest of the walk
    let results = document
        .fetch_with(evaluator, &path)
        .take(args.max_results.unwrap_or(usize::MAX));

    for item in results {
        match &item {
            Ok(_) => matches += 1,
            Err(err) => {
                errors += 1;
                log::debug!("branch error: {err:?}");
            }
        }
        if args.no_display {
            continue;
        }
        if args.json {
            serde_json::to_writer(&mut stdout, &Report::from(&item))?;
            writeln!(stdout)?;
            continue;
        }
        match &item {
            Ok(found) => write_colored_match(
                &mut stdout,
                found,
                !args.compact,
                !args.no_path,
            )?,
            Err(err) => write_colored_error(&mut stderr, err)?,
        }
    }

    if args.count {
        writeln!(
            stdout,
            "{} {matches}, {} {errors}",
            "Found matches:".bold(),
            "errors:".bold()
        )?;
    }

    Ok(())
}
