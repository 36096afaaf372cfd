use anyhow::Result;
use clap::Parser;
use drroon::common::{initialize_logging, TagScope};
use drroon::config::Options;
use drroon::releases::process_tree;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Add DR scores from foo_dr.txt reports to album folder names and audio file tags.
#[derive(Parser, Debug)]
#[clap(version)]
struct CliArgs {
    /// Root directory to process.
    pub root_dir: PathBuf,

    /// Append " (DR N)" to each album folder name.
    #[clap(long)]
    pub rename_folder: bool,

    /// Which tags to write the DR score to.
    #[clap(long, value_enum)]
    pub tags: Option<TagScope>,

    /// Keep the report file name instead of renaming it after successful processing.
    #[clap(long)]
    pub no_mark_processed: bool,

    /// Path to a TOML configuration file.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Ask for each option on the terminal before processing.
    #[clap(short, long)]
    pub interactive: bool,

    /// Also write logs to drroon.log in the state directory.
    #[clap(long)]
    pub log_file: bool,
}

fn prompt(input: &mut impl BufRead, output: &mut impl Write, question: &str, choices: &[&str], answers: &[&str], default: &str) -> Result<String> {
    writeln!(output, "{question}")?;
    for (i, choice) in choices.iter().enumerate() {
        writeln!(output, "{}. {}", i + 1, choice)?;
    }
    write!(output, "Enter your choice ({}; anything else selects the default): ", answers.join(", "))?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    if answers.contains(&answer) {
        Ok(answer.to_string())
    } else {
        Ok(default.to_string())
    }
}

fn prompt_options(mut options: Options, input: &mut impl BufRead, output: &mut impl Write) -> Result<Options> {
    options.rename_folder = prompt(
        input,
        output,
        "Would you like to add the DR score to the album folder name?",
        &["Yes", "No (default)"],
        &["1", "2"],
        "2",
    )? == "1";

    options.scope = match prompt(
        input,
        output,
        "Would you like to add the DR score to metadata?",
        &[
            "Yes, to both the VERSION and ROONALBUMTAG tags (default)",
            "Yes, to the VERSION tag only",
            "Yes, to the ROONALBUMTAG tag only",
            "No",
        ],
        &["1", "2", "3", "4"],
        "1",
    )?
    .as_str()
    {
        "2" => TagScope::VersionOnly,
        "3" => TagScope::RoonAlbumTagOnly,
        "4" => TagScope::None,
        _ => TagScope::Both,
    };

    options.mark_processed = prompt(
        input,
        output,
        &format!("Would you like to rename {} to {} after successful processing?", options.report_filename, options.processed_filename),
        &["Yes (default)", "No"],
        &["1", "2"],
        "1",
    )? == "1";

    Ok(options)
}

fn run(args: CliArgs) -> Result<bool> {
    let mut options = Options::parse(args.config.as_deref())?;
    if args.rename_folder {
        options.rename_folder = true;
    }
    if let Some(scope) = args.tags {
        options.scope = scope;
    }
    if args.no_mark_processed {
        options.mark_processed = false;
    }

    if !args.root_dir.is_dir() {
        error!("The specified directory '{}' does not exist.", args.root_dir.display());
        return Ok(false);
    }
    let root = args.root_dir.canonicalize()?;

    if args.interactive {
        options = prompt_options(options, &mut io::stdin().lock(), &mut io::stdout())?;
    }

    Ok(process_tree(&root, &options).success())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let _guard = match initialize_logging(args.log_file) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
