use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use jql_filter::driver;
use jql_filter::{ComparerOptions, Context, EvalOptions, JqlError, Query};
use tracing::Level;

/// Find JSON files matching a prefix-notation query.
///
/// Example: jql ./people -and -eq .First Jon -eq .Last Snow
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// File or directory to search
    root: PathBuf,

    /// Query tokens, e.g. `-eq .name Jon`. Options go before the root.
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true, trailing_var_arg = true)]
    tokens: Vec<String>,

    /// Descend into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Compare strings (and match regexes) ignoring case
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Compare every operand as a string
    #[arg(short = 's', long)]
    force_string: bool,

    /// Resolve property paths found inside fanned-out results
    #[arg(long)]
    expand_paths: bool,

    /// Print the parsed query as JSON and exit
    #[arg(long)]
    explain: bool,

    /// Print the matching files as a JSON array
    #[arg(long)]
    json: bool,

    /// More logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    // Parse CLI arguments.
    let args = Args::parse();
    init_logging(&args);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            match e {
                JqlError::Parse(_) | JqlError::NonBooleanRoot { .. } => ExitCode::from(2),
                _ => ExitCode::from(1),
            }
        }
    }
}

fn init_logging(args: &Args) {
    let level = if args.quiet {
        Level::ERROR
    } else {
        match args.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), JqlError> {
    // Pick the comparison policy before anything is evaluated.
    let ctx = Context::new(
        ComparerOptions {
            case_insensitive: args.ignore_case,
            force_string: args.force_string,
        },
        EvalOptions {
            expand_nested_paths: args.expand_paths,
        },
    );
    let query = Query::compile(args.tokens.iter().cloned(), ctx)?;

    if args.explain {
        println!("{}", driver::to_pretty_json(query.tree())?);
        return Ok(());
    }

    let files = driver::discover(&args.root, args.recursive)?;
    let report = driver::run(&query, &files)?;

    if args.json {
        println!("{}", driver::to_pretty_json(&report.matched)?);
        return Ok(());
    }

    println!("Files matching search criteria...");
    for path in &report.matched {
        println!("{}", path.display());
    }
    println!("({} files match)", report.matched.len());
    Ok(())
}
