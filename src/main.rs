//! CLI tool to check Glim source files and inspect their tokens.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

/// Program checked when `glim check` is given no input.
const SAMPLE: &str = "let fib = n => n <= 1 ? n : fib(n - 1) + fib(n - 2);\nfib(10)";

#[derive(Parser, Debug)]
#[command(name = "glim", version, about = "Check Glim source for syntax errors")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that each input is syntactically valid
    Check(Input),
    /// Print the token stream of each input
    Tokens(Input),
}

#[derive(Args, Debug)]
struct Input {
    /// Source files to read
    files: Vec<PathBuf>,

    /// Use SOURCE as the program text instead of reading files
    #[arg(short, long, value_name = "SOURCE", conflicts_with = "files")]
    eval: Option<String>,
}

impl Input {
    /// Labelled sources; `None` labels inline text.
    fn sources(self) -> Vec<(Option<String>, std::io::Result<String>)> {
        if let Some(text) = self.eval {
            return vec![(None, Ok(text))];
        }
        if self.files.is_empty() {
            return vec![(None, Ok(SAMPLE.to_string()))];
        }
        self.files
            .into_iter()
            .map(|path| {
                let content = fs::read_to_string(&path);
                (Some(path.display().to_string()), content)
            })
            .collect()
    }
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let (input, show_tokens) = match cli.command {
        Command::Check(input) => (input, false),
        Command::Tokens(input) => (input, true),
    };

    let mut had_error = false;
    for (label, content) in input.sources() {
        let prefix = label.map(|l| format!("{l}: ")).unwrap_or_default();
        let content = match content {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{prefix}ERROR: {e}");
                had_error = true;
                continue;
            }
        };

        let result = if show_tokens {
            print_tokens(&prefix, &content)
        } else {
            glim::recognize(&content).map(|diagnostics| {
                if prefix.is_empty() {
                    diagnostics.print();
                } else {
                    for message in &diagnostics {
                        println!("{prefix}{message}");
                    }
                }
            })
        };

        if let Err(e) = result {
            eprintln!("{prefix}ERROR: {}", e.message());
            had_error = true;
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_tokens(prefix: &str, content: &str) -> Result<(), glim::Error> {
    for token in glim::tokenize(content)? {
        // Span's Display ignores width, so pad the rendered string.
        let position = token.span.to_string();
        println!(
            "{prefix}{position:<7} {:<14} '{}'",
            token.kind.name(),
            token.text
        );
    }
    Ok(())
}
