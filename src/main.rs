use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use monkey::{
    parser::ParseErrors,
    tokenizer::{TokenType, Tokenizer},
    tree_walk_interpreter::{Interpreter, RuntimeError, Value},
};

#[derive(Debug, Parser)]
#[command(version, about = "Interpreter for the Monkey language")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn command(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Repl)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start an interactive session (the default)
    Repl,
    /// Evaluate a source file and print its final value
    Run(FileArgs),
    /// Print the token stream of a source file
    Tokens(FileArgs),
    /// Print the parsed program of a source file
    Ast(FileArgs),
}

#[derive(Debug, Args)]
struct FileArgs {
    file: String,
}

#[derive(Debug, thiserror::Error)]
enum InterpretError {
    #[error("could not read source file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseErrors),
    #[error("{0}")]
    Runtime(RuntimeError),
}

fn main() -> ExitCode {
    init_tracing();
    let args = Cli::parse();

    let result = match args.command() {
        Command::Repl => repl_command(),
        Command::Run(args) => run_command(args),
        Command::Tokens(args) => tokens_command(args),
        Command::Ast(args) => ast_command(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logging is opt-in through `RUST_LOG` so it never mixes with REPL output.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn repl_command() -> Result<(), InterpretError> {
    println!("Welcome to the Monkey REPL!");
    println!("EOF to exit. (Ctrl+D on *nix, Ctrl+Z on Windows)");

    monkey::repl::start(std::io::stdin().lock(), std::io::stdout())?;
    Ok(())
}

fn run_command(args: &FileArgs) -> Result<(), InterpretError> {
    tracing::info!(file = %args.file, "running");
    let source = std::fs::read_to_string(&args.file)?;
    let program = monkey::parser::parse(&source).inspect_err(|e| {
        tracing::warn!(file = %args.file, errors = e.0.len(), "parse failed");
    })?;

    match Interpreter::new().interpret(&program) {
        Value::Error(e) => Err(InterpretError::Runtime(e)),
        Value::Null => Ok(()),
        value => {
            println!("{value}");
            Ok(())
        }
    }
}

fn tokens_command(args: &FileArgs) -> Result<(), InterpretError> {
    let source = std::fs::read_to_string(&args.file)?;
    let mut tokenizer = Tokenizer::new(&source);
    loop {
        let token = tokenizer.token();
        println!("{:<10} {}", token.token_type.to_string(), token.lexeme);

        if token.token_type == TokenType::Eof {
            break;
        }
    }

    Ok(())
}

fn ast_command(args: &FileArgs) -> Result<(), InterpretError> {
    let source = std::fs::read_to_string(&args.file)?;
    let program = monkey::parser::parse(&source)?;
    for statement in &program.0 {
        println!("{statement}");
    }
    Ok(())
}
