use std::{fs, process, str::FromStr};

use boolit::{DEFAULT_MAX_DEPTH, Error, Expression, Lexer, ParseError};
use clap::{Parser, Subcommand};
use log::{LevelFilter, debug, info};
use miette::{IntoDiagnostic, WrapErr};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// How many groups and negations may be nested
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print every token as `KIND lexeme index`
    Tokenize(Input),
    /// Print the syntax tree as an s-expression
    Parse(Input),
    /// Print the value of the expression
    Evaluate(Input),
}

#[derive(Debug, clap::Args)]
struct Input {
    /// The expression itself, or a path to it with `--file`
    expression: String,

    /// Read the expression from the file named by EXPRESSION
    #[arg(short, long)]
    file: bool,
}

impl Input {
    fn read(&self) -> miette::Result<String> {
        if !self.file {
            return Ok(self.expression.clone());
        }
        fs::read_to_string(&self.expression)
            .into_diagnostic()
            .wrap_err_with(|| format!("reading `{}` failed", self.expression))
    }
}

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    debug!(args:?; "Parsed arguments");

    if let Err(e) = run(&args) {
        eprintln!("{e:?}");

        // malformed input, as opposed to an unreadable file
        let malformed = e.downcast_ref::<ParseError>().is_some()
            || e.downcast_ref::<Error>().is_some();
        process::exit(if malformed { 65 } else { 1 });
    }
}

fn run(args: &Args) -> miette::Result<()> {
    match &args.command {
        Commands::Tokenize(input) => {
            let source = input.read()?;
            for token in Lexer::new(&source) {
                println!("{}", token?);
            }
            println!("EOF");
        }
        Commands::Parse(input) => {
            let source = input.read()?;
            let ast = boolit::Parser::new(&source)
                .with_max_depth(args.max_depth)
                .parse()?;
            println!("{ast}");
        }
        Commands::Evaluate(input) => {
            let expression = Expression::new(input.read()?)?.with_max_depth(args.max_depth);
            let value = expression.evaluate()?;
            info!(result = value; "Evaluated expression");
            println!("{value}");
        }
    }
    Ok(())
}
