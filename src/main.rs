use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rox::ast_printer::AstPrinter;
use rox::error::{LoxError, StderrReporter};
use rox::interpreter::Interpreter;
use rox::parser::Parser;
use rox::scanner::{self, Scanner};
use rox::{Lox, Status};

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to a file
    #[arg(long, global = true)]
    log: bool,

    /// Log file written when --log is given
    #[arg(long, global = true, default_value = "app.log")]
    log_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize { filename: PathBuf },

    /// Parses a file as a Lox program and prints its AST
    Parse {
        filename: PathBuf,

        /// Print the AST as JSON instead of prefix notation
        #[arg(long)]
        json: bool,
    },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs a file as a Lox program, or starts a REPL when no file is given
    Run { filename: Option<PathBuf> },
}

/// Reads the contents of a file as UTF‑8 text.
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    let text = String::from_utf8(buf)
        .map_err(LoxError::from)
        .context(format!("File {:?} is not valid UTF-8", filename))?;

    Ok(text)
}

fn init_logger(path: &Path) -> Result<()> {
    let log_file = File::create(path).context(format!("Failed to create {:?}", path))?;

    // `[module:line] - message`, level from RUST_LOG or debug.
    Builder::new()
        .format(|buf, record| {
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("rox::").unwrap_or(module);
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to {:?}", path);
    Ok(())
}

/// `sysexits` code for a malformed command line.
const EX_USAGE: i32 = 64;

/// Parses the command line; `--help`/`--version` exit 0, usage errors 64.
fn parse_args() -> Result<Cli> {
    match Cli::try_parse() {
        Ok(cli) => Ok(cli),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            std::process::exit(0);
        }
        Err(e) => {
            e.print()?;
            std::process::exit(EX_USAGE);
        }
    }
}

fn exit_with(status: Status) -> ! {
    debug!("Exiting with status {:?}", status);
    std::process::exit(status.exit_code());
}

fn tokenize(filename: &Path) -> Result<()> {
    let source = read_file(filename)?;
    let mut tokenized = true;

    for token in Scanner::new(&source) {
        match token {
            Ok(token) => println!("{}", token),
            Err(e) => {
                tokenized = false;
                eprintln!("{}", e);
            }
        }
    }

    if !tokenized {
        exit_with(Status::CompileError);
    }

    Ok(())
}

fn parse(filename: &Path, json: bool) -> Result<()> {
    let source = read_file(filename)?;
    let mut reporter = StderrReporter;

    let scanned = scanner::scan_tokens(&source, &mut reporter);
    let parsed = Parser::new(scanned.tokens).parse(&mut reporter);

    if scanned.errors > 0 || !parsed.is_ok() {
        exit_with(Status::CompileError);
    }

    if json {
        let rendered = serde_json::to_string_pretty(&parsed.statements)
            .context("Failed to serialize AST")?;
        println!("{}", rendered);
    } else {
        for stmt in &parsed.statements {
            println!("{}", AstPrinter::print_stmt(stmt));
        }
    }

    Ok(())
}

fn evaluate(filename: &Path) -> Result<()> {
    let source = read_file(filename)?;
    let mut reporter = StderrReporter;

    let scanned = scanner::scan_tokens(&source, &mut reporter);
    let expr = Parser::new(scanned.tokens).parse_expression(&mut reporter);

    let Some(expr) = expr.filter(|_| scanned.errors == 0) else {
        exit_with(Status::CompileError);
    };

    let mut interpreter = Interpreter::new();
    match interpreter.evaluate(&expr) {
        Ok(value) => println!("{}", value),
        Err(LoxError::Runtime(e)) => {
            eprintln!("{}", e);
            exit_with(Status::RuntimeError);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn run_file(filename: &Path) -> Result<()> {
    let source = read_file(filename)?;
    let mut lox = Lox::new();

    let status = lox
        .run(&source, &mut StderrReporter)
        .context("Failed to write program output")?;

    info!("Program finished: {:?}", status);

    if status != Status::Ok {
        exit_with(status);
    }

    Ok(())
}

/// Reads one line at a time; errors are reported and the session goes on
/// with its globals intact.
fn run_prompt() -> Result<()> {
    let mut lox = Lox::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        let status = lox.run(&line, &mut StderrReporter)?;
        debug!("REPL line finished: {:?}", status);
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = parse_args()?;

    if args.log {
        init_logger(&args.log_file)?;
    } else {
        // Minimal logger so `log` calls have a sink.
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename } => tokenize(&filename),
        Commands::Parse { filename, json } => parse(&filename, json),
        Commands::Evaluate { filename } => evaluate(&filename),
        Commands::Run {
            filename: Some(filename),
        } => run_file(&filename),
        Commands::Run { filename: None } => run_prompt(),
    }
}
