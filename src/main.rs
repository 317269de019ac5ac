use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser as ClapParser;

use lox::interpreter::Interpreter;
use lox::parser::Parser;
use lox::resolver::Resolver;
use lox::scanner::Scanner;

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a Lox script; omit to start the interactive prompt
    script: Option<PathBuf>,
}

/// How a single run failed; decides the process exit code.
enum Failure {
    Compile,
    Runtime,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Cli = match Cli::try_parse() {
        Ok(cli) => cli,

        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }

        Err(_) => {
            eprintln!("Usage: lox [script]");
            std::process::exit(64);
        }
    };

    match args.script {
        Some(path) => run_file(&path),

        None => run_prompt(),
    }
}

fn run_file(path: &PathBuf) -> anyhow::Result<()> {
    let mut buf: Vec<u8> = Vec::new();
    let mut reader: BufReader<File> = BufReader::new(File::open(path)?);
    reader.read_to_end(&mut buf)?;

    // The scanner works on raw bytes but requires valid UTF-8.
    let source: String = String::from_utf8(buf)?;

    let mut stdout = std::io::stdout();
    let mut interpreter: Interpreter = Interpreter::new(&mut stdout);

    match run(source.as_bytes(), &mut interpreter) {
        Ok(()) => Ok(()),

        Err(Failure::Compile) => std::process::exit(64),

        Err(Failure::Runtime) => std::process::exit(70),
    }
}

fn run_prompt() -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    let mut interpreter: Interpreter = Interpreter::new(&mut stdout);

    eprint!("> ");

    for line in std::io::stdin().lock().lines() {
        let line: String = line?;

        // Diagnostics were already printed; the prompt keeps going.
        let _ = run(line.as_bytes(), &mut interpreter);

        eprint!("> ");
    }

    Ok(())
}

/// Drive the full pipeline over one source buffer.  Any scan/parse/resolve
/// error blocks the later stages.
fn run(source: &[u8], interpreter: &mut Interpreter) -> Result<(), Failure> {
    let scanner: Scanner = Scanner::new(source);

    let (statements, errors) = Parser::new(scanner).parse();

    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{}", e);
        }

        return Err(Failure::Compile);
    }

    let resolve_errors = Resolver::new(interpreter).resolve(&statements);

    if !resolve_errors.is_empty() {
        for e in &resolve_errors {
            eprintln!("{}", e);
        }

        return Err(Failure::Compile);
    }

    if let Err(e) = interpreter.interpret(&statements) {
        eprintln!("{}", e);

        return Err(Failure::Runtime);
    }

    Ok(())
}
