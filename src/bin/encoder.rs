use std::io;
use std::io::BufRead;
use std::io::IsTerminal;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use chain_hash::cipher::Encoding;
use clap::Parser;

/// Encodes one line of standard input with a character substitution table.
#[derive(Parser, Debug)]
#[command(name = "Encoder", bin_name = "Encoder", version)]
struct Args {
    /// File of `source destination` character pairs, one pair per line.
    #[arg(value_name = "encoding file")]
    encoding_file: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let encoding = match Encoding::from_path(&args.encoding_file) {
        Ok(encoding) => encoding,
        Err(err) => {
            eprintln!("Could not create the encoding mapping.");
            eprintln!("{}: {err}", args.encoding_file.display());
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    if interactive {
        print!("Enter some message to decode: ");
        if io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }
    }

    let mut input = String::new();
    if let Err(err) = stdin.lock().read_line(&mut input) {
        eprintln!("Could not read the input: {err}");
        return ExitCode::FAILURE;
    }
    let input = input.trim_end_matches(['\n', '\r']);

    if input.is_empty() {
        eprintln!("You must enter an input to encode.");
        return ExitCode::FAILURE;
    }

    match encoding.encode(input) {
        Ok(encoded) => {
            if interactive {
                println!("The encoded message is: {encoded}");
            } else {
                println!("{encoded}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
