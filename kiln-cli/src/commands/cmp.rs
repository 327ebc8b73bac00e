//! `kiln cmp`: semantic equality of two JSON documents.

use std::process::ExitCode;

use clap::Args;

use crate::args::ParseOpts;
use crate::io::load_document;

#[derive(Args, Debug)]
pub struct CmpArgs {
    file1: String,
    file2: String,
    /// Don't print "equal"/"not equal"; only the exit code reports the
    /// result.
    #[arg(short = 'q', long)]
    quiet: bool,
    #[command(flatten)]
    parse: ParseOpts,
}

pub fn run(args: CmpArgs) -> ExitCode {
    let options = args.parse.to_options();
    let Some(a) = load_document(Some(&args.file1), options) else {
        return ExitCode::FAILURE;
    };
    let Some(b) = load_document(Some(&args.file2), options) else {
        return ExitCode::FAILURE;
    };

    let equal = a == b;
    if !args.quiet {
        println!("{}", if equal { "equal" } else { "not equal" });
    }
    if equal {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
