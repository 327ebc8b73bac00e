//! `kiln test`: run an RFC 6902 patch document consisting only of `test`
//! operations against a document. Unlike `kiln patch`, every operation is
//! attempted regardless of earlier failures, and the command's only output
//! is a per-operation pass/fail report.

use std::process::ExitCode;

use clap::Args;
use kiln_json_pointer::{apply_patch, Outcome};

use crate::args::ParseOpts;
use crate::io::load_document;

#[derive(Args, Debug)]
pub struct TestArgs {
    /// Document the test operations are run against.
    document: String,
    /// Patch document: a JSON array of RFC 6902 `test` operation objects.
    patch: String,
    /// Don't print per-operation results; only the exit code reports the
    /// outcome.
    #[arg(short = 'q', long)]
    quiet: bool,
    #[command(flatten)]
    parse: ParseOpts,
}

pub fn run(args: TestArgs) -> ExitCode {
    let options = args.parse.to_options();
    let Some(document) = load_document(Some(&args.document), options) else {
        return ExitCode::FAILURE;
    };
    let Some(patch) = load_document(Some(&args.patch), options) else {
        return ExitCode::FAILURE;
    };

    let Some(ops) = patch.as_array() else {
        eprintln!("Error: patch document must be a JSON array");
        return ExitCode::FAILURE;
    };

    let mut all_ok = true;
    for (index, op) in ops.iter().enumerate() {
        let single = kiln_core::Value::Array(vec![op.clone()]);
        let (_, report) = apply_patch(&document, &single);
        let outcome = report.outcomes.first().copied().unwrap_or(Outcome::Invalid);
        let ok = outcome == Outcome::Ok;
        all_ok &= ok;
        if !args.quiet {
            println!("test {index}: {}", if ok { "PASS" } else { "FAIL" });
        }
    }

    if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
