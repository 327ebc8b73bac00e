//! `kiln`: a multi-command JSON toolbox over the `kiln-core`,
//! `kiln-json-pointer`, and `kiln-json-schema` libraries, with one `clap`
//! subcommand per operation: viewing, type/size/member inspection, pointer
//! extraction, comparison, merging, patching, and schema validation.

mod args;
mod commands;
mod io;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "kiln", version, about = "View, query, compare, merge, patch, and validate JSON documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a document or the instance at a JSON pointer.
    View(commands::view::ViewArgs),
    /// Print or check a JSON value's type.
    Type(commands::type_cmd::TypeArgs),
    /// Print the element/member count of an array or object.
    Size(commands::size::SizeArgs),
    /// List an object's member names.
    Members(commands::members::MembersArgs),
    /// Extract a value by JSON pointer.
    Get(commands::get::GetArgs),
    /// Compare two documents for semantic equality.
    Cmp(commands::cmp::CmpArgs),
    /// Merge one or more documents into a master document.
    Merge(commands::merge::MergeArgs),
    /// Apply an RFC 6902 JSON Patch document.
    Patch(commands::patch::PatchArgs),
    /// Run an RFC 6902 `test`-only patch document and report pass/fail.
    Test(commands::test_cmd::TestArgs),
    /// Validate an instance against a JSON Schema 2020-12 document.
    Verify(commands::verify::VerifyArgs),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::View(args) => commands::view::run(args),
        Command::Type(args) => commands::type_cmd::run(args),
        Command::Size(args) => commands::size::run(args),
        Command::Members(args) => commands::members::run(args),
        Command::Get(args) => commands::get::run(args),
        Command::Cmp(args) => commands::cmp::run(args),
        Command::Merge(args) => commands::merge::run(args),
        Command::Patch(args) => commands::patch::run(args),
        Command::Test(args) => commands::test_cmd::run(args),
        Command::Verify(args) => commands::verify::run(args),
    }
}
