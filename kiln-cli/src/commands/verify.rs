//! `kiln verify`: validate an instance against a JSON Schema 2020-12
//! document. `--schema-dir` preloads a directory of schemas under a
//! `http://localhost:1234/...` alias base, so schemas that `$ref` remote
//! documents can be validated offline.

use std::path::Path;
use std::process::ExitCode;

use clap::Args;
use kiln_core::format::to_string;
use kiln_core::parser::{parse, Options};
use kiln_json_schema::{OutputFormat, Schema};

use crate::args::ParseOpts;
use crate::io::load_document;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Schema document.
    schema: String,
    /// Instance document to validate against `schema`.
    instance: String,
    /// Abort evaluation at the first failing keyword instead of collecting
    /// every failure.
    #[arg(short = 'f', long = "fast-fail")]
    fast_fail: bool,
    /// Print the full annotation/error tree instead of just the flattened
    /// failure list.
    #[arg(short = 'v', long)]
    verbose: bool,
    /// Directory mirroring `http://localhost:1234/...`-style remote
    /// references: every `*.json` file under it is registered as a
    /// referenced schema, keyed by that URL plus its path relative to this
    /// directory.
    #[arg(long = "schema-dir")]
    schema_dir: Option<String>,
    #[command(flatten)]
    parse: ParseOpts,
}

const REMOTE_BASE: &str = "http://localhost:1234/";

pub fn run(args: VerifyArgs) -> ExitCode {
    let options = args.parse.to_options();
    let Some(schema_doc) = load_document(Some(&args.schema), options) else {
        return ExitCode::FAILURE;
    };
    let Some(instance) = load_document(Some(&args.instance), options) else {
        return ExitCode::FAILURE;
    };

    let referenced = match &args.schema_dir {
        Some(dir) => match load_schema_dir(Path::new(dir), options) {
            Ok(docs) => docs,
            Err(message) => {
                eprintln!("Error: {message}");
                return ExitCode::FAILURE;
            }
        },
        None => Vec::new(),
    };

    let mut schema = match Schema::new(schema_doc, Vec::new()) {
        Ok(schema) => schema,
        Err(err) => {
            eprintln!("Schema error: {err}");
            return ExitCode::FAILURE;
        }
    };
    for (value, alias) in referenced {
        if let Err(err) = schema.add_referenced(value, Some(alias)) {
            eprintln!("Schema error: {err}");
            return ExitCode::FAILURE;
        }
    }

    let format = if args.verbose {
        OutputFormat::Verbose
    } else {
        OutputFormat::Basic
    };

    match schema.validate_to_value(&instance, args.fast_fail, format) {
        Ok(output) => {
            let valid = output.get("valid").as_bool().unwrap_or(false);
            println!("{}", to_string(&output, kiln_core::format::Format::PRETTY));
            if valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("Schema error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Walks `dir` recursively, parsing every `*.json` file and pairing it with
/// the alias `http://localhost:1234/<path relative to dir>`.
fn load_schema_dir(dir: &Path, options: Options) -> Result<Vec<(kiln_core::Value, String)>, String> {
    let mut out = Vec::new();
    collect_json_files(dir, dir, options, &mut out)?;
    Ok(out)
}

fn collect_json_files(
    root: &Path,
    dir: &Path,
    options: Options,
    out: &mut Vec<(kiln_core::Value, String)>,
) -> Result<(), String> {
    let entries = std::fs::read_dir(dir).map_err(|err| format!("reading directory {dir:?}: {err}"))?;
    for entry in entries {
        let entry = entry.map_err(|err| format!("reading directory {dir:?}: {err}"))?;
        let path = entry.path();
        if path.is_dir() {
            collect_json_files(root, &path, options, out)?;
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let text = std::fs::read_to_string(&path).map_err(|err| format!("reading {path:?}: {err}"))?;
        let value = parse(&text, options).map_err(|err| format!("parsing {path:?}: {err}"))?;
        let relative = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "/");
        let alias = format!("{REMOTE_BASE}{relative}");
        out.push((value, alias));
    }
    Ok(())
}
