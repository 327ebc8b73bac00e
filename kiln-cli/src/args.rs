//! Argument fragments shared by several subcommands: parsing mode,
//! container size limits, and output formatting.

use clap::Args;
use kiln_core::format::Format;
use kiln_core::parser::Options;
use kiln_core::value::Kind;

#[derive(Args, Debug, Clone)]
pub struct ParseOpts {
    /// Parse the JSON document in strict mode (reject the relaxed-JSON
    /// extensions this crate otherwise accepts by default).
    #[arg(short = 's', long)]
    pub strict: bool,
    /// Parse the JSON document in relaxed mode. This is the default; the
    /// flag exists only to override a `--strict` set earlier on the command
    /// line.
    #[arg(short = 'r', long)]
    pub relaxed: bool,
    /// Don't allow objects with duplicate member names.
    #[arg(short = 'n', long = "no-duplicates")]
    pub no_duplicates: bool,
    /// Maximum nesting depth. 0 means unbounded.
    #[arg(long = "max-depth", default_value_t = 0)]
    pub max_depth: usize,
    /// Maximum number of elements in a single JSON array. 0 means unbounded.
    #[arg(long = "max-asize", default_value_t = 0)]
    pub max_asize: usize,
    /// Maximum number of members in a single JSON object. 0 means unbounded.
    #[arg(long = "max-osize", default_value_t = 0)]
    pub max_osize: usize,
}

impl ParseOpts {
    pub fn to_options(&self) -> Options {
        Options {
            strict: self.strict && !self.relaxed,
            allow_duplicates: !self.no_duplicates,
            max_depth: self.max_depth,
            max_array_size: self.max_asize,
            max_object_size: self.max_osize,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct FormatOpts {
    /// Print any resulting JSON output without whitespace.
    #[arg(short = 'c', long)]
    pub compact: bool,
    /// Print object members sorted by name.
    #[arg(long)]
    pub sort: bool,
    /// Escape forward slashes in string output as `\/`.
    #[arg(short = 'e', long = "escape-slash")]
    pub escape_slash: bool,
    /// Keep array items on one line even when pretty-printing.
    #[arg(short = 'a', long = "array-lines")]
    pub array_lines: bool,
    /// Print resulting JSON in color.
    #[arg(short = 'o', long)]
    pub color: bool,
}

impl FormatOpts {
    pub fn to_format(&self) -> Format {
        let mut format = if self.compact { Format::COMPACT } else { Format::PRETTY };
        if self.sort {
            format |= Format::SORTED;
        }
        if self.escape_slash {
            format |= Format::ESCAPE_SLASH;
        }
        if self.array_lines {
            format |= Format::COMPACT_ARRAY;
        }
        if self.color {
            format |= Format::COLOR;
        }
        format
    }
}

/// Parses one of the six JSON type names `--type=TYPE` accepts.
/// `invalid` is deliberately not a valid spelling here — it names the
/// sentinel, not a wire type.
pub fn parse_kind(s: &str) -> Option<Kind> {
    match s {
        "null" => Some(Kind::Null),
        "boolean" => Some(Kind::Boolean),
        "number" => Some(Kind::Number),
        "string" => Some(Kind::String),
        "array" => Some(Kind::Array),
        "object" => Some(Kind::Object),
        _ => None,
    }
}
