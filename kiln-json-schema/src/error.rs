/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔═══════════════════════════════════════════════════════════════════════╗
║                                                                       ║
║                              SchemaError                               ║
║                              ¯¯¯¯¯¯¯¯¯¯¯¯                              ║
╚═══════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

use snafu::Snafu;

/// Everything that can go wrong while walking a schema document and
/// building its side-indexes (`ids`, `anchors`, `dynamic_anchors`).
/// Validation failures are never reported through this type — those are
/// ordinary [`crate::output::OutputUnit`] data, never an `Err`.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub), context(suffix(Ctx)))]
pub enum SchemaError {
    #[snafu(display("{base_uri}{pointer}: duplicate $id"))]
    DuplicateId { base_uri: String, pointer: String },

    #[snafu(display("{base_uri}{pointer}: duplicate anchor {name:?}"))]
    DuplicateAnchor {
        base_uri: String,
        pointer: String,
        name: String,
    },

    #[snafu(display("{base_uri}{pointer}: malformed anchor name {name:?}"))]
    MalformedAnchor {
        base_uri: String,
        pointer: String,
        name: String,
    },

    #[snafu(display("{base_uri}{pointer}: $id may not carry a non-empty fragment"))]
    IdHasFragment { base_uri: String, pointer: String },

    #[snafu(display("{base_uri}{pointer}: unsupported $schema dialect {dialect:?}"))]
    UnsupportedDialect {
        base_uri: String,
        pointer: String,
        dialect: String,
    },

    #[snafu(display("{base_uri}{pointer}: unsupported keyword {keyword:?}"))]
    UnsupportedKeyword {
        base_uri: String,
        pointer: String,
        keyword: String,
    },

    #[snafu(display("{base_uri}{pointer}: invalid regular expression: {source}"))]
    InvalidPattern {
        base_uri: String,
        pointer: String,
        source: fancy_regex::Error,
    },

    #[snafu(display("{base_uri}{pointer}: {message}"))]
    Malformed {
        base_uri: String,
        pointer: String,
        message: String,
    },

    #[snafu(display("could not parse URI {input:?}: {source}"))]
    UriParse {
        input: String,
        source: kiln_uri::Error,
    },

    /// Raised during evaluation (never loading) when a `$ref`/`$dynamicRef`
    /// cannot be resolved and the invalid-reference callback either is
    /// absent or did not rescue it.
    #[snafu(display("{base_uri}{pointer}: unresolved reference {reference:?}"))]
    UnresolvedRef {
        base_uri: String,
        pointer: String,
        reference: String,
    },
}

impl SchemaError {
    /// The absolute base URI active when this error was raised.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        match self {
            Self::DuplicateId { base_uri, .. }
            | Self::DuplicateAnchor { base_uri, .. }
            | Self::MalformedAnchor { base_uri, .. }
            | Self::IdHasFragment { base_uri, .. }
            | Self::UnsupportedDialect { base_uri, .. }
            | Self::UnsupportedKeyword { base_uri, .. }
            | Self::InvalidPattern { base_uri, .. }
            | Self::Malformed { base_uri, .. }
            | Self::UnresolvedRef { base_uri, .. } => base_uri,
            Self::UriParse { .. } => "",
        }
    }

    /// The schema pointer (relative to `base_uri`) active when this error
    /// was raised, or empty for errors not tied to a location.
    #[must_use]
    pub fn pointer(&self) -> &str {
        match self {
            Self::DuplicateId { pointer, .. }
            | Self::DuplicateAnchor { pointer, .. }
            | Self::MalformedAnchor { pointer, .. }
            | Self::IdHasFragment { pointer, .. }
            | Self::UnsupportedDialect { pointer, .. }
            | Self::UnsupportedKeyword { pointer, .. }
            | Self::InvalidPattern { pointer, .. }
            | Self::Malformed { pointer, .. }
            | Self::UnresolvedRef { pointer, .. } => pointer,
            Self::UriParse { .. } => "",
        }
    }

    /// A human-readable description, independent of `base_uri`/`pointer`.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}
