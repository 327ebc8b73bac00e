//! Subcommand dispatch for the `kiln` binary.

pub mod cmp;
pub mod get;
pub mod members;
pub mod merge;
pub mod patch;
pub mod size;
pub mod test_cmd;
pub mod type_cmd;
pub mod verify;
pub mod view;
