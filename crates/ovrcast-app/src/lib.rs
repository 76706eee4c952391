// Command-line front end: argument parsing, command dispatch and output
// rendering. Exposed as a library so integration tests can drive commands
// without spawning the binary.

pub mod cli;
pub mod commands;
pub mod render;
