// Shared configuration and defensive parsing used by every ovrcast crate.

pub mod config;
pub mod parse;
