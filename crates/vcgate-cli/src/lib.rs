//! # vcgate-cli: Scenario Runner and Token Inspector
//!
//! Provides the `vcgate` command-line interface.
//!
//! ## Subcommands
//!
//! - `vcgate scenario --shape linked|inline [--role VALUE[@LANG]] [--config FILE]`
//!   runs the university / student / employer flow and exits 0 when access
//!   is granted, 2 when it is denied.
//! - `vcgate inspect <TOKEN>` prints a token's header and claims unverified.
//!
//! Set `-v` (info) or `-vv` (debug) to see the library's structured logs,
//! including the presentation definition and verified presentation dumps.
//! `DEBUG=1` in the environment is the same as `-vv`.

pub mod config;
pub mod entity;
pub mod inspect;
pub mod narrate;
pub mod scenario;
