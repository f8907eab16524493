//! qcompare command-line interface.
//!
//! The `qcompare` binary is a thin entry point over this library: argument
//! parsing lives in [`cli`], configuration in [`config`], log setup in
//! [`logging`] and one module per subcommand in [`commands`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
