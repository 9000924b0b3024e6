//! Bootstrapper for a personal Vim/Neovim environment.
//!
//! Clones or locates the configuration repository, links it into the home
//! directory, installs optional editor tooling for whatever toolchains the
//! host has, and drives the plugin manager.
//!
//! The public API is organised into four layers:
//!
//! - **[`probe`]** and **[`config`]**: host capabilities and settings
//! - **[`resources`]**: idempotent `check + apply` filesystem primitives
//! - **[`tasks`]**: named install steps wired to resources and commands
//! - **[`commands`]**: the install orchestration run by the binary
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod download;
pub mod editor;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod probe;
pub mod resources;
pub mod tasks;
