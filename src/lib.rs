//! # ISI Create Library
//!
//! Scaffolding pipeline behind the `isi-create` command-line tool. Given a
//! project name and a few answers, it materializes a ready-to-run
//! ISI.INVOICE frontend project from the shared template repository.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::{Path, PathBuf};
//! use isi_create::config::{EnvParams, PackageManager, ProjectRequest};
//! use isi_create::rewrite::{render_env, EnvProfile};
//!
//! let request = ProjectRequest::new(
//!     "acme-invoice",
//!     PackageManager::Pnpm,
//!     "",
//!     EnvParams::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     request.destination(Path::new("/work")),
//!     PathBuf::from("/work/acme-invoice")
//! );
//! assert_eq!(request.package_manager().dev_command(), "pnpm dev");
//!
//! // Env files are a pure function of the answers.
//! let env = render_env(EnvProfile::Local, request.params());
//! assert_eq!(env, render_env(EnvProfile::Local, request.params()));
//! ```
//!
//! ## Pipeline
//!
//! [`phases::orchestrator::Scaffolder`] runs the stages strictly in order:
//!
//! 1.  **Precondition**: the destination must not exist.
//! 2.  **VCS bootstrap**: `git init` and wire the `origin` remote
//!     ([`phases::bootstrap`]).
//! 3.  **Template acquisition**: shallow-clone the template into a scratch
//!     directory, copy it without overwriting, then extract the overlay
//!     archive on top ([`phases::acquisition`], [`filesystem`], [`archive`]).
//! 4.  **File rewrite**: generate env files and customize `index.html` and
//!     the layout component ([`phases::customize`], [`rewrite`]).
//! 5.  **Cleanup**: drop template docs and write a project README
//!     ([`phases::cleanup`]).
//!
//! Fatal problems surface as [`error::Error`]; recoverable ones are collected
//! as [`phases::Warning`] values in the returned [`phases::ScaffoldReport`].
//! Installing dependencies and starting the dev server afterwards is the
//! job of [`handoff`].

pub mod archive;
pub mod config;
pub mod defaults;
pub mod error;
pub mod filesystem;
pub mod git;
pub mod handoff;
pub mod output;
pub mod phases;
pub mod repository;
pub mod rewrite;
