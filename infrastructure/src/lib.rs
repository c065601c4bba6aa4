//! UniTok resource declaration graph
//!
//! Declares the UniTok cloud resources as a typed dependency graph and synthesizes a template
//! for an external provisioning engine. Also deploys the static site with its runtime
//! `config.json`.

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod deploy;
pub mod environment;
pub mod error;
pub mod graph;
pub mod resources;
pub mod stack;
pub mod substitution;
pub mod template;

/// The concrete UniTok stack
pub mod unitok;
