//! Portly rewrites the URLs an application emits so that, behind a
//! reverse proxy or under a dynamically assigned hostname, it presents
//! the proxy's external host, scheme and base path instead of the values
//! baked into its own configuration.
//!
//! # Architecture
//!
//! - [`context`] -- Per-request forwarding facts derived once from the
//!   inbound headers: external host, upstream TLS, path prefix.
//! - [`rewrite`] -- URL decomposition and rewriting, including stored
//!   option values and the upload directory description.
//! - [`hooks`] -- Stable hook identifiers and the all-or-nothing
//!   enable/disable registry.
//! - [`admin`] -- The settings screen window that suspends rewriting
//!   while canonical values are edited.
//! - [`bootstrap`] -- Cookie paths and request path normalization enabled
//!   by the early bootstrap script.
//! - [`engine`] -- The request-scoped [`Interceptor`](engine::Interceptor)
//!   tying the above together.
//! - [`middleware`] -- Axum middleware deriving the context per request.
//! - [`api`] / [`health`] -- HTTP handlers of the rewrite service.
//! - [`server`] -- Axum server setup, shared state, graceful shutdown.
//! - [`cli`] / [`cmd`] -- Command-line parsing and subcommands.
//! - [`config`] -- Configuration model, loading, and validation.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty output.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `file-backends` | All file format backends |
//! | `full` | All features |

// Binary crate; public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod admin;
pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod health;
pub mod hooks;
pub mod logging;
pub mod middleware;
pub mod rewrite;
pub mod server;
