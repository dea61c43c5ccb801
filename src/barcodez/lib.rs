//! # Barcodez Architecture
//!
//! Barcodez generates, stores, searches and exports retail and logistics
//! barcodes (JAN/EAN-13, ITF-14, GS1 DataBar). Like any client of it, the
//! command-line binary is a thin layer over this library.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prompts for destinations, prints       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │  Request
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Resolves config defaults, dispatches requests            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic, returns CmdResult with messages          │
//! └─────────────────────────────────────────────────────────────┘
//!              │                                 │
//!              ▼                                 ▼
//! ┌───────────────────────────┐   ┌───────────────────────────┐
//! │  Record Service           │   │  Export Pipeline          │
//! │  (service.rs + render/)   │   │  (export/)                │
//! └───────────────────────────┘   └───────────────────────────┘
//!              │
//!              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - StorageBackend trait: FsBackend, MemBackend              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Delegates
//!
//! Everything that touches the outside world sits behind a trait, so the
//! core can be tested in memory:
//!
//! - [`render::Renderer`]: value + format token → PNG bytes
//! - [`store::StorageBackend`]: key → JSON document
//! - [`export::DestinationChooser`]: where an export goes, or cancel
//! - [`export::FileWriter`]: writes the export bytes
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits
//! the process. It returns `Result<CmdResult>` and logs through `log`.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade and the [`api::Request`] type
//! - [`commands`]: business logic for each action
//! - [`service`]: record creation, listing and search
//! - [`export`]: PNG, PDF and XLSX export
//! - [`render`]: barcode rendering
//! - [`store`]: storage abstraction and implementations
//! - [`model`]: records, symbologies, sizes
//! - [`index`]: 1-based display indexes and selectors
//! - [`config`]: stored defaults
//! - [`init`]: data directory resolution and wiring
//! - [`error`]: error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod index;
pub mod init;
pub mod model;
pub mod render;
pub mod service;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
