//! Version resolution and installation layer
//!
//! This module turns a requested version expression ("latest", "~>1.6",
//! "1.7.0", ...) into a concrete installed version of a tool.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Predicate  │────▶│   Manager   │────▶│  Installer  │
//! │  (parse)    │     │  (detect)   │     │ (download)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                        │       │               │
//!                        ▼       ▼               ▼
//!               ┌───────────┐ ┌────────────┐ ┌─────────────┐
//!               │ Inventory │ │ Retriever  │ │   Archive   │
//!               │  (local)  │ │  (remote)  │ │   (unzip)   │
//!               └───────────┘ └────────────┘ └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`manager`]: `detect`/`install`/`use`/`resolve` orchestration
//! - [`predicate`]: requested expression to predicate plus search direction
//! - [`constraint`]: comparator grammar (`>=`, `~>`, `^`, wildcards, ...)
//! - [`semver`]: normalization, total order and directional iteration
//! - [`inventory`]: installed versions under the install root
//! - [`installer`]: idempotent install and uninstall of exact versions
//! - [`retriever`]: release source trait
//! - [`retrievers`]: GitHub and HashiCorp release sources
//! - [`archive`]: zip extraction
//! - [`lock`]: install root lock
//! - [`error`]: error types

pub mod archive;
pub mod constraint;
pub mod error;
pub mod installer;
pub mod inventory;
pub mod lock;
pub mod manager;
pub mod predicate;
pub mod retriever;
pub mod retrievers;
pub mod semver;

pub use error::ManagerError;
pub use manager::VersionManager;
pub use retriever::ReleaseInfoRetriever;
