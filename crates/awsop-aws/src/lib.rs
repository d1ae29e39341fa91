//! # awsop-aws
//!
//! AWS binding for the `awsop-core` engine: a configured, SigV4-signing
//! client and typed operations for CodePipeline and Amazon Location Places.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────┐     ┌─────────────────────────────┐
//! │ codepipeline / geoplaces │     │ config                      │
//! │  Operation + AwsOperation│     │  file → env → flags layers  │
//! └────────────┬─────────────┘     └──────────────┬──────────────┘
//!              │ WireRequest                      │ ClientSettings
//!              ▼                                  ▼
//!      ┌───────────────────────────────────────────────────┐
//!      │ client::AwsClient  (impl Invoke<O>)               │
//!      │  endpoint → sign (aws-sigv4) → send → decode      │
//!      └───────────────────────────────────────────────────┘
//! ```
//!
//! ## Services
//!
//! | Module          | Protocol     | Signing name   | Operations |
//! |-----------------|--------------|----------------|------------|
//! | `codepipeline`  | AWS JSON 1.1 | `codepipeline` | 11         |
//! | `geoplaces`     | REST JSON    | `geo-places`   | 4          |
//!
//! With the `cli` feature every operation input derives `clap::Args`.

pub mod client;
pub mod codepipeline;
pub mod config;
pub mod error;
pub mod geoplaces;
pub mod protocol;

pub use client::{AwsClient, AwsResponse};
pub use config::{AwsRegion, ClientSettings, SettingsOverride};
pub use error::{AwsError, AwsResult};
pub use protocol::{AwsOperation, ServiceSpec, WireRequest};
