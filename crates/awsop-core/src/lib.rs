//! # awsop-core – service-agnostic operation engine
//!
//! Turns a flat set of user inputs into one or more service calls and shapes
//! what comes back. Nothing in here knows about AWS, HTTP or signing; the
//! wire side is reached through the [`Invoke`] trait.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │  Runner  (runner.rs)                             │
//! │  ├── validation + selector resolution            │
//! │  ├── confirmation gate   (confirm.rs)            │
//! │  └── output sink         (sink.rs)               │
//! ├──────────────────────────────────────────────────┤
//! │  InvocationContext  (context.rs)                 │
//! │  ├── Projector      (projection.rs)              │
//! │  └── PagePlan       (pager.rs)                   │
//! ├──────────────────────────────────────────────────┤
//! │  PageIterator  (pager.rs)                        │
//! │  └── Fetching → Emitting → Done | Failed         │
//! ├──────────────────────────────────────────────────┤
//! │  Invoke<O>  (invoke.rs)   ← implemented by the   │
//! │                              service binding     │
//! ├──────────────────────────────────────────────────┤
//! │  Operation  (operation.rs) · request helpers     │
//! │                              (request.rs)        │
//! └──────────────────────────────────────────────────┘
//! ```

// ── Sub-modules ─────────────────────────────────────────────────────────

pub mod error;
pub mod request;
pub mod operation;
pub mod invoke;
pub mod pager;
pub mod projection;
pub mod context;
pub mod confirm;
pub mod sink;
pub mod runner;

// ── Re-exports for ergonomic access ─────────────────────────────────────

pub use confirm::{AutoConfirm, ConfirmGate, ConfirmRequest};
pub use context::{InvocationContext, InvocationOptions};
pub use error::{ConfirmError, InvocationError, OutputError, ProjectionError, ValidationError};
pub use invoke::Invoke;
pub use operation::Operation;
pub use pager::{Page, PagePlan, PageIterator, PagedRequest, PagingStatus, PagingSummary};
pub use projection::{Projector, Selector};
pub use runner::{InvocationReport, InvocationStatus, Runner};
pub use sink::OutputSink;

pub use tokio_util::sync::CancellationToken;
