//! Per-invocation state.
//!
//! [`InvocationOptions`] is what the caller asked for. [`InvocationContext`]
//! is the same thing resolved against one operation: a projector with a
//! checked selector and a paging plan. It is built fresh for every
//! invocation and dropped when the invocation ends.

use crate::error::ValidationError;
use crate::operation::Operation;
use crate::pager::PagePlan;
use crate::projection::{Projector, Selector};

/// Caller-controlled knobs shared by every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationOptions {
    /// Selector: `*`, a response field, or `^Parameter`.
    pub select: Option<String>,
    /// Echo the operation's primary parameter.
    pub pass_thru: bool,
    /// Continuation token for the first request.
    pub next_token: Option<String>,
    /// Maximum total items across all pages.
    pub max_items: Option<usize>,
    /// Fetch a single page even without a start token.
    pub no_auto_iteration: bool,
    /// Keep following tokens after an explicit start token.
    pub auto_iterate: bool,
    /// Skip the confirmation gate.
    pub force: bool,
}

#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub projector: Projector,
    pub plan: PagePlan,
    pub force: bool,
}

impl InvocationContext {
    pub fn resolve<O: Operation>(options: &InvocationOptions) -> Result<Self, ValidationError> {
        if options.select.is_some() && options.pass_thru {
            return Err(ValidationError::Conflict("--select", "--pass-thru"));
        }
        if options.no_auto_iteration && options.auto_iterate {
            return Err(ValidationError::Conflict(
                "--no-auto-iteration",
                "--auto-iterate",
            ));
        }
        if options.max_items == Some(0) {
            return Err(ValidationError::invalid("MaxItems", "must be at least 1"));
        }

        let selector = if options.pass_thru {
            let name = O::PASS_THRU.ok_or_else(|| {
                ValidationError::invalid("PassThru", format!("{} has no pass-thru parameter", O::NAME))
            })?;
            Selector::resolve(O::NAME, &format!("^{name}"), O::RESPONSE_FIELDS, O::PARAMETERS)?
        } else {
            let raw = options.select.as_deref().unwrap_or(O::DEFAULT_SELECT);
            Selector::resolve(O::NAME, raw, O::RESPONSE_FIELDS, O::PARAMETERS)?
        };

        let start_token = options.next_token.clone().filter(|t| !t.is_empty());
        let manual = options.no_auto_iteration || (start_token.is_some() && !options.auto_iterate);

        Ok(Self {
            projector: Projector::new(O::NAME, selector),
            plan: PagePlan::new(start_token, options.max_items, manual),
            force: options.force,
        })
    }
}
