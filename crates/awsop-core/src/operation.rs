//! The operation descriptor.
//!
//! One implementation per remote API operation. It names the operation,
//! publishes the field names a selector may refer to, validates the flat
//! input, and turns it into the request value handed to the invoker.

use serde::Serialize;

use crate::error::ValidationError;

pub trait Operation: Send + Sync + 'static {
    /// Flat set of named optional inputs, one field per parameter.
    ///
    /// Serialized field names must match [`Operation::PARAMETERS`]; that is
    /// how an input is echoed back by name.
    type Input: Serialize + Send + Sync;

    /// Structured request sent to the service.
    type Request: Serialize + Send + Sync;

    /// Decoded service response.
    type Response: Serialize + Send;

    /// API name, e.g. `ListActionExecutions`.
    const NAME: &'static str;

    /// Selector applied when the caller does not give one.
    const DEFAULT_SELECT: &'static str = "*";

    /// Top-level field names of [`Operation::Response`] as they appear on
    /// the wire.
    const RESPONSE_FIELDS: &'static [&'static str];

    /// Parameter names of [`Operation::Input`].
    const PARAMETERS: &'static [&'static str];

    /// Operations that change remote state go through the confirmation gate.
    const MUTATING: bool = false;

    /// Parameter echoed by `--pass-thru`.
    const PASS_THRU: Option<&'static str> = None;

    /// Check required inputs and value ranges. Runs before anything else.
    fn validate(_input: &Self::Input) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Build the first request. Unset inputs stay absent.
    fn build_request(input: &Self::Input) -> Self::Request;

    /// What the confirmation prompt names as the affected resource.
    fn confirm_target(_input: &Self::Input) -> String {
        String::new()
    }
}
