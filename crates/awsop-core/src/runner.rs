//! Runs one operation end to end.
//!
//! Order of events for every invocation:
//!
//! 1. validate the input (no call on failure)
//! 2. resolve selector and paging plan (no call on failure)
//! 3. read-only operation echoing an input: emit the echo, stop
//! 4. mutating operation: ask the confirmation gate unless forced
//! 5. build the request and invoke, page by page for list operations
//! 6. echo selector on a mutating operation: emit the echo once

use serde::Serialize;

use crate::confirm::{ConfirmGate, ConfirmRequest};
use crate::context::{InvocationContext, InvocationOptions};
use crate::error::InvocationError;
use crate::invoke::Invoke;
use crate::operation::Operation;
use crate::pager::{Page, PageIterator, PagedRequest, PagingStatus};
use crate::projection::Projector;
use crate::sink::OutputSink;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InvocationStatus {
    Completed,
    Truncated,
    Cancelled,
    Declined,
}

impl From<PagingStatus> for InvocationStatus {
    fn from(status: PagingStatus) -> Self {
        match status {
            PagingStatus::Completed => Self::Completed,
            PagingStatus::Truncated => Self::Truncated,
            PagingStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// Outcome of a run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationReport {
    pub status: InvocationStatus,
    /// Successful service calls.
    pub calls: usize,
    /// Items emitted across pages. Zero for single-call operations.
    pub items: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swallowed_error: Option<String>,
}

impl InvocationReport {
    fn without_calls(status: InvocationStatus) -> Self {
        Self {
            status,
            calls: 0,
            items: 0,
            resume_token: None,
            swallowed_error: None,
        }
    }
}

pub struct Runner<'a, I, G, S> {
    invoker: &'a I,
    gate: &'a G,
    sink: S,
    cancel: CancellationToken,
}

impl<'a, I, G, S> Runner<'a, I, G, S>
where
    G: ConfirmGate,
    S: OutputSink,
{
    pub fn new(invoker: &'a I, gate: &'a G, sink: S, cancel: CancellationToken) -> Self {
        Self {
            invoker,
            gate,
            sink,
            cancel,
        }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run a list operation, following continuation tokens per the plan.
    pub async fn run_paged<O>(
        &mut self,
        input: &O::Input,
        options: &InvocationOptions,
    ) -> Result<InvocationReport, InvocationError<<I as Invoke<O>>::Error>>
    where
        O: Operation,
        O::Request: PagedRequest,
        O::Response: Page,
        I: Invoke<O>,
    {
        let ctx = match self.prepare::<O, <I as Invoke<O>>::Error>(input, options)? {
            Prepared::Ready(ctx) => ctx,
            Prepared::Finished(report) => return Ok(report),
        };

        let request = O::build_request(input);
        let projector = ctx.projector;
        let sink = &mut self.sink;
        let summary = PageIterator::<O, I>::new(self.invoker, request, ctx.plan, &self.cancel)
            .run(|page| {
                if let Some(value) = projector.project(&page)? {
                    sink.emit(value)?;
                }
                Ok(())
            })
            .await?;

        if summary.pages > 0 {
            self.emit_echo::<_, <I as Invoke<O>>::Error>(&projector, input)?;
        }

        Ok(InvocationReport {
            status: summary.status.into(),
            calls: summary.pages,
            items: summary.items,
            resume_token: summary.resume_token,
            swallowed_error: summary.swallowed_error,
        })
    }

    /// Run an operation that makes exactly one call.
    pub async fn run_single<O>(
        &mut self,
        input: &O::Input,
        options: &InvocationOptions,
    ) -> Result<InvocationReport, InvocationError<<I as Invoke<O>>::Error>>
    where
        O: Operation,
        I: Invoke<O>,
    {
        let ctx = match self.prepare::<O, <I as Invoke<O>>::Error>(input, options)? {
            Prepared::Ready(ctx) => ctx,
            Prepared::Finished(report) => return Ok(report),
        };

        if self.cancel.is_cancelled() {
            return Ok(InvocationReport::without_calls(InvocationStatus::Cancelled));
        }

        let request = O::build_request(input);
        log::debug!("{}: invoking", O::NAME);
        let response = self
            .invoker
            .invoke(&request)
            .await
            .map_err(InvocationError::Service)?;

        if let Some(value) = ctx.projector.project(&response)? {
            self.sink.emit(value)?;
        }
        self.emit_echo::<_, <I as Invoke<O>>::Error>(&ctx.projector, input)?;

        Ok(InvocationReport {
            status: InvocationStatus::Completed,
            calls: 1,
            items: 0,
            resume_token: None,
            swallowed_error: None,
        })
    }

    /// Steps 1 to 4. `E` is the invoker's error type, only carried through.
    fn prepare<O, E>(
        &mut self,
        input: &O::Input,
        options: &InvocationOptions,
    ) -> Result<Prepared, InvocationError<E>>
    where
        O: Operation,
        E: std::error::Error + 'static,
    {
        O::validate(input)?;
        let ctx = InvocationContext::resolve::<O>(options)?;

        if ctx.projector.selector().is_echo() && !O::MUTATING {
            log::debug!("{}: echo selector on read-only operation, not invoking", O::NAME);
            self.emit_echo::<_, E>(&ctx.projector, input)?;
            return Ok(Prepared::Finished(InvocationReport::without_calls(
                InvocationStatus::Completed,
            )));
        }

        if O::MUTATING && !ctx.force {
            let request = ConfirmRequest {
                operation: O::NAME,
                target: O::confirm_target(input),
            };
            if !self.gate.confirm(&request)? {
                log::info!("{}: declined", request);
                return Ok(Prepared::Finished(InvocationReport::without_calls(
                    InvocationStatus::Declined,
                )));
            }
        }

        Ok(Prepared::Ready(ctx))
    }

    fn emit_echo<T, E>(&mut self, projector: &Projector, input: &T) -> Result<(), InvocationError<E>>
    where
        T: Serialize,
        E: std::error::Error + 'static,
    {
        if let Some(value) = projector.echo(input)? {
            self.sink.emit(value)?;
        }
        Ok(())
    }
}

enum Prepared {
    Ready(InvocationContext),
    Finished(InvocationReport),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::AutoConfirm;
    use crate::error::{ConfirmError, ValidationError};
    use crate::request::require_str;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default, Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct DeleteInput {
        name: Option<String>,
    }

    struct DeleteThing;

    impl Operation for DeleteThing {
        type Input = DeleteInput;
        type Request = Value;
        type Response = Value;
        const NAME: &'static str = "DeleteThing";
        const RESPONSE_FIELDS: &'static [&'static str] = &[];
        const PARAMETERS: &'static [&'static str] = &["Name"];
        const MUTATING: bool = true;
        const PASS_THRU: Option<&'static str> = Some("Name");

        fn validate(input: &DeleteInput) -> Result<(), ValidationError> {
            require_str("Name", &input.name)
        }

        fn build_request(input: &DeleteInput) -> Value {
            json!({ "name": input.name })
        }

        fn confirm_target(input: &DeleteInput) -> String {
            input.name.clone().unwrap_or_default()
        }
    }

    #[derive(Default)]
    struct Counting(AtomicUsize);

    #[async_trait]
    impl Invoke<DeleteThing> for Counting {
        type Error = std::io::Error;

        async fn invoke(&self, _request: &Value) -> Result<Value, std::io::Error> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(json!({}))
        }
    }

    struct Decline;

    impl ConfirmGate for Decline {
        fn confirm(&self, _request: &ConfirmRequest) -> Result<bool, ConfirmError> {
            Ok(false)
        }
    }

    fn input() -> DeleteInput {
        DeleteInput {
            name: Some("p-1".into()),
        }
    }

    #[tokio::test]
    async fn declined_mutation_makes_no_call() {
        let invoker = Counting::default();
        let mut out: Vec<Value> = Vec::new();
        let mut runner = Runner::new(&invoker, &Decline, &mut out, CancellationToken::new());
        let report = runner
            .run_single::<DeleteThing>(&input(), &InvocationOptions::default())
            .await
            .unwrap();
        assert_eq!(report.status, InvocationStatus::Declined);
        assert_eq!(invoker.0.load(Ordering::SeqCst), 0);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn force_skips_gate() {
        let invoker = Counting::default();
        let mut out: Vec<Value> = Vec::new();
        let options = InvocationOptions {
            force: true,
            ..Default::default()
        };
        let mut runner = Runner::new(&invoker, &Decline, &mut out, CancellationToken::new());
        let report = runner.run_single::<DeleteThing>(&input(), &options).await.unwrap();
        assert_eq!(report.status, InvocationStatus::Completed);
        assert_eq!(invoker.0.load(Ordering::SeqCst), 1);
        assert_eq!(out, vec![json!({})]);
    }

    #[tokio::test]
    async fn mutating_pass_thru_calls_then_echoes_once() {
        let invoker = Counting::default();
        let mut out: Vec<Value> = Vec::new();
        let options = InvocationOptions {
            pass_thru: true,
            ..Default::default()
        };
        let mut runner = Runner::new(&invoker, &AutoConfirm, &mut out, CancellationToken::new());
        runner.run_single::<DeleteThing>(&input(), &options).await.unwrap();
        assert_eq!(invoker.0.load(Ordering::SeqCst), 1);
        assert_eq!(out, vec![json!("p-1")]);
    }

    #[tokio::test]
    async fn cancelled_single_call_is_skipped() {
        let invoker = Counting::default();
        let mut out: Vec<Value> = Vec::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut runner = Runner::new(&invoker, &AutoConfirm, &mut out, cancel);
        let report = runner
            .run_single::<DeleteThing>(&input(), &InvocationOptions::default())
            .await
            .unwrap();
        assert_eq!(report.status, InvocationStatus::Cancelled);
        assert_eq!(invoker.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blank_required_input_fails_before_gate() {
        let invoker = Counting::default();
        let mut out: Vec<Value> = Vec::new();
        let mut runner = Runner::new(&invoker, &Decline, &mut out, CancellationToken::new());
        let err = runner
            .run_single::<DeleteThing>(&DeleteInput::default(), &InvocationOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(invoker.0.load(Ordering::SeqCst), 0);
    }
}
