//! Continuation-token paging.
//!
//! ```text
//!            ┌──────────── more pages, budget left ───────────┐
//!            ▼                                                │
//!   ┌──────────────┐   Ok(page)   ┌──────────────┐            │
//!   │   Fetching   │ ───────────▶ │   Emitting   │ ───────────┘
//!   └──────────────┘              └──────────────┘
//!      │        │                         │
//!      │ Err    │ cancelled               │ manual · no token · budget spent
//!      ▼        ▼                         ▼
//!   Failed    Done(Cancelled)          Done(Completed | Truncated)
//! ```
//!
//! A page cut down to fit the budget ends in `Done(Truncated)` with no
//! resume token, since its token would skip the dropped items.
//!
//! A failed fetch after items were already emitted under an explicit budget
//! ends in `Done(Truncated)` instead of `Failed`; the error is logged and
//! kept on the summary but not returned.

use serde::Serialize;

use crate::error::InvocationError;
use crate::invoke::Invoke;
use crate::operation::Operation;
use tokio_util::sync::CancellationToken;

// ── Request / response capabilities ─────────────────────────────────────

/// A request that carries a continuation token.
pub trait PagedRequest {
    /// Largest page size the service accepts, for operations that take one.
    const MAX_PAGE_SIZE: Option<usize> = None;

    fn set_next_token(&mut self, token: Option<String>);

    /// Page size the caller asked for, if any.
    fn page_size(&self) -> Option<usize> {
        None
    }

    fn set_page_size(&mut self, _size: usize) {}
}

/// A response that holds one page of items.
pub trait Page {
    fn next_token(&self) -> Option<&str>;

    fn item_count(&self) -> usize;

    /// Drop everything past the first `keep` items.
    fn truncate_items(&mut self, keep: usize);
}

// ── Plan & outcome ──────────────────────────────────────────────────────

/// How one paged invocation should proceed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagePlan {
    /// Token for the first request.
    pub start_token: Option<String>,
    /// Maximum total items to emit.
    pub budget: Option<usize>,
    /// Fetch exactly one page.
    pub manual: bool,
}

impl PagePlan {
    pub fn new(start_token: Option<String>, budget: Option<usize>, manual: bool) -> Self {
        Self {
            start_token: start_token.filter(|t| !t.is_empty()),
            budget,
            manual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PagingStatus {
    /// The last page carried no token, or manual mode fetched its page.
    Completed,
    /// Stopped early: budget spent, or a later page failed under a budget.
    Truncated,
    /// Cancellation was observed before a fetch.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingSummary {
    pub status: PagingStatus,
    pub pages: usize,
    pub items: usize,
    /// Token to continue from, when more data may exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_token: Option<String>,
    /// A page failure that was swallowed because results were already
    /// emitted under a budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swallowed_error: Option<String>,
}

// ── Iterator ────────────────────────────────────────────────────────────

enum State<R> {
    Fetching,
    Emitting(R),
    Done(PagingStatus),
}

/// Drives one operation across pages, strictly one request at a time.
pub struct PageIterator<'a, O, I>
where
    O: Operation,
    I: Invoke<O>,
{
    invoker: &'a I,
    request: O::Request,
    plan: PagePlan,
    cancel: &'a CancellationToken,
}

impl<'a, O, I> PageIterator<'a, O, I>
where
    O: Operation,
    O::Request: PagedRequest,
    O::Response: Page,
    I: Invoke<O>,
{
    pub fn new(
        invoker: &'a I,
        request: O::Request,
        plan: PagePlan,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            invoker,
            request,
            plan,
            cancel,
        }
    }

    /// Fetch pages until done, handing each one to `emit` in order.
    ///
    /// Pages over the remaining budget are cut down before `emit` sees
    /// them. An error from `emit` aborts iteration immediately.
    pub async fn run<F>(mut self, mut emit: F) -> Result<PagingSummary, InvocationError<I::Error>>
    where
        F: FnMut(O::Response) -> Result<(), InvocationError<I::Error>>,
    {
        let caller_page_size = self.request.page_size();
        let mut token = self.plan.start_token.clone();
        let mut remaining = self.plan.budget;
        let mut pages = 0usize;
        let mut items = 0usize;
        let mut swallowed_error = None;
        let mut state = State::Fetching;

        loop {
            state = match state {
                State::Fetching => {
                    if self.cancel.is_cancelled() {
                        log::debug!("{}: cancelled before page {}", O::NAME, pages + 1);
                        State::Done(PagingStatus::Cancelled)
                    } else {
                        self.request.set_next_token(token.clone());
                        if let Some(size) = page_size_for::<O::Request>(remaining, caller_page_size) {
                            self.request.set_page_size(size);
                        }
                        log::debug!(
                            "{}: fetching page {} (token: {}, remaining: {:?})",
                            O::NAME,
                            pages + 1,
                            token.as_deref().unwrap_or("<none>"),
                            remaining
                        );
                        match self.invoker.invoke(&self.request).await {
                            Ok(page) => State::Emitting(page),
                            Err(err) if items > 0 && self.plan.budget.is_some() => {
                                log::warn!(
                                    "{}: page {} failed after {} items, returning partial results: {}",
                                    O::NAME,
                                    pages + 1,
                                    items,
                                    err
                                );
                                swallowed_error = Some(err.to_string());
                                State::Done(PagingStatus::Truncated)
                            }
                            Err(err) => return Err(InvocationError::Service(err)),
                        }
                    }
                }
                State::Emitting(mut page) => {
                    pages += 1;
                    let next = page
                        .next_token()
                        .filter(|t| !t.is_empty())
                        .map(str::to_owned);
                    let mut count = page.item_count();
                    let mut cut = false;
                    if let Some(left) = remaining {
                        if count > left {
                            page.truncate_items(left);
                            count = left;
                            cut = true;
                        }
                    }
                    emit(page)?;
                    items += count;
                    remaining = remaining.map(|left| left - count);
                    token = next;

                    if cut {
                        // the token points past items that were dropped
                        if token.is_some() {
                            log::warn!(
                                "{}: page {} was cut to the item budget and cannot be resumed",
                                O::NAME,
                                pages
                            );
                        }
                        token = None;
                        State::Done(PagingStatus::Truncated)
                    } else if self.plan.manual || token.is_none() {
                        State::Done(PagingStatus::Completed)
                    } else if remaining == Some(0) {
                        State::Done(PagingStatus::Truncated)
                    } else {
                        State::Fetching
                    }
                }
                State::Done(status) => {
                    return Ok(PagingSummary {
                        status,
                        pages,
                        items,
                        resume_token: token,
                        swallowed_error,
                    });
                }
            };
        }
    }
}

fn page_size_for<R: PagedRequest>(
    remaining: Option<usize>,
    caller: Option<usize>,
) -> Option<usize> {
    let remaining = remaining?;
    let max = R::MAX_PAGE_SIZE?;
    let size = remaining.min(max);
    Some(caller.map_or(size, |c| c.min(size)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use async_trait::async_trait;
    use serde::Serialize;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Debug, Default, Clone, Serialize)]
    struct Req {
        token: Option<String>,
        size: Option<usize>,
    }

    impl PagedRequest for Req {
        const MAX_PAGE_SIZE: Option<usize> = Some(5);

        fn set_next_token(&mut self, token: Option<String>) {
            self.token = token;
        }

        fn page_size(&self) -> Option<usize> {
            self.size
        }

        fn set_page_size(&mut self, size: usize) {
            self.size = Some(size);
        }
    }

    #[derive(Debug, Clone, Serialize)]
    struct Resp {
        items: Vec<u32>,
        token: Option<String>,
    }

    impl Page for Resp {
        fn next_token(&self) -> Option<&str> {
            self.token.as_deref()
        }

        fn item_count(&self) -> usize {
            self.items.len()
        }

        fn truncate_items(&mut self, keep: usize) {
            self.items.truncate(keep);
        }
    }

    struct ListThings;

    impl Operation for ListThings {
        type Input = ();
        type Request = Req;
        type Response = Resp;
        const NAME: &'static str = "ListThings";
        const RESPONSE_FIELDS: &'static [&'static str] = &["items", "token"];
        const PARAMETERS: &'static [&'static str] = &[];

        fn build_request(_input: &()) -> Req {
            Req::default()
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    #[derive(Default)]
    struct Script {
        pages: Mutex<VecDeque<Result<Resp, Boom>>>,
        seen: Mutex<Vec<Req>>,
    }

    impl Script {
        fn new(pages: Vec<Result<Resp, Boom>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<Req> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Invoke<ListThings> for Script {
        type Error = Boom;

        async fn invoke(&self, request: &Req) -> Result<Resp, Boom> {
            self.seen.lock().unwrap().push(request.clone());
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .expect("invoker called more often than scripted")
        }
    }

    fn page(items: &[u32], token: Option<&str>) -> Result<Resp, Boom> {
        Ok(Resp {
            items: items.to_vec(),
            token: token.map(String::from),
        })
    }

    async fn drive(
        script: &Script,
        plan: PagePlan,
    ) -> (Result<PagingSummary, InvocationError<Boom>>, Vec<u32>) {
        let cancel = CancellationToken::new();
        let mut out = Vec::new();
        let result = PageIterator::<ListThings, _>::new(script, Req::default(), plan, &cancel)
            .run(|resp| {
                out.extend(resp.items);
                Ok(())
            })
            .await;
        (result, out)
    }

    #[tokio::test]
    async fn page_size_tracks_remaining_budget() {
        let script = Script::new(vec![page(&[1, 2, 3, 4, 5], Some("t2")), page(&[6, 7], Some("t3"))]);
        let (result, out) = drive(&script, PagePlan::new(None, Some(7), false)).await;
        let summary = result.unwrap();
        assert_eq!(out, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(summary.status, PagingStatus::Truncated);
        assert_eq!(summary.resume_token.as_deref(), Some("t3"));
        let sizes: Vec<_> = script.seen().iter().map(|r| r.size).collect();
        assert_eq!(sizes, vec![Some(5), Some(2)]);
    }

    #[tokio::test]
    async fn oversized_page_is_truncated() {
        let script = Script::new(vec![page(&[1, 2, 3, 4], Some("t2"))]);
        let (result, out) = drive(&script, PagePlan::new(None, Some(3), false)).await;
        assert_eq!(out, vec![1, 2, 3]);
        let summary = result.unwrap();
        assert_eq!(summary.items, 3);
        assert_eq!(summary.status, PagingStatus::Truncated);
        assert_eq!(summary.resume_token, None);
    }

    #[tokio::test]
    async fn cut_last_page_is_truncated_not_completed() {
        let script = Script::new(vec![page(&[1, 2, 3, 4], None)]);
        let (result, out) = drive(&script, PagePlan::new(None, Some(3), false)).await;
        assert_eq!(out, vec![1, 2, 3]);
        let summary = result.unwrap();
        assert_eq!(summary.status, PagingStatus::Truncated);
        assert_eq!(summary.resume_token, None);
    }

    #[tokio::test]
    async fn page_that_fits_budget_exactly_keeps_its_token() {
        let script = Script::new(vec![page(&[1, 2, 3], Some("t2"))]);
        let (result, _) = drive(&script, PagePlan::new(None, Some(3), false)).await;
        let summary = result.unwrap();
        assert_eq!(summary.status, PagingStatus::Truncated);
        assert_eq!(summary.resume_token.as_deref(), Some("t2"));
    }

    #[tokio::test]
    async fn empty_token_ends_iteration() {
        let script = Script::new(vec![page(&[1], Some(""))]);
        let (result, _) = drive(&script, PagePlan::default()).await;
        let summary = result.unwrap();
        assert_eq!(summary.status, PagingStatus::Completed);
        assert_eq!(summary.resume_token, None);
        assert_eq!(script.seen().len(), 1);
    }

    #[tokio::test]
    async fn empty_start_token_is_ignored() {
        let plan = PagePlan::new(Some(String::new()), None, false);
        assert_eq!(plan.start_token, None);
    }

    #[tokio::test]
    async fn no_budget_means_no_page_size() {
        let script = Script::new(vec![page(&[1], None)]);
        let _ = drive(&script, PagePlan::default()).await;
        assert_eq!(script.seen()[0].size, None);
    }

    #[tokio::test]
    async fn failure_without_budget_propagates_even_after_items() {
        let script = Script::new(vec![page(&[1, 2], Some("t2")), Err(Boom)]);
        let (result, out) = drive(&script, PagePlan::default()).await;
        assert!(matches!(result, Err(InvocationError::Service(Boom))));
        assert_eq!(out, vec![1, 2]);
    }

    #[tokio::test]
    async fn emit_error_aborts() {
        let script = Script::new(vec![page(&[1], Some("t2"))]);
        let cancel = CancellationToken::new();
        let result = PageIterator::<ListThings, _>::new(&script, Req::default(), PagePlan::default(), &cancel)
            .run(|_| Err(ValidationError::EmptySelector.into()))
            .await;
        assert!(matches!(result, Err(InvocationError::Validation(_))));
        assert_eq!(script.seen().len(), 1);
    }
}
