//! GetNext walk over an OID subtree.
//!
//! A [`Walk`] sends one GetNext at a time, starting from the requested OID
//! and continuing from the last OID the agent returned, until the agent
//! leaves the subtree or something goes wrong. Everything collected is kept
//! in a [`WalkResult`] whichever way the walk ends.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, ErrorStatus, Result, WalkAbortReason};
use crate::message::GetResponse;
use crate::oid::Oid;
use crate::transport::Transport;
use crate::value::Value;
use crate::varbind::VarBind;

use super::Client;

/// Where a walk is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WalkState {
    /// More requests will be sent.
    Walking,
    /// The agent left the subtree or reported the end of its MIB view.
    Done,
    /// The walk stopped early; results collected so far are kept.
    Aborted(WalkAbortReason),
}

impl WalkState {
    /// True for `Done` and `Aborted`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Walking)
    }
}

impl std::fmt::Display for WalkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Walking => write!(f, "walking"),
            Self::Done => write!(f, "done"),
            Self::Aborted(reason) => write!(f, "aborted: {}", reason),
        }
    }
}

/// Bindings collected by a walk, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct WalkResult {
    entries: Vec<VarBind>,
    index: HashMap<Oid, usize>,
}

impl WalkResult {
    /// Create an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a binding. Returns false, leaving the set unchanged, if the
    /// OID is already present.
    pub(crate) fn insert(&mut self, varbind: VarBind) -> bool {
        if self.index.contains_key(&varbind.oid) {
            return false;
        }
        self.index.insert(varbind.oid.clone(), self.entries.len());
        self.entries.push(varbind);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, oid: &Oid) -> bool {
        self.index.contains_key(oid)
    }

    /// Value recorded for `oid`.
    pub fn get(&self, oid: &Oid) -> Option<&Value> {
        self.index.get(oid).map(|&i| &self.entries[i].value)
    }

    /// Bindings in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, VarBind> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[VarBind] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<VarBind> {
        self.entries
    }

    /// `(oid, value)` pairs rendered as text, in discovery order.
    pub fn rendered(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|vb| (vb.oid.to_string(), vb.value.to_string()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a WalkResult {
    type Item = &'a VarBind;
    type IntoIter = std::slice::Iter<'a, VarBind>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A finished walk: the collected bindings and how the walk ended.
#[derive(Debug, Clone)]
pub struct WalkOutcome {
    pub results: WalkResult,
    /// Always terminal.
    pub state: WalkState,
}

impl WalkOutcome {
    /// True if the walk ended normally.
    pub fn is_complete(&self) -> bool {
        self.state == WalkState::Done
    }

    pub fn abort_reason(&self) -> Option<WalkAbortReason> {
        match self.state {
            WalkState::Aborted(reason) => Some(reason),
            _ => None,
        }
    }
}

/// The step future either finishes or was cut short by cancellation.
type StepFuture = Pin<Box<dyn Future<Output = Option<Result<GetResponse>>> + Send>>;

/// Async stream walking an OID subtree with GetNext.
///
/// Created by [`Client::walk()`]. Yields each newly discovered binding; the
/// stream ends once [`state()`](Self::state) becomes terminal.
pub struct Walk<T: Transport> {
    client: Client<T>,
    base_oid: Oid,
    current_oid: Oid,
    results: WalkResult,
    state: WalkState,
    max_results: Option<usize>,
    cancel: Option<CancellationToken>,
    pending: Option<StepFuture>,
}

impl<T: Transport> Walk<T> {
    pub(crate) fn new(client: Client<T>, oid: Oid, max_results: Option<usize>) -> Self {
        Self {
            client,
            base_oid: oid.clone(),
            current_oid: oid,
            results: WalkResult::new(),
            state: WalkState::Walking,
            max_results,
            cancel: None,
            pending: None,
        }
    }

    /// Stop the walk when `token` is cancelled.
    ///
    /// An in-flight request is abandoned immediately.
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The OID the walk started from.
    pub fn base_oid(&self) -> &Oid {
        &self.base_oid
    }

    pub fn state(&self) -> WalkState {
        self.state
    }

    /// Bindings collected so far.
    pub fn results(&self) -> &WalkResult {
        &self.results
    }

    fn finish(&mut self, state: WalkState) {
        self.pending = None;
        self.state = state;
        match state {
            WalkState::Aborted(reason) => {
                tracing::debug!(target: "snmp_walker::walk", { snmp.target = %self.client.peer_addr(), snmp.oid = %self.base_oid, results = self.results.len(), %reason }, "walk aborted");
            }
            _ => {
                tracing::debug!(target: "snmp_walker::walk", { snmp.target = %self.client.peer_addr(), snmp.oid = %self.base_oid, results = self.results.len() }, "walk complete");
            }
        }
    }

    /// Apply one reply. Returns the newly recorded binding, if any.
    fn apply(&mut self, response: GetResponse) -> Option<VarBind> {
        match response.status() {
            ErrorStatus::NoError => {}
            ErrorStatus::NoSuchName => {
                self.finish(WalkState::Done);
                return None;
            }
            status => {
                let index = response.error_index.max(0) as u32;
                self.finish(WalkState::Aborted(WalkAbortReason::AgentError {
                    status,
                    index,
                }));
                return None;
            }
        }

        let Some(next_oid) = response.next_oid else {
            self.finish(WalkState::Done);
            return None;
        };
        let value = response.value.unwrap_or(Value::Null);

        if value == Value::EndOfMibView || !next_oid.starts_with(&self.base_oid) {
            self.finish(WalkState::Done);
            return None;
        }

        if self.results.contains(&next_oid) {
            tracing::warn!(target: "snmp_walker::walk", { snmp.target = %self.client.peer_addr(), snmp.oid = %next_oid }, "agent returned an OID already seen");
            self.finish(WalkState::Aborted(WalkAbortReason::Cycle));
            return None;
        }

        tracing::trace!(target: "snmp_walker::walk", { snmp.oid = %next_oid, step = self.results.len() + 1 }, "walk step");

        let varbind = VarBind::new(next_oid, value);
        self.current_oid = varbind.oid.clone();
        self.results.insert(varbind.clone());
        Some(varbind)
    }

    fn start_step(&mut self) -> StepFuture
    where
        T: 'static,
    {
        let client = self.client.clone();
        let oid = self.current_oid.clone();
        let cancel = self.cancel.clone();

        Box::pin(async move {
            match cancel {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => None,
                    result = client.get_next(&oid) => Some(result),
                },
                None => Some(client.get_next(&oid).await),
            }
        })
    }
}

fn abort_reason(error: &Error) -> WalkAbortReason {
    match error {
        Error::Timeout { .. } => WalkAbortReason::Timeout,
        Error::Network { .. } => WalkAbortReason::Network,
        Error::EncodingLimitExceeded { .. } => WalkAbortReason::EncodingLimitExceeded,
        _ => WalkAbortReason::MalformedResponse,
    }
}

impl<T: Transport + 'static> Walk<T> {
    /// Get the next new binding, or None once the walk has ended.
    pub async fn next(&mut self) -> Option<VarBind> {
        std::future::poll_fn(|cx| Pin::new(&mut *self).poll_next(cx)).await
    }

    /// Drive the walk to its end.
    pub async fn run(mut self) -> WalkOutcome {
        while self.next().await.is_some() {}
        WalkOutcome {
            results: self.results,
            state: self.state,
        }
    }

    /// Drive the walk to its end, treating any abort as an error.
    ///
    /// Use [`run`](Self::run) to keep partial results from an aborted walk.
    pub async fn collect(self) -> Result<Vec<VarBind>> {
        let target = self.client.peer_addr();
        let outcome = self.run().await;
        match outcome.state {
            WalkState::Aborted(reason) => Err(Error::WalkAborted { target, reason }.boxed()),
            _ => Ok(outcome.results.into_vec()),
        }
    }
}

impl<T: Transport + 'static> Stream for Walk<T> {
    type Item = VarBind;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if self.state.is_terminal() {
                return Poll::Ready(None);
            }

            if self.pending.is_none() {
                if self.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
                    self.finish(WalkState::Aborted(WalkAbortReason::Cancelled));
                    return Poll::Ready(None);
                }
                if let Some(max) = self.max_results
                    && self.results.len() >= max
                {
                    self.finish(WalkState::Aborted(WalkAbortReason::ResultLimit));
                    return Poll::Ready(None);
                }
                let step = self.start_step();
                self.pending = Some(step);
            }

            let Some(pending) = self.pending.as_mut() else {
                continue;
            };
            let outcome = match pending.as_mut().poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(outcome) => outcome,
            };
            self.pending = None;

            match outcome {
                None => {
                    self.finish(WalkState::Aborted(WalkAbortReason::Cancelled));
                }
                Some(Err(e)) => {
                    let reason = abort_reason(&e);
                    self.finish(WalkState::Aborted(reason));
                }
                Some(Ok(response)) => {
                    if let Some(varbind) = self.apply(response) {
                        return Poll::Ready(Some(varbind));
                    }
                }
            }
        }
    }
}
