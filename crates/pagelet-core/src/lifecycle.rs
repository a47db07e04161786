//! Per-call fetch lifecycle tracking.

use std::time::{Duration, Instant};

use crate::error::FetchError;
use crate::fragment::FragmentName;
use crate::wire::Method;

/// Lifecycle phases of a single fetch call.
///
/// `Pending -> {Failed | PlainDelivered | Rendering -> Rendered}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchPhase {
    /// Call issued, transport outstanding.
    Pending,
    /// Transport error or bad status.
    Failed,
    /// Server marked the response plain; raw body handed back.
    PlainDelivered,
    /// Body handed to the renderer, waiting for completion.
    Rendering,
    /// Render completed; caller notified.
    Rendered,
}

impl FetchPhase {
    /// Check if no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::PlainDelivered | Self::Rendered)
    }

    /// Check if moving to `next` is a legal transition.
    pub fn can_transition_to(&self, next: FetchPhase) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Failed)
                | (Self::Pending, Self::PlainDelivered)
                | (Self::Pending, Self::Rendering)
                | (Self::Rendering, Self::Rendered)
        )
    }
}

/// A recorded phase change.
#[derive(Debug, Clone)]
pub struct PhaseMark {
    /// Phase entered.
    pub phase: FetchPhase,
    /// Time from call start to entering the phase.
    pub at: Duration,
}

/// Records the phase transitions of one fetch call.
#[derive(Debug, Clone)]
pub struct FetchTrace {
    fragment: FragmentName,
    method: Method,
    uri: String,
    start: Instant,
    marks: Vec<PhaseMark>,
}

impl FetchTrace {
    /// Start tracing a call. The trace begins in `Pending`.
    pub fn start(fragment: FragmentName, method: Method, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        tracing::debug!(pagelet = %fragment, %method, %uri, "fetch started");
        Self {
            fragment,
            method,
            uri,
            start: Instant::now(),
            marks: vec![PhaseMark {
                phase: FetchPhase::Pending,
                at: Duration::ZERO,
            }],
        }
    }

    /// Current phase.
    pub fn phase(&self) -> FetchPhase {
        self.marks
            .last()
            .map_or(FetchPhase::Pending, |mark| mark.phase)
    }

    /// Move to `next`, rejecting transitions the state machine forbids.
    pub fn advance(&mut self, next: FetchPhase) -> Result<(), FetchError> {
        let from = self.phase();
        if !from.can_transition_to(next) {
            return Err(FetchError::IllegalTransition { from, to: next });
        }

        let at = self.start.elapsed();
        tracing::debug!(
            pagelet = %self.fragment,
            method = %self.method,
            uri = %self.uri,
            ?from,
            to = ?next,
            elapsed_us = u64::try_from(at.as_micros()).unwrap_or(u64::MAX),
            "fetch transition"
        );
        self.marks.push(PhaseMark { phase: next, at });
        Ok(())
    }

    /// All recorded phases, in order.
    pub fn phases(&self) -> Vec<FetchPhase> {
        self.marks.iter().map(|mark| mark.phase).collect()
    }

    /// Recorded marks.
    pub fn marks(&self) -> &[PhaseMark] {
        &self.marks
    }

    /// Elapsed time since the call started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// The fragment this call belongs to.
    pub fn fragment(&self) -> &FragmentName {
        &self.fragment
    }
}
