//! # Transition State Machine
//!
//! An animated hand-off runs in two phases driven by completion signals:
//!
//! ```text
//! Idle ──start──► ExitRunning ──complete──► EnterRunning ──complete──► Settled
//!                      │                         │
//!                      └────── supersede ────────┴──► (ticket stale)
//! ```
//!
//! The content swap happens between the phases, so the surface holds exactly
//! one controller root at every settled point. Each phase runs under its own
//! ticket, so a late signal for the exit effect cannot end the enter effect.
//! A new request while a transition is in flight supersedes it; the old
//! ticket is then ignored.

use crate::config::Effect;
use crate::content::MountId;
use serde::{Deserialize, Serialize};

/// Identifies one animated transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransitionTicket(pub u64);

/// Phase of the navigator's display pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPhase {
    /// Nothing shown yet.
    Idle,
    /// Exit effect playing on the outgoing content.
    ExitRunning,
    /// Incoming content inserted, enter effect playing.
    EnterRunning,
    /// Surface shows the top controller, nothing in flight.
    Settled,
}

/// An in-flight animated transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    ticket: TransitionTicket,
    phase: TransitionPhase,
    incoming: MountId,
    enter: Effect,
}

/// What the owner must do after a completion signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Swap content to the incoming mount, then play `enter`.
    SwapAndEnter { incoming: MountId, enter: Effect },
    /// The transition is over.
    Settle,
}

impl Transition {
    /// Begin a transition in the exit phase.
    #[must_use]
    pub fn begin(ticket: TransitionTicket, incoming: MountId, enter: Effect) -> Self {
        Self {
            ticket,
            phase: TransitionPhase::ExitRunning,
            incoming,
            enter,
        }
    }

    #[must_use]
    pub fn ticket(&self) -> TransitionTicket {
        self.ticket
    }

    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Key the enter phase to the ticket its effect was started with. The
    /// exit ticket is stale from here on.
    pub fn enter_with(&mut self, ticket: TransitionTicket) {
        if self.phase == TransitionPhase::EnterRunning {
            self.ticket = ticket;
        }
    }

    /// Advance on a completion signal. Returns `None` for a ticket that does
    /// not belong to this transition.
    pub fn advance(&mut self, ticket: TransitionTicket) -> Option<Step> {
        if ticket != self.ticket {
            return None;
        }
        match self.phase {
            TransitionPhase::ExitRunning => {
                self.phase = TransitionPhase::EnterRunning;
                Some(Step::SwapAndEnter {
                    incoming: self.incoming,
                    enter: self.enter.clone(),
                })
            }
            TransitionPhase::EnterRunning => {
                self.phase = TransitionPhase::Settled;
                Some(Step::Settle)
            }
            TransitionPhase::Idle | TransitionPhase::Settled => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn transition() -> Transition {
        Transition::begin(
            TransitionTicket(1),
            MountId(2),
            Effect::new("in", 10),
        )
    }

    #[test]
    fn exit_then_enter_then_settle() {
        let mut t = transition();
        assert_eq!(t.phase(), TransitionPhase::ExitRunning);

        let step = t.advance(TransitionTicket(1));
        assert_eq!(
            step,
            Some(Step::SwapAndEnter {
                incoming: MountId(2),
                enter: Effect::new("in", 10)
            })
        );
        assert_eq!(t.phase(), TransitionPhase::EnterRunning);

        assert_eq!(t.advance(TransitionTicket(1)), Some(Step::Settle));
        assert_eq!(t.phase(), TransitionPhase::Settled);

        assert_eq!(t.advance(TransitionTicket(1)), None);
    }

    #[test]
    fn enter_phase_ignores_the_exit_ticket() {
        let mut t = transition();
        assert!(t.advance(TransitionTicket(1)).is_some());
        t.enter_with(TransitionTicket(2));

        assert_eq!(t.advance(TransitionTicket(1)), None);
        assert_eq!(t.phase(), TransitionPhase::EnterRunning);
        assert_eq!(t.advance(TransitionTicket(2)), Some(Step::Settle));
    }

    #[test]
    fn enter_with_is_ignored_outside_enter_phase() {
        let mut t = transition();
        t.enter_with(TransitionTicket(5));
        assert_eq!(t.ticket(), TransitionTicket(1));
    }

    #[test]
    fn foreign_ticket_is_ignored() {
        let mut t = transition();
        assert_eq!(t.advance(TransitionTicket(99)), None);
        assert_eq!(t.phase(), TransitionPhase::ExitRunning);
    }
}
