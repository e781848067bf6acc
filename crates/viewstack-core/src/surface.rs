//! # Render Surface
//!
//! The host container that physically shows content. The navigator only ever
//! asks it to clear, insert, and optionally play an effect; the surface never
//! owns controllers.
//!
//! Effects are asynchronous: `play_effect` starts one and returns. When it
//! finishes the host calls `Navigator::complete_effect` with the same ticket.

use crate::config::Effect;
use crate::content::ContentNode;
use crate::transition::TransitionTicket;
use serde::Serialize;

/// Which content an effect runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTarget {
    /// The content currently on the surface, about to leave.
    Outgoing,
    /// The content just inserted.
    Incoming,
}

/// The container the navigator keeps in sync with the top of the stack.
pub trait RenderSurface {
    /// Remove all content.
    fn clear(&mut self);

    /// Add content.
    fn insert(&mut self, content: ContentNode);

    /// The content currently shown, if any.
    fn current_content(&self) -> Option<&ContentNode>;

    /// Start an effect. Returns `false` if the surface cannot animate, in
    /// which case the navigator falls back to an immediate replace.
    fn play_effect(
        &mut self,
        _ticket: TransitionTicket,
        _target: EffectTarget,
        _effect: &Effect,
    ) -> bool {
        false
    }

    /// Stop a running effect. Its completion must not be reported afterwards
    /// (a late report is ignored anyway).
    fn cancel_effect(&mut self, _ticket: TransitionTicket) {}
}

// =============================================================================
// IN-MEMORY SURFACE
// =============================================================================

/// An effect request recorded by `MemorySurface`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayedEffect {
    pub ticket: TransitionTicket,
    pub target: EffectTarget,
    pub effect: Effect,
    /// Mount of the content the effect was played on.
    pub content_mount: Option<u64>,
}

/// Surface that keeps content in memory.
///
/// With animations enabled it accepts every effect and records it; the
/// owner reports completion. With animations disabled it refuses effects.
#[derive(Debug, Default)]
pub struct MemorySurface {
    children: Vec<ContentNode>,
    animations: bool,
    played: Vec<PlayedEffect>,
    cancelled: Vec<TransitionTicket>,
    clears: u32,
}

impl MemorySurface {
    /// A surface that refuses effects.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface that accepts effects.
    #[must_use]
    pub fn animated() -> Self {
        Self {
            animations: true,
            ..Self::default()
        }
    }

    /// All content currently held, in insertion order.
    #[must_use]
    pub fn children(&self) -> &[ContentNode] {
        &self.children
    }

    /// Effect requests accepted so far.
    #[must_use]
    pub fn played(&self) -> &[PlayedEffect] {
        &self.played
    }

    /// Most recent accepted effect request.
    #[must_use]
    pub fn last_played(&self) -> Option<&PlayedEffect> {
        self.played.last()
    }

    #[must_use]
    pub fn cancelled(&self) -> &[TransitionTicket] {
        &self.cancelled
    }

    /// Number of `clear` calls.
    #[must_use]
    pub fn clear_count(&self) -> u32 {
        self.clears
    }
}

impl RenderSurface for MemorySurface {
    fn clear(&mut self) {
        self.children.clear();
        self.clears = self.clears.saturating_add(1);
    }

    fn insert(&mut self, content: ContentNode) {
        self.children.push(content);
    }

    fn current_content(&self) -> Option<&ContentNode> {
        self.children.first()
    }

    fn play_effect(&mut self, ticket: TransitionTicket, target: EffectTarget, effect: &Effect) -> bool {
        if !self.animations {
            return false;
        }
        let content_mount = self.current_content().and_then(|c| c.mount).map(|m| m.0);
        self.played.push(PlayedEffect {
            ticket,
            target,
            effect: effect.clone(),
            content_mount,
        });
        true
    }

    fn cancel_effect(&mut self, ticket: TransitionTicket) {
        self.cancelled.push(ticket);
    }
}

// =============================================================================
// TESTS
// =============================================================================
