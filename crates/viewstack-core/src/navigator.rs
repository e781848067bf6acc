//! # Navigator
//!
//! Owns the back-stack and keeps the render surface in sync with its top.
//!
//! Invariants:
//! - The stack is never empty after the first successful `navigate`, and
//!   `pop` never removes the root entry.
//! - A push happens only after the controller was constructed, so a failing
//!   factory leaves everything untouched.
//! - At most one mount is attached at a time, and only while the surface is
//!   in the live window. Once settled, the surface holds exactly the top
//!   entry's root.
//! - Observers see exactly one notification per successful stack mutation.

use crate::args::Args;
use crate::config::{NavOptions, NavigatorConfig, TransitionConfig};
use crate::content::{ContentNode, MountId};
use crate::controller::{LifecycleState, Mount, RenderContext};
use crate::destination::{Destination, NavGraph};
use crate::error::NavError;
use crate::surface::{EffectTarget, RenderSurface};
use crate::transition::{Step, Transition, TransitionPhase, TransitionTicket};
use crate::{DestinationId, NavigationReason};

// =============================================================================
// OBSERVERS
// =============================================================================

/// Receives a callback after every successful stack mutation.
pub trait NavigationObserver {
    fn on_navigated(&mut self, destination: DestinationId, reason: NavigationReason);
}

impl<F> NavigationObserver for F
where
    F: FnMut(DestinationId, NavigationReason),
{
    fn on_navigated(&mut self, destination: DestinationId, reason: NavigationReason) {
        self(destination, reason);
    }
}

// =============================================================================
// STACK ENTRY
// =============================================================================

/// One back-stack entry: a destination id and its live controller.
#[derive(Debug)]
pub struct StackEntry {
    destination: DestinationId,
    name: String,
    mount: Mount,
}

impl StackEntry {
    #[must_use]
    pub fn destination(&self) -> DestinationId {
        self.destination
    }

    /// Qualified controller name the entry was built from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn mount_id(&self) -> MountId {
        self.mount.id()
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.mount.state()
    }

    #[must_use]
    pub fn attach_count(&self) -> u32 {
        self.mount.attach_count()
    }

    #[must_use]
    pub fn root(&self) -> &ContentNode {
        self.mount.root()
    }
}

// =============================================================================
// NAVIGATOR
// =============================================================================

/// The view-stack navigator.
pub struct Navigator<S: RenderSurface> {
    context: RenderContext,
    surface: S,
    config: NavigatorConfig,
    stack: Vec<StackEntry>,
    /// Popped mount whose root is still on the surface (exit effect running).
    retiring: Option<Mount>,
    in_flight: Option<Transition>,
    /// Whether the host currently has the surface in the live window.
    surface_live: bool,
    observers: Vec<Box<dyn NavigationObserver>>,
    next_mount: u64,
    next_ticket: u64,
}

impl<S: RenderSurface> std::fmt::Debug for Navigator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("stack", &self.stack)
            .field("retiring", &self.retiring)
            .field("in_flight", &self.in_flight)
            .field("surface_live", &self.surface_live)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<S: RenderSurface> Navigator<S> {
    /// Create a navigator with no effects configured.
    pub fn new(surface: S, context: RenderContext) -> Self {
        Self {
            context,
            surface,
            config: NavigatorConfig::default(),
            stack: Vec::new(),
            retiring: None,
            in_flight: None,
            surface_live: true,
            observers: Vec::new(),
            next_mount: 1,
            next_ticket: 1,
        }
    }

    /// Create a navigator using the transition defaults of a graph.
    pub fn for_graph(surface: S, context: RenderContext, graph: &NavGraph) -> Self {
        Self::new(surface, context).with_config(graph.config().clone())
    }

    #[must_use]
    pub fn with_config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn add_observer(&mut self, observer: impl NavigationObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // -------------------------------------------------------------------------
    // Stack operations
    // -------------------------------------------------------------------------

    /// Construct the destination's controller and push it.
    pub fn navigate(&mut self, destination: &Destination, args: Option<&Args>) -> Result<(), NavError> {
        self.navigate_with(destination, args, &NavOptions::default())
    }

    /// `navigate` with per-call transition overrides.
    pub fn navigate_with(
        &mut self,
        destination: &Destination,
        args: Option<&Args>,
        options: &NavOptions,
    ) -> Result<(), NavError> {
        let controller = destination
            .factory()
            .create(&self.context, args)
            .map_err(|source| {
                tracing::warn!(
                    destination = %destination.id(),
                    name = destination.name(),
                    error = %source,
                    "controller construction failed"
                );
                NavError::Construction {
                    destination: destination.id(),
                    name: destination.name().to_string(),
                    source,
                }
            })?;

        let mount_id = self.allocate_mount();
        let mount = Mount::build(mount_id, controller, &self.context, destination.id());
        self.stack.push(StackEntry {
            destination: destination.id(),
            name: destination.name().to_string(),
            mount,
        });

        tracing::debug!(
            destination = %destination.id(),
            mount = mount_id.0,
            depth = self.stack.len(),
            "pushed entry"
        );

        let transition = options
            .transition
            .clone()
            .unwrap_or_else(|| self.config.navigate.clone());
        self.show_top(&transition);
        self.notify(destination.id(), NavigationReason::Added);
        Ok(())
    }

    /// Navigate to a destination of `graph` by id.
    pub fn navigate_to(
        &mut self,
        graph: &NavGraph,
        id: DestinationId,
        args: Option<&Args>,
    ) -> Result<(), NavError> {
        let destination = graph.get(id)?;
        self.navigate(destination, args)
    }

    /// Push the graph's start destination onto an empty stack.
    pub fn start(&mut self, graph: &NavGraph, args: Option<&Args>) -> Result<(), NavError> {
        if !self.stack.is_empty() {
            return Err(NavError::NotEmpty {
                depth: self.stack.len(),
            });
        }
        let start = graph
            .start()
            .ok_or_else(|| NavError::InvalidGraph("graph has no start destination".into()))?;
        self.navigate_to(graph, start, args)
    }

    /// Pop the top entry. Returns `false` (and changes nothing) when only
    /// the root entry is left.
    pub fn pop(&mut self) -> bool {
        if self.stack.len() <= 1 {
            tracing::debug!(depth = self.stack.len(), "pop ignored at root");
            return false;
        }
        let Some(popped) = self.stack.pop() else {
            return false;
        };
        tracing::debug!(
            destination = %popped.destination,
            mount = popped.mount.id().0,
            depth = self.stack.len(),
            "popped entry"
        );
        self.retire(popped.mount);

        let transition = self.config.pop.clone();
        self.show_top(&transition);

        if let Some(top) = self.top() {
            self.notify(top, NavigationReason::Popped);
        }
        true
    }

    // -------------------------------------------------------------------------
    // Host signals
    // -------------------------------------------------------------------------

    /// Completion signal for an effect started through `play_effect`.
    ///
    /// Returns `false` for stale or unknown tickets, which change nothing.
    pub fn complete_effect(&mut self, ticket: TransitionTicket) -> bool {
        let Some(transition) = self.in_flight.as_mut() else {
            tracing::debug!(ticket = ticket.0, "completion with no transition in flight");
            return false;
        };

        match transition.advance(ticket) {
            None => {
                tracing::debug!(ticket = ticket.0, "stale transition ticket ignored");
                false
            }
            Some(Step::SwapAndEnter { incoming, enter }) => {
                if self.stack.last().map(StackEntry::mount_id) != Some(incoming) {
                    tracing::warn!(mount = incoming.0, "transition target is no longer on top");
                }
                self.replace_now();
                let enter_ticket = self.allocate_ticket();
                if self
                    .surface
                    .play_effect(enter_ticket, EffectTarget::Incoming, &enter)
                {
                    tracing::debug!(ticket = enter_ticket.0, effect = %enter.name, "enter effect running");
                    if let Some(transition) = self.in_flight.as_mut() {
                        transition.enter_with(enter_ticket);
                    }
                } else {
                    self.in_flight = None;
                }
                true
            }
            Some(Step::Settle) => {
                tracing::debug!(ticket = ticket.0, "transition settled");
                self.in_flight = None;
                true
            }
        }
    }

    /// The host removed the surface from the live window.
    ///
    /// Until `on_surface_attached`, new content is inserted without
    /// attaching its controller.
    pub fn on_surface_detached(&mut self) {
        self.surface_live = false;
        if let Some(mount) = self.shown_mount_mut() {
            mount.detach();
        }
    }

    /// The host put the surface back into the live window.
    pub fn on_surface_attached(&mut self) {
        self.surface_live = true;
        if let Some(mount) = self.shown_mount_mut() {
            mount.attach();
        }
    }

    /// Whether the surface is in the live window.
    #[must_use]
    pub fn is_surface_live(&self) -> bool {
        self.surface_live
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Stack size.
    #[must_use]
    pub fn current_depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn top(&self) -> Option<DestinationId> {
        self.stack.last().map(|e| e.destination)
    }

    /// Root content of the top entry.
    #[must_use]
    pub fn top_content(&self) -> Option<&ContentNode> {
        self.stack.last().map(StackEntry::root)
    }

    /// Destination ids from bottom to top.
    #[must_use]
    pub fn back_stack(&self) -> Vec<DestinationId> {
        self.stack.iter().map(|e| e.destination).collect()
    }

    #[must_use]
    pub fn entries(&self) -> &[StackEntry] {
        &self.stack
    }

    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        match &self.in_flight {
            Some(t) => t.phase(),
            None if self.stack.is_empty() => TransitionPhase::Idle,
            None => TransitionPhase::Settled,
        }
    }

    /// Ticket of the transition in flight, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<TransitionTicket> {
        self.in_flight.as_ref().map(Transition::ticket)
    }

    /// Whether the surface currently shows exactly the top entry's root.
    #[must_use]
    pub fn is_synchronized(&self) -> bool {
        match (self.stack.last(), self.surface.current_content()) {
            (Some(top), Some(shown)) => shown.is_root_of(top.mount_id()),
            (None, None) => true,
            _ => false,
        }
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    // -------------------------------------------------------------------------
    // Display
    // -------------------------------------------------------------------------

    /// Bring the surface to the top entry, animated when possible.
    fn show_top(&mut self, transition: &TransitionConfig) {
        let Some(incoming) = self.stack.last().map(StackEntry::mount_id) else {
            return;
        };

        if let Some(superseded) = self.in_flight.take() {
            tracing::debug!(
                ticket = superseded.ticket().0,
                phase = ?superseded.phase(),
                "superseding transition in flight"
            );
            self.surface.cancel_effect(superseded.ticket());
        }

        if self
            .surface
            .current_content()
            .is_some_and(|c| c.is_root_of(incoming))
        {
            self.release_retiring();
            if self.surface_live {
                if let Some(top) = self.stack.last_mut() {
                    top.mount.attach();
                }
            }
            return;
        }

        if let Some((enter, exit)) = transition.pair() {
            if self.surface.current_content().is_some() {
                let ticket = self.allocate_ticket();
                if self.surface.play_effect(ticket, EffectTarget::Outgoing, exit) {
                    tracing::debug!(
                        ticket = ticket.0,
                        mount = incoming.0,
                        effect = %exit.name,
                        "exit effect running"
                    );
                    self.in_flight = Some(Transition::begin(ticket, incoming, enter.clone()));
                    return;
                }
                tracing::debug!(ticket = ticket.0, "surface declined effect, replacing immediately");
            }
        }

        self.replace_now();
    }

    /// Clear the surface and insert the top entry's root.
    fn replace_now(&mut self) {
        self.release_retiring();
        let Some((top, below)) = self.stack.split_last_mut() else {
            return;
        };
        for entry in below.iter_mut() {
            entry.mount.detach();
        }
        self.surface.clear();
        self.surface.insert(top.mount.root().clone());
        if self.surface_live {
            top.mount.attach();
        }
        tracing::debug!(
            destination = %top.destination,
            mount = top.mount.id().0,
            "surface replaced"
        );
    }

    /// Keep a popped mount alive while its root may still be shown.
    fn retire(&mut self, mut mount: Mount) {
        let shown = self
            .surface
            .current_content()
            .is_some_and(|c| c.is_root_of(mount.id()));
        if shown {
            if let Some(mut previous) = self.retiring.replace(mount) {
                previous.detach();
            }
        } else {
            mount.detach();
        }
    }

    /// The mount whose root the surface currently shows, on the stack or
    /// retiring.
    fn shown_mount_mut(&mut self) -> Option<&mut Mount> {
        let shown = self.surface.current_content().and_then(|c| c.mount)?;
        if let Some(mount) = self.retiring.as_mut().filter(|m| m.id() == shown) {
            return Some(mount);
        }
        self.stack
            .iter_mut()
            .map(|e| &mut e.mount)
            .find(|m| m.id() == shown)
    }

    fn release_retiring(&mut self) {
        if let Some(mut mount) = self.retiring.take() {
            mount.detach();
        }
    }

    fn notify(&mut self, destination: DestinationId, reason: NavigationReason) {
        tracing::debug!(destination = %destination, reason = %reason, "navigated");
        for observer in &mut self.observers {
            observer.on_navigated(destination, reason);
        }
    }

    fn allocate_mount(&mut self) -> MountId {
        let id = MountId(self.next_mount);
        self.next_mount = self.next_mount.saturating_add(1);
        id
    }

    fn allocate_ticket(&mut self) -> TransitionTicket {
        let ticket = TransitionTicket(self.next_ticket);
        self.next_ticket = self.next_ticket.saturating_add(1);
        ticket
    }
}

impl<S: RenderSurface> Drop for Navigator<S> {
    fn drop(&mut self) {
        self.release_retiring();
        for entry in &mut self.stack {
            entry.mount.detach();
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Effect;
    use crate::controller::{BoxError, Controller, InflationContext};
    use crate::surface::MemorySurface;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Screen {
        title: String,
        log: Log,
    }

    impl Controller for Screen {
        fn produce_content(&mut self, _ctx: &InflationContext<'_>) -> ContentNode {
            self.log.borrow_mut().push(format!("{}:produce", self.title));
            ContentNode::text(self.title.clone())
        }

        fn on_created(&mut self) {
            self.log.borrow_mut().push(format!("{}:created", self.title));
        }

        fn on_attached(&mut self) {
            self.log.borrow_mut().push(format!("{}:attached", self.title));
        }

        fn on_detached(&mut self) {
            self.log.borrow_mut().push(format!("{}:detached", self.title));
        }
    }

    fn screen(id: u64, title: &'static str, log: &Log) -> Destination {
        let log = Rc::clone(log);
        Destination::with_factory(
            DestinationId(id),
            format!("test.{}", title),
            move |_: &RenderContext, _: Option<&Args>| -> Result<Box<dyn Controller>, BoxError> {
                Ok(Box::new(Screen {
                    title: title.to_string(),
                    log: Rc::clone(&log),
                }))
            },
        )
    }

    fn broken(id: u64) -> Destination {
        Destination::with_factory(
            DestinationId(id),
            "test.Broken",
            |_: &RenderContext, _: Option<&Args>| -> Result<Box<dyn Controller>, BoxError> {
                Err("constructor exploded".into())
            },
        )
    }

    fn shown_text<S: RenderSurface>(nav: &Navigator<S>) -> Option<String> {
        nav.surface()
            .current_content()
            .and_then(|root| root.children.first())
            .and_then(|c| c.text.clone())
    }

    type Events = Rc<RefCell<Vec<(DestinationId, NavigationReason)>>>;

    fn observed<S: RenderSurface>(nav: &mut Navigator<S>) -> Events {
        let events: Events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        nav.add_observer(move |id, reason| sink.borrow_mut().push((id, reason)));
        events
    }

    fn animated_config() -> NavigatorConfig {
        NavigatorConfig::symmetric(TransitionConfig::new(
            Effect::new("slide-in", 100),
            Effect::new("slide-out", 100),
        ))
    }

    #[test]
    fn push_then_pop_scenario() {
        let log = Log::default();
        let (a, b) = (screen(1, "A", &log), screen(2, "B", &log));
        let mut nav = Navigator::new(MemorySurface::new(), RenderContext::default());
        let events = observed(&mut nav);

        assert!(nav.navigate(&a, None).is_ok());
        assert_eq!(nav.current_depth(), 1);

        assert!(nav.navigate(&b, None).is_ok());
        assert_eq!(nav.current_depth(), 2);
        assert_eq!(shown_text(&nav).as_deref(), Some("B"));
        assert!(nav.is_synchronized());

        assert!(nav.pop());
        assert_eq!(nav.current_depth(), 1);
        assert_eq!(shown_text(&nav).as_deref(), Some("A"));

        assert!(!nav.pop());
        assert_eq!(nav.current_depth(), 1);
        assert_eq!(shown_text(&nav).as_deref(), Some("A"));

        assert_eq!(
            *events.borrow(),
            vec![
                (DestinationId(1), NavigationReason::Added),
                (DestinationId(2), NavigationReason::Added),
                (DestinationId(1), NavigationReason::Popped),
            ]
        );
    }

    #[test]
    fn failed_construction_changes_nothing() {
        let log = Log::default();
        let mut nav = Navigator::new(MemorySurface::new(), RenderContext::default());
        assert!(nav.navigate(&screen(1, "A", &log), None).is_ok());
        let events = observed(&mut nav);

        let err = nav.navigate(&broken(3), None).err();

        assert!(matches!(
            err,
            Some(NavError::Construction { destination: DestinationId(3), .. })
        ));
        assert_eq!(nav.current_depth(), 1);
        assert_eq!(shown_text(&nav).as_deref(), Some("A"));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn lifecycle_hooks_follow_the_surface() {
        let log = Log::default();
        let (a, b) = (screen(1, "A", &log), screen(2, "B", &log));
        let mut nav = Navigator::new(MemorySurface::new(), RenderContext::default());

        assert!(nav.navigate(&a, None).is_ok());
        assert!(nav.navigate(&b, None).is_ok());
        assert!(nav.pop());

        assert_eq!(
            *log.borrow(),
            vec![
                "A:produce",
                "A:created",
                "A:attached",
                "B:produce",
                "B:created",
                "A:detached",
                "B:attached",
                "B:detached",
                "A:attached",
            ]
        );
        assert_eq!(nav.entries().first().map(StackEntry::attach_count), Some(2));
    }

    #[test]
    fn revisiting_a_destination_creates_a_new_instance() {
        let log = Log::default();
        let a = screen(1, "A", &log);
        let mut nav = Navigator::new(MemorySurface::new(), RenderContext::default());

        assert!(nav.navigate(&a, None).is_ok());
        assert!(nav.navigate(&a, None).is_ok());

        assert_eq!(nav.back_stack(), vec![DestinationId(1), DestinationId(1)]);
        let mounts: Vec<_> = nav.entries().iter().map(StackEntry::mount_id).collect();
        assert_ne!(mounts[0], mounts[1]);
        assert_eq!(log.borrow().iter().filter(|l| *l == "A:produce").count(), 2);
    }

    #[test]
    fn first_navigate_is_immediate_even_with_effects() {
        let log = Log::default();
        let mut nav = Navigator::new(MemorySurface::animated(), RenderContext::default())
            .with_config(animated_config());

        assert!(nav.navigate(&screen(1, "A", &log), None).is_ok());

        assert!(nav.surface().played().is_empty());
        assert_eq!(nav.phase(), TransitionPhase::Settled);
        assert!(nav.is_synchronized());
    }

    #[test]
    fn animated_navigate_runs_exit_then_enter() {
        let log = Log::default();
        let mut nav = Navigator::new(MemorySurface::animated(), RenderContext::default())
            .with_config(animated_config());
        assert!(nav.navigate(&screen(1, "A", &log), None).is_ok());
        assert!(nav.navigate(&screen(2, "B", &log), None).is_ok());

        // Stack mutates immediately; the surface still shows A during exit.
        assert_eq!(nav.current_depth(), 2);
        assert_eq!(nav.phase(), TransitionPhase::ExitRunning);
        assert_eq!(shown_text(&nav).as_deref(), Some("A"));
        let exit = nav.surface().last_played().cloned();
        assert_eq!(exit.as_ref().map(|p| p.target), Some(EffectTarget::Outgoing));

        let exit_ticket = nav.in_flight().unwrap_or(TransitionTicket(0));
        assert!(nav.complete_effect(exit_ticket));
        assert_eq!(nav.phase(), TransitionPhase::EnterRunning);
        assert_eq!(shown_text(&nav).as_deref(), Some("B"));
        assert_eq!(nav.surface().children().len(), 1);
        let enter = nav.surface().last_played().cloned();
        assert_eq!(enter.as_ref().map(|p| p.target), Some(EffectTarget::Incoming));

        let enter_ticket = nav.in_flight().unwrap_or(TransitionTicket(0));
        assert_ne!(enter_ticket, exit_ticket);
        assert_eq!(enter.map(|p| p.ticket), Some(enter_ticket));

        assert!(nav.complete_effect(enter_ticket));
        assert_eq!(nav.phase(), TransitionPhase::Settled);
        assert!(nav.is_synchronized());
        assert!(!nav.complete_effect(enter_ticket));
    }

    #[test]
    fn effects_fall_back_to_immediate_on_plain_surface() {
        let log = Log::default();
        let mut nav = Navigator::new(MemorySurface::new(), RenderContext::default())
            .with_config(animated_config());
        assert!(nav.navigate(&screen(1, "A", &log), None).is_ok());
        assert!(nav.navigate(&screen(2, "B", &log), None).is_ok());

        assert_eq!(nav.phase(), TransitionPhase::Settled);
        assert_eq!(shown_text(&nav).as_deref(), Some("B"));
    }

    #[test]
    fn per_call_options_override_defaults() {
        let log = Log::default();
        let mut nav = Navigator::new(MemorySurface::animated(), RenderContext::default())
            .with_config(animated_config());
        assert!(nav.navigate(&screen(1, "A", &log), None).is_ok());

        let result = nav.navigate_with(&screen(2, "B", &log), None, &NavOptions::immediate());

        assert!(result.is_ok());
        assert!(nav.surface().played().is_empty());
        assert!(nav.is_synchronized());
    }

    #[test]
    fn new_navigation_supersedes_transition_in_flight() {
        let log = Log::default();
        let mut nav = Navigator::new(MemorySurface::animated(), RenderContext::default())
            .with_config(animated_config());
        assert!(nav.navigate(&screen(1, "A", &log), None).is_ok());
        assert!(nav.navigate(&screen(2, "B", &log), None).is_ok());
        let first = nav.in_flight().unwrap_or(TransitionTicket(0));

        assert!(nav.navigate(&screen(3, "C", &log), None).is_ok());
        let second = nav.in_flight().unwrap_or(TransitionTicket(0));

        assert_ne!(first, second);
        assert_eq!(nav.surface().cancelled(), &[first]);
        assert!(!nav.complete_effect(first));

        assert!(nav.complete_effect(second));
        let enter = nav.in_flight().unwrap_or(TransitionTicket(0));
        assert!(nav.complete_effect(enter));
        assert_eq!(shown_text(&nav).as_deref(), Some("C"));
        assert!(nav.is_synchronized());
        assert!(!log.borrow().iter().any(|l| l == "B:attached"));
    }

    #[test]
    fn pop_during_exit_returns_to_displayed_entry() {
        let log = Log::default();
        let mut nav = Navigator::new(MemorySurface::animated(), RenderContext::default())
            .with_config(animated_config());
        assert!(nav.navigate(&screen(1, "A", &log), None).is_ok());
        assert!(nav.navigate(&screen(2, "B", &log), None).is_ok());
        assert_eq!(nav.phase(), TransitionPhase::ExitRunning);

        assert!(nav.pop());

        // A never left the surface, so nothing needs to animate.
        assert_eq!(nav.phase(), TransitionPhase::Settled);
        assert!(nav.in_flight().is_none());
        assert_eq!(shown_text(&nav).as_deref(), Some("A"));
        assert!(nav.is_synchronized());
    }

    #[test]
    fn animated_pop_keeps_outgoing_until_exit_completes() {
        let log = Log::default();
        let mut nav = Navigator::new(MemorySurface::animated(), RenderContext::default())
            .with_config(animated_config());
        assert!(nav
            .navigate_with(&screen(1, "A", &log), None, &NavOptions::immediate())
            .is_ok());
        assert!(nav
            .navigate_with(&screen(2, "B", &log), None, &NavOptions::immediate())
            .is_ok());

        assert!(nav.pop());
        assert_eq!(nav.current_depth(), 1);
        assert_eq!(shown_text(&nav).as_deref(), Some("B"));
        assert!(!log.borrow().iter().any(|l| l == "B:detached"));

        let ticket = nav.in_flight().unwrap_or(TransitionTicket(0));
        assert!(nav.complete_effect(ticket));
        assert_eq!(shown_text(&nav).as_deref(), Some("A"));
        assert!(log.borrow().iter().any(|l| l == "B:detached"));
    }

    #[test]
    fn surface_reattach_fires_on_attached_again() {
        let log = Log::default();
        let mut nav = Navigator::new(MemorySurface::new(), RenderContext::default());
        assert!(nav.navigate(&screen(1, "A", &log), None).is_ok());

        nav.on_surface_detached();
        nav.on_surface_attached();

        assert_eq!(nav.entries().first().map(StackEntry::attach_count), Some(2));
        assert_eq!(
            nav.entries().first().map(StackEntry::state),
            Some(LifecycleState::Attached)
        );
    }

    #[test]
    fn late_exit_signal_does_not_end_enter_effect() {
        let log = Log::default();
        let mut nav = Navigator::new(MemorySurface::animated(), RenderContext::default())
            .with_config(animated_config());
        assert!(nav.navigate(&screen(1, "A", &log), None).is_ok());
        assert!(nav.navigate(&screen(2, "B", &log), None).is_ok());
        let exit_ticket = nav.in_flight().unwrap_or(TransitionTicket(0));
        assert!(nav.complete_effect(exit_ticket));

        // A timer for the exit effect firing after the swap is stale.
        assert!(!nav.complete_effect(exit_ticket));
        assert_eq!(nav.phase(), TransitionPhase::EnterRunning);
    }

    #[test]
    fn navigate_while_off_window_defers_attach() {
        let log = Log::default();
        let mut nav = Navigator::new(MemorySurface::new(), RenderContext::default());
        assert!(nav.navigate(&screen(1, "A", &log), None).is_ok());

        nav.on_surface_detached();
        assert!(!nav.is_surface_live());
        assert!(nav.navigate(&screen(2, "B", &log), None).is_ok());

        assert_eq!(shown_text(&nav).as_deref(), Some("B"));
        assert_eq!(
            nav.entries().last().map(StackEntry::state),
            Some(LifecycleState::Created)
        );
        assert!(!log.borrow().iter().any(|l| l == "B:attached"));

        nav.on_surface_attached();
        assert_eq!(
            nav.entries().last().map(StackEntry::state),
            Some(LifecycleState::Attached)
        );
        assert_eq!(nav.entries().last().map(StackEntry::attach_count), Some(1));
        assert_eq!(
            nav.entries().first().map(StackEntry::state),
            Some(LifecycleState::Detached)
        );
    }

    #[test]
    fn pop_while_off_window_attaches_on_return() {
        let log = Log::default();
        let mut nav = Navigator::new(MemorySurface::new(), RenderContext::default());
        assert!(nav.navigate(&screen(1, "A", &log), None).is_ok());
        assert!(nav.navigate(&screen(2, "B", &log), None).is_ok());

        nav.on_surface_detached();
        assert!(nav.pop());
        assert_eq!(nav.entries().first().map(StackEntry::attach_count), Some(1));

        nav.on_surface_attached();
        assert_eq!(nav.entries().first().map(StackEntry::attach_count), Some(2));
        assert_eq!(log.borrow().last().map(String::as_str), Some("A:attached"));
    }

    #[test]
    fn surface_detach_during_pop_exit_reaches_outgoing_controller() {
        let log = Log::default();
        let mut nav = Navigator::new(MemorySurface::animated(), RenderContext::default())
            .with_config(animated_config());
        assert!(nav
            .navigate_with(&screen(1, "A", &log), None, &NavOptions::immediate())
            .is_ok());
        assert!(nav
            .navigate_with(&screen(2, "B", &log), None, &NavOptions::immediate())
            .is_ok());
        assert!(nav.pop());
        log.borrow_mut().clear();

        nav.on_surface_detached();
        assert_eq!(*log.borrow(), vec!["B:detached"]);

        nav.on_surface_attached();
        assert_eq!(*log.borrow(), vec!["B:detached", "B:attached"]);

        // The swap retires B and shows A.
        let ticket = nav.in_flight().unwrap_or(TransitionTicket(0));
        assert!(nav.complete_effect(ticket));
        assert_eq!(
            *log.borrow(),
            vec!["B:detached", "B:attached", "B:detached", "A:attached"]
        );
    }

    #[test]
    fn start_requires_an_empty_stack() {
        let log = Log::default();
        let mut registry = crate::FactoryRegistry::new();
        let shared = Rc::clone(&log);
        registry.register_fn("test.Home", move |_| Screen {
            title: "Home".into(),
            log: Rc::clone(&shared),
        });
        let json = r#"{ "start": 1, "destinations": [ { "id": 1, "name": "test.Home" } ] }"#;
        let graph = NavGraph::from_json(json, &registry, &RenderContext::default())
            .expect("graph should build");

        let mut nav = Navigator::for_graph(MemorySurface::new(), RenderContext::default(), &graph);
        assert!(nav.start(&graph, None).is_ok());
        assert_eq!(nav.top(), Some(DestinationId(1)));

        let err = nav.start(&graph, None).err();
        assert!(matches!(err, Some(NavError::NotEmpty { depth: 1 })));
    }

    #[test]
    fn navigate_to_unknown_id_is_configuration_error() {
        let graph = NavGraph::from_json(
            r#"{ "destinations": [] }"#,
            &crate::FactoryRegistry::new(),
            &RenderContext::default(),
        )
        .expect("graph should build");
        let mut nav = Navigator::new(MemorySurface::new(), RenderContext::default());

        let err = nav.navigate_to(&graph, DestinationId(4), None).err();
        assert!(err.as_ref().is_some_and(NavError::is_configuration));
        assert_eq!(nav.current_depth(), 0);
    }
}
