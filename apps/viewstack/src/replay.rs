//! # Script Replay
//!
//! Drives one navigator over the in-memory surface from a parsed script and
//! records what happened after every line.
//!
//! Two drivers share the same step logic:
//! - `run_sync` applies lines back to back; effects complete only on a
//!   `complete` line, or after every line with `auto_complete`.
//! - `run_timed` issues one line per tick on a current-thread tokio runtime
//!   while timer tasks report effect completions over a channel, so a line
//!   can land while a transition is still running.

use crate::error::CliError;
use crate::script::{Command, ScriptLine, Target};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc;
use viewstack_core::{
    DestinationId, MemorySurface, NavGraph, NavigationReason, Navigator, RenderContext, RenderSurface,
    TransitionPhase, TransitionTicket,
};

// =============================================================================
// OPTIONS AND REPORT
// =============================================================================

/// Replay behaviour switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayOptions {
    /// Record navigation errors and continue instead of aborting.
    pub keep_going: bool,
    /// Deliver all pending effect completions after every line.
    pub auto_complete: bool,
    /// Run on a timer: one line per `step`, effects take their duration.
    pub timed: Option<Duration>,
}

/// Result of one script line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    Popped { popped: bool },
    Completed { accepted: bool },
    Failed { error: String },
}

/// Navigator state after one script line.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub line: usize,
    pub command: Command,
    pub outcome: Outcome,
    pub depth: usize,
    pub back_stack: Vec<u64>,
    pub phase: TransitionPhase,
    pub shown_mount: Option<u64>,
    pub synchronized: bool,
}

/// One observer notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub destination: u64,
    pub reason: NavigationReason,
}

/// Everything a replay produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepRecord>,
    pub events: Vec<EventRecord>,
    pub effects_played: usize,
    pub final_depth: usize,
    pub final_outline: Option<String>,
}

impl ReplayReport {
    /// Human-readable summary.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            let stack = step
                .back_stack
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(" > ");
            let outcome = match &step.outcome {
                Outcome::Applied => "ok".to_string(),
                Outcome::Popped { popped } => format!("popped={}", popped),
                Outcome::Completed { accepted } => format!("accepted={}", accepted),
                Outcome::Failed { error } => format!("FAILED: {}", error),
            };
            out.push_str(&format!(
                "{:>4}  {:<10} {:<24} depth={} [{}] {:?}\n",
                step.line,
                command_name(&step.command),
                outcome,
                step.depth,
                stack,
                step.phase
            ));
        }
        out.push_str(&format!(
            "events: {}  effects: {}  final depth: {}\n",
            self.events.len(),
            self.effects_played,
            self.final_depth
        ));
        if let Some(outline) = &self.final_outline {
            out.push_str("surface:\n");
            out.push_str(outline);
        }
        out
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Start => "start",
        Command::Navigate { .. } => "navigate",
        Command::Pop => "pop",
        Command::Complete => "complete",
        Command::Detach => "detach",
        Command::Attach => "attach",
    }
}

// =============================================================================
// SESSION
// =============================================================================

type EventLog = Rc<RefCell<Vec<EventRecord>>>;

/// A navigator bound to a graph, with its observer log.
pub struct Replay<'g> {
    graph: &'g NavGraph,
    nav: Navigator<MemorySurface>,
    events: EventLog,
    steps: Vec<StepRecord>,
    keep_going: bool,
}

impl<'g> Replay<'g> {
    pub fn new(graph: &'g NavGraph, context: RenderContext, animated: bool, keep_going: bool) -> Self {
        let surface = if animated {
            MemorySurface::animated()
        } else {
            MemorySurface::new()
        };
        let mut nav = Navigator::for_graph(surface, context, graph);
        let events: EventLog = Rc::default();
        let sink = Rc::clone(&events);
        nav.add_observer(move |id: DestinationId, reason| {
            sink.borrow_mut().push(EventRecord {
                destination: id.0,
                reason,
            });
        });
        Self {
            graph,
            nav,
            events,
            steps: Vec::new(),
            keep_going,
        }
    }

    /// Apply one line and record the resulting state.
    pub fn step(&mut self, line: &ScriptLine) -> Result<(), CliError> {
        let outcome = match self.apply(line) {
            Ok(outcome) => outcome,
            Err(CliError::Nav(err)) if self.keep_going => {
                tracing::warn!(line = line.line, error = %err, "navigation failed, continuing");
                Outcome::Failed {
                    error: err.to_string(),
                }
            }
            Err(err) => return Err(err),
        };

        let record = StepRecord {
            line: line.line,
            command: line.command.clone(),
            outcome,
            depth: self.nav.current_depth(),
            back_stack: self.nav.back_stack().iter().map(|d| d.0).collect(),
            phase: self.nav.phase(),
            shown_mount: self
                .nav
                .surface()
                .current_content()
                .and_then(|c| c.mount)
                .map(|m| m.0),
            synchronized: self.nav.is_synchronized(),
        };
        tracing::debug!(line = record.line, depth = record.depth, phase = ?record.phase, "step applied");
        self.steps.push(record);
        Ok(())
    }

    fn apply(&mut self, line: &ScriptLine) -> Result<Outcome, CliError> {
        match &line.command {
            Command::Start => {
                self.nav.start(self.graph, None)?;
                Ok(Outcome::Applied)
            }
            Command::Navigate { target, args } => {
                let id = match target {
                    Target::Id(id) => DestinationId(*id),
                    Target::Label(label) => self
                        .graph
                        .by_label(label)
                        .map(|d| d.id())
                        .ok_or_else(|| CliError::script(line.line, format!("no destination labelled `{}`", label)))?,
                };
                let args = (!args.is_empty()).then_some(args);
                self.nav.navigate_to(self.graph, id, args)?;
                Ok(Outcome::Applied)
            }
            Command::Pop => Ok(Outcome::Popped {
                popped: self.nav.pop(),
            }),
            Command::Complete => {
                let accepted = self
                    .nav
                    .in_flight()
                    .is_some_and(|ticket| self.nav.complete_effect(ticket));
                Ok(Outcome::Completed { accepted })
            }
            Command::Detach => {
                self.nav.on_surface_detached();
                Ok(Outcome::Applied)
            }
            Command::Attach => {
                self.nav.on_surface_attached();
                Ok(Outcome::Applied)
            }
        }
    }

    /// Deliver completions until nothing is in flight.
    pub fn drain(&mut self) {
        while let Some(ticket) = self.nav.in_flight() {
            if !self.nav.complete_effect(ticket) {
                break;
            }
        }
    }

    pub fn finish(self) -> ReplayReport {
        let events = self.events.borrow().clone();
        ReplayReport {
            effects_played: self.nav.surface().played().len(),
            final_depth: self.nav.current_depth(),
            final_outline: self.nav.surface().current_content().map(|c| c.outline()),
            steps: self.steps,
            events,
        }
    }
}

// =============================================================================
// DRIVERS
// =============================================================================

/// Apply every line immediately.
pub fn run_sync(
    graph: &NavGraph,
    context: RenderContext,
    lines: &[ScriptLine],
    options: ReplayOptions,
) -> Result<ReplayReport, CliError> {
    let mut replay = Replay::new(graph, context, graph.config().has_effects(), options.keep_going);
    for line in lines {
        replay.step(line)?;
        if options.auto_complete {
            replay.drain();
        }
    }
    Ok(replay.finish())
}

/// Apply one line per `step` while effects complete on their own timers.
pub fn run_timed(
    graph: &NavGraph,
    context: RenderContext,
    lines: &[ScriptLine],
    options: ReplayOptions,
    step: Duration,
) -> Result<ReplayReport, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    runtime.block_on(async {
        let mut replay = Replay::new(graph, context, true, options.keep_going);
        let (tx, mut rx) = mpsc::unbounded_channel::<TransitionTicket>();
        let mut interval = tokio::time::interval(step);
        let mut remaining = lines.iter().peekable();
        let mut scheduled = 0usize;

        loop {
            let more = remaining.peek().is_some();
            if !more && replay.nav.in_flight().is_none() {
                break;
            }

            tokio::select! {
                Some(ticket) = rx.recv() => {
                    let accepted = replay.nav.complete_effect(ticket);
                    tracing::debug!(ticket = ticket.0, accepted, "effect finished");
                }
                _ = interval.tick(), if more => {
                    if let Some(line) = remaining.next() {
                        replay.step(line)?;
                    }
                }
            }

            scheduled = schedule_completions(&replay.nav, scheduled, &tx);
        }

        Ok::<_, CliError>(replay.finish())
    })
}

/// Spawn a timer for every effect the surface accepted since `from`.
fn schedule_completions(
    nav: &Navigator<MemorySurface>,
    from: usize,
    tx: &mpsc::UnboundedSender<TransitionTicket>,
) -> usize {
    let played = nav.surface().played();
    for effect in played.iter().skip(from) {
        let ticket = effect.ticket;
        let delay = Duration::from_millis(u64::from(effect.effect.duration_ms));
        let tx = tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the replay already finished.
            let _ = tx.send(ticket);
        });
    }
    played.len()
}

// =============================================================================
// TESTS
// =============================================================================
