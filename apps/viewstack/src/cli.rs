//! # CLI Commands
//!
//! One function per subcommand. Each returns its result as a value and
//! prints it, so integration tests can inspect what the binary would show.

use crate::demo::builtin_registry;
use crate::error::{read_file, CliError};
use crate::replay::{run_sync, run_timed, ReplayOptions, ReplayReport};
use crate::script::parse_script;
use serde::Serialize;
use std::path::Path;
use viewstack_core::{FactoryRegistry, GraphDefinition, NavGraph, NavigatorConfig, RenderContext};

// =============================================================================
// GRAPH LOADING
// =============================================================================

/// Overrides applied to a graph document before it is resolved.
#[derive(Debug, Clone, Default)]
pub struct GraphOptions {
    /// Namespace that `.Name` controller references expand into.
    pub namespace: String,
    /// Drop every configured effect.
    pub no_effects: bool,
    /// Replace the duration of every configured effect.
    pub effect_ms: Option<u32>,
}

impl GraphOptions {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn context(&self) -> RenderContext {
        RenderContext::new(self.namespace.clone())
    }
}

/// Read a graph document, apply overrides, and resolve it.
pub fn load_graph(
    path: &Path,
    registry: &FactoryRegistry,
    options: &GraphOptions,
) -> Result<NavGraph, CliError> {
    let text = read_file(path)?;
    let mut definition = GraphDefinition::from_json(&text)?;

    if options.no_effects {
        definition.transitions = NavigatorConfig::default();
    } else if let Some(ms) = options.effect_ms {
        let transitions = &mut definition.transitions;
        for transition in [&mut transitions.navigate, &mut transitions.pop] {
            for effect in [&mut transition.enter, &mut transition.exit]
                .into_iter()
                .flatten()
            {
                effect.duration_ms = ms;
            }
        }
    }

    let graph = NavGraph::build(&definition, registry, &options.context())?;
    tracing::info!(path = %path.display(), destinations = graph.len(), "graph loaded");
    Ok(graph)
}

// =============================================================================
// CHECK
// =============================================================================

/// One resolved destination, as reported by `check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationSummary {
    pub id: u64,
    pub label: Option<String>,
    pub controller: String,
}

/// What `check` reports about a graph.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSummary {
    pub start: Option<u64>,
    pub destinations: Vec<DestinationSummary>,
    pub animated: bool,
    pub transitions: NavigatorConfig,
}

/// Validate a graph document against the built-in controllers.
pub fn cmd_check(graph_path: &Path, options: &GraphOptions, json: bool) -> Result<GraphSummary, CliError> {
    let graph = load_graph(graph_path, &builtin_registry(), options)?;

    let summary = GraphSummary {
        start: graph.start().map(|id| id.0),
        destinations: graph
            .destinations()
            .map(|d| DestinationSummary {
                id: d.id().0,
                label: d.label().map(str::to_string),
                controller: d.name().to_string(),
            })
            .collect(),
        animated: graph.config().has_effects(),
        transitions: graph.config().clone(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Graph OK: {} destination(s)", summary.destinations.len());
        match summary.start {
            Some(start) => println!("  start:    {}", start),
            None => println!("  start:    (none)"),
        }
        println!("  effects:  {}", if summary.animated { "yes" } else { "no" });
        for d in &summary.destinations {
            println!(
                "  {:>4}  {:<16} {}",
                d.id,
                d.label.as_deref().unwrap_or("-"),
                d.controller
            );
        }
    }

    Ok(summary)
}

// =============================================================================
// LIST
// =============================================================================

/// List the built-in controller names.
pub fn cmd_list(json: bool) -> Result<Vec<String>, CliError> {
    let registry = builtin_registry();
    let names: Vec<String> = registry.names().map(str::to_string).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        for name in &names {
            println!("{}", name);
        }
    }

    Ok(names)
}

// =============================================================================
// REPLAY
// =============================================================================

/// Replay a script against a graph and print the report.
pub fn cmd_replay(
    graph_path: &Path,
    script_path: &Path,
    options: &GraphOptions,
    replay: ReplayOptions,
    json: bool,
) -> Result<ReplayReport, CliError> {
    let graph = load_graph(graph_path, &builtin_registry(), options)?;
    let lines = parse_script(&read_file(script_path)?)?;
    tracing::info!(lines = lines.len(), timed = replay.timed.is_some(), "replaying script");

    let report = match replay.timed {
        Some(step) => run_timed(&graph, options.context(), &lines, replay, step)?,
        None => run_sync(&graph, options.context(), &lines, replay)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_text());
    }

    Ok(report)
}
