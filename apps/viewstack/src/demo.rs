//! # Built-in Controllers
//!
//! A small set of controllers registered under the `demo` namespace so graph
//! documents can be exercised from the command line without an embedding
//! application.

use viewstack_core::{
    ArgValue, Args, BoxError, ContentNode, Controller, FactoryRegistry, InflationContext,
    RenderContext,
};

/// Namespace the built-in controllers live in.
pub const DEMO_NAMESPACE: &str = "demo";

/// Title/body text screen. Args: `title`, `body`.
#[derive(Debug)]
pub struct TextController {
    title: String,
    body: Option<String>,
}

impl TextController {
    pub fn from_args(args: Option<&Args>) -> Self {
        Self {
            title: args
                .and_then(|a| a.text("title"))
                .unwrap_or("Untitled")
                .to_string(),
            body: args.and_then(|a| a.text("body")).map(str::to_string),
        }
    }
}

impl Controller for TextController {
    fn produce_content(&mut self, ctx: &InflationContext<'_>) -> ContentNode {
        let mut column = ContentNode::new("column")
            .with_attribute("destination", ctx.destination.0.to_string())
            .with_child(ContentNode::new("heading").with_text(self.title.clone()));
        if let Some(body) = &self.body {
            column = column.with_child(ContentNode::text(body.clone()));
        }
        column
    }

    fn on_attached(&mut self) {
        tracing::debug!(title = %self.title, "text screen attached");
    }
}

/// List screen. Args: `items` (list of values) or `count` (integer).
#[derive(Debug)]
pub struct ListController {
    items: Vec<String>,
}

impl ListController {
    pub fn from_args(args: Option<&Args>) -> Self {
        let items = match args.and_then(|a| a.get("items")) {
            Some(ArgValue::List(values)) => values.iter().map(describe).collect(),
            Some(other) => vec![describe(other)],
            None => {
                let count = args.and_then(|a| a.int("count")).unwrap_or(3).clamp(0, 100);
                (1..=count).map(|n| format!("item {}", n)).collect()
            }
        };
        Self { items }
    }
}

fn describe(value: &ArgValue) -> String {
    match value {
        ArgValue::Bool(b) => b.to_string(),
        ArgValue::Int(n) => n.to_string(),
        ArgValue::Text(s) => s.clone(),
        ArgValue::List(values) => values.iter().map(describe).collect::<Vec<_>>().join(","),
    }
}

impl Controller for ListController {
    fn produce_content(&mut self, _ctx: &InflationContext<'_>) -> ContentNode {
        self.items.iter().fold(
            ContentNode::new("list").with_attribute("rows", self.items.len().to_string()),
            |list, item| list.with_child(ContentNode::new("row").with_text(item.clone())),
        )
    }
}

/// Screen that counts how often it was shown.
#[derive(Debug, Default)]
pub struct VisitCounter {
    label: String,
    visits: u32,
}

impl Controller for VisitCounter {
    fn produce_content(&mut self, ctx: &InflationContext<'_>) -> ContentNode {
        self.label = format!("counter {}", ctx.mount.0);
        ContentNode::new("counter").with_text(self.label.clone())
    }

    fn on_created(&mut self) {
        tracing::debug!(label = %self.label, "counter created");
    }

    fn on_attached(&mut self) {
        self.visits = self.visits.saturating_add(1);
        tracing::info!(label = %self.label, visits = self.visits, "counter shown");
    }

    fn on_detached(&mut self) {
        tracing::debug!(label = %self.label, "counter hidden");
    }
}

fn failing_factory(
    _context: &RenderContext,
    args: Option<&Args>,
) -> Result<Box<dyn Controller>, BoxError> {
    let reason = args
        .and_then(|a| a.text("reason"))
        .unwrap_or("demo.Failing always fails");
    Err(reason.to_string().into())
}

/// Registry with every built-in controller.
pub fn builtin_registry() -> FactoryRegistry {
    let mut registry = FactoryRegistry::new();
    registry.register_fn("demo.Text", TextController::from_args);
    registry.register_fn("demo.List", ListController::from_args);
    registry.register_fn("demo.Counter", |_| VisitCounter::default());
    registry.register("demo.Failing", failing_factory);
    registry
}

// =============================================================================
// TESTS
// =============================================================================
