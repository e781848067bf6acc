//! # Controllers
//!
//! The displayable unit of the view stack and its lifecycle.
//!
//! A controller is supplied by the embedding application and only has to
//! implement the capability set below. The navigator never sees concrete
//! controller types: it asks a `ControllerFactory` for a boxed instance,
//! wraps it in a `Mount`, and drives the lifecycle through the mount.
//!
//! Lifecycle of one mount:
//!
//! ```text
//! create ──► produce_content ──► on_created ──► on_attached ⇄ on_detached ──► drop
//! ```

use crate::args::Args;
use crate::content::{ContentNode, MountId};
use crate::DestinationId;

/// Error type returned by controller factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// =============================================================================
// CONTEXTS
// =============================================================================

/// Host-provided rendering context passed to every factory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    /// Namespace prepended to relative controller names (`.Inbox`).
    pub namespace: String,
}

impl RenderContext {
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Expand a relative controller name against the namespace.
    ///
    /// `".Inbox"` in namespace `mail` becomes `"mail.Inbox"`; absolute
    /// names are returned unchanged.
    #[must_use]
    pub fn qualify(&self, name: &str) -> String {
        if name.starts_with('.') {
            format!("{}{}", self.namespace, name)
        } else {
            name.to_string()
        }
    }
}

/// What a controller sees while producing its content.
#[derive(Debug, Clone, Copy)]
pub struct InflationContext<'a> {
    pub render: &'a RenderContext,
    pub destination: DestinationId,
    pub mount: MountId,
}

// =============================================================================
// CAPABILITIES
// =============================================================================

/// One screen-unit of content with an attach/detach lifecycle.
pub trait Controller {
    /// Produce this controller's content.
    ///
    /// Called exactly once, before any other hook. Must be deterministic for
    /// the same construction arguments.
    fn produce_content(&mut self, ctx: &InflationContext<'_>) -> ContentNode;

    /// Called once, right after the content is wrapped in the root.
    fn on_created(&mut self) {}

    /// Called every time the root joins the live surface.
    fn on_attached(&mut self) {}

    /// Called every time the root leaves the live surface.
    fn on_detached(&mut self) {}
}

/// Builds controller instances from a render context and optional arguments.
pub trait ControllerFactory {
    fn create(
        &self,
        context: &RenderContext,
        args: Option<&Args>,
    ) -> Result<Box<dyn Controller>, BoxError>;
}

impl<F> ControllerFactory for F
where
    F: Fn(&RenderContext, Option<&Args>) -> Result<Box<dyn Controller>, BoxError>,
{
    fn create(
        &self,
        context: &RenderContext,
        args: Option<&Args>,
    ) -> Result<Box<dyn Controller>, BoxError> {
        self(context, args)
    }
}

// =============================================================================
// MOUNT
// =============================================================================

/// Where a mount is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Content produced, `on_created` done, never shown.
    Created,
    /// Root is on the live surface.
    Attached,
    /// Was on the surface, has since been removed.
    Detached,
}

/// A controller instance together with its root content.
pub struct Mount {
    id: MountId,
    controller: Box<dyn Controller>,
    root: ContentNode,
    state: LifecycleState,
    attach_count: u32,
}

impl std::fmt::Debug for Mount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mount")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("attach_count", &self.attach_count)
            .finish()
    }
}

impl Mount {
    /// Run the creation half of the lifecycle: produce content, wrap it in a
    /// root, call `on_created`.
    pub fn build(
        id: MountId,
        mut controller: Box<dyn Controller>,
        render: &RenderContext,
        destination: DestinationId,
    ) -> Self {
        let ctx = InflationContext {
            render,
            destination,
            mount: id,
        };
        let content = controller.produce_content(&ctx);
        let root = ContentNode::root(id, content);
        controller.on_created();
        Self {
            id,
            controller,
            root,
            state: LifecycleState::Created,
            attach_count: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> MountId {
        self.id
    }

    #[must_use]
    pub fn root(&self) -> &ContentNode {
        &self.root
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    #[must_use]
    pub fn attach_count(&self) -> u32 {
        self.attach_count
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.state == LifecycleState::Attached
    }

    /// Mark the root as live and notify the controller. No-op if already
    /// attached.
    pub fn attach(&mut self) {
        if self.is_attached() {
            return;
        }
        self.state = LifecycleState::Attached;
        self.attach_count = self.attach_count.saturating_add(1);
        self.controller.on_attached();
    }

    /// Mark the root as removed and notify the controller. No-op unless
    /// attached.
    pub fn detach(&mut self) {
        if !self.is_attached() {
            return;
        }
        self.state = LifecycleState::Detached;
        self.controller.on_detached();
    }
}

// =============================================================================
// TESTS
// =============================================================================
