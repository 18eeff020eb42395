use tokio::sync::mpsc;

/// The host environment the drive loop runs against.
///
/// The engine consumes three host capabilities: an advance action with no
/// return value (scroll by one viewport), a subscription delivering batches
/// of nodes added under the observed root, and the matching unsubscribe.
pub trait HostEnvironment {
    type Node;

    /// Change which item nodes the source will next render.
    fn advance(&mut self);

    /// Start delivering "nodes added under this root, recursively" batches.
    /// Real hosts observe the main content region when one exists, falling
    /// back to the whole document.
    fn subscribe(&mut self) -> mpsc::UnboundedReceiver<Vec<Self::Node>>;

    /// Stop the mutation delivery. The drive loop calls this exactly once,
    /// when the target count is reached.
    fn unsubscribe(&mut self);
}
