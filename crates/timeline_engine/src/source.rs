use std::fmt;

use url::Url;

/// Engagement actions exposed as interactive controls on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Reply,
    Share,
    Like,
}

/// The first "user identity" sub-block of an item, when present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserIdentity {
    pub display_name: Option<String>,
    pub handle: Option<String>,
}

/// Capability interface over the external, lazily-rendering record source.
///
/// Item nodes are opaque handles with reference-based identity: the same
/// handle is never delivered twice, but the source may recycle the view and
/// recreate a logically equal item under a fresh handle, which the engine
/// does not deduplicate.
///
/// Every lookup returns zero-or-one values (or an empty list); an
/// implementation must not panic, it represents absent matches as absent.
pub trait ItemSource {
    /// Opaque handle to one renderable unit.
    type Node: Clone + PartialEq + fmt::Debug;

    /// Origin the document's relative URLs resolve against.
    fn origin(&self) -> Url;

    /// True if the handle refers to a structural element at all.
    fn is_element(&self, node: &Self::Node) -> bool;

    /// Every item node currently rendered anywhere in the document.
    /// Used once, for the initial full-document scan.
    fn items_in_document(&self) -> Vec<Self::Node>;

    /// Item nodes among the descendants of a newly added root. The root
    /// itself is not considered, matching subtree queries on added nodes.
    fn items_under(&self, root: &Self::Node) -> Vec<Self::Node>;

    /// The distinguishable text segments of an item, in document order.
    fn text_segments(&self, node: &Self::Node) -> Vec<String>;

    /// The first user-identity sub-block, if the item has one.
    fn identity(&self, node: &Self::Node) -> Option<UserIdentity>;

    /// Raw `src` of the avatar image inside the marked avatar container.
    fn avatar_src(&self, node: &Self::Node) -> Option<String>;

    /// Machine-readable datetime of the item's time indicator.
    fn time_datetime(&self, node: &Self::Node) -> Option<String>;

    /// Raw href of the nearest enclosing link around the time indicator.
    fn time_permalink(&self, node: &Self::Node) -> Option<String>;

    /// Text content of every span inside the item (promotion detection).
    fn span_texts(&self, node: &Self::Node) -> Vec<String>;

    /// True if any descendant carries an impression/placement-tracking
    /// marker.
    fn has_tracking_marker(&self, node: &Self::Node) -> bool;

    /// Numeric label nested in the control for `action`, if rendered.
    fn action_label(&self, node: &Self::Node, action: ActionKind) -> Option<String>;

    /// Numeric label nested in the analytics link, if rendered.
    fn analytics_label(&self, node: &Self::Node) -> Option<String>;
}
