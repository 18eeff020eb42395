use std::cell::RefCell;
use std::rc::Rc;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::source::{ActionKind, ItemSource, UserIdentity};

/// Handle to one node in a `DomSource`: the index of the parsed document
/// chunk plus the node id inside its tree. Identity is handle-based; a
/// recreated document yields fresh handles even for equal markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomNode {
    doc: usize,
    id: ego_tree::NodeId,
}

struct Selectors {
    item: Selector,
    text: Selector,
    identity: Selector,
    display_name: Selector,
    handle: Selector,
    avatar_img: Selector,
    time: Selector,
    spans: Selector,
    tracking: Selector,
    reply: Selector,
    share: Selector,
    like: Selector,
    count_label: Selector,
    analytics: Selector,
}

impl Selectors {
    fn new() -> Self {
        Self {
            item: selector(r#"article[data-testid="tweet"]"#),
            text: selector(r#"[data-testid="tweetText"]"#),
            identity: selector(r#"[data-testid="User-Name"]"#),
            display_name: selector(r#"div[dir="ltr"] span"#),
            handle: selector(r#"a[role="link"][tabindex="-1"] span"#),
            avatar_img: selector(r#"[data-testid^="UserAvatar-Container"] img"#),
            time: selector("time"),
            spans: selector("span"),
            tracking: selector(
                r#"[data-testid*="placementTracking"], [data-testid*="impression"]"#,
            ),
            reply: selector(r#"[data-testid="reply"]"#),
            share: selector(r#"[data-testid="retweet"]"#),
            like: selector(r#"[data-testid="like"]"#),
            count_label: selector("span span"),
            analytics: selector(r#"a[href*="/analytics" i]"#),
        }
    }

    fn action(&self, action: ActionKind) -> &Selector {
        match action {
            ActionKind::Reply => &self.reply,
            ActionKind::Share => &self.share,
            ActionKind::Like => &self.like,
        }
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Record source over a growing set of parsed HTML chunks.
///
/// The source is a cheap-to-clone shared handle. It is deliberately
/// single-threaded (`Rc<RefCell<..>>`): the whole engine runs one
/// cooperative event loop and handlers run to completion, so no handle is
/// ever shared across threads.
#[derive(Clone)]
pub struct DomSource {
    origin: Url,
    selectors: Rc<Selectors>,
    docs: Rc<RefCell<Vec<Html>>>,
}

impl DomSource {
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            selectors: Rc::new(Selectors::new()),
            docs: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Parse and append one rendered chunk; returns the handle of its root,
    /// suitable for delivery as an added node.
    pub fn push_document(&self, html: &str) -> DomNode {
        let doc = Html::parse_document(html);
        let root = doc.tree.root().id();
        let mut docs = self.docs.borrow_mut();
        docs.push(doc);
        DomNode {
            doc: docs.len() - 1,
            id: root,
        }
    }

    /// Re-parse an existing chunk in place, simulating mutations that do
    /// not add nodes (an avatar image finishing its load). Node ids stay
    /// stable as long as the element structure is unchanged.
    pub fn rewrite_document(&self, root: DomNode, html: &str) {
        let mut docs = self.docs.borrow_mut();
        if let Some(slot) = docs.get_mut(root.doc) {
            *slot = Html::parse_document(html);
        }
    }

    fn with_element<T>(&self, node: &DomNode, f: impl FnOnce(ElementRef<'_>) -> T) -> Option<T> {
        let docs = self.docs.borrow();
        let doc = docs.get(node.doc)?;
        let element = doc.tree.get(node.id).and_then(ElementRef::wrap)?;
        Some(f(element))
    }

    fn nested_count_label(&self, node: &DomNode, control: &Selector) -> Option<String> {
        self.with_element(node, |el| {
            let control = el.select(control).next()?;
            let label = control.select(&self.selectors.count_label).next()?;
            Some(label.text().collect::<String>())
        })
        .flatten()
    }
}

impl ItemSource for DomSource {
    type Node = DomNode;

    fn origin(&self) -> Url {
        self.origin.clone()
    }

    fn is_element(&self, node: &DomNode) -> bool {
        self.with_element(node, |_| ()).is_some()
    }

    fn items_in_document(&self) -> Vec<DomNode> {
        let docs = self.docs.borrow();
        let mut items = Vec::new();
        for (index, doc) in docs.iter().enumerate() {
            items.extend(doc.select(&self.selectors.item).map(|m| DomNode {
                doc: index,
                id: m.id(),
            }));
        }
        items
    }

    fn items_under(&self, root: &DomNode) -> Vec<DomNode> {
        let docs = self.docs.borrow();
        let Some(doc) = docs.get(root.doc) else {
            return Vec::new();
        };
        let Some(node_ref) = doc.tree.get(root.id) else {
            return Vec::new();
        };
        // A whole-chunk root queries the full chunk; an element root
        // queries its descendants only, like subtree queries on added nodes.
        let matches: Vec<ego_tree::NodeId> = if node_ref.value().is_document() {
            doc.select(&self.selectors.item).map(|m| m.id()).collect()
        } else if let Some(element) = ElementRef::wrap(node_ref) {
            element.select(&self.selectors.item).map(|m| m.id()).collect()
        } else {
            Vec::new()
        };
        matches
            .into_iter()
            .map(|id| DomNode { doc: root.doc, id })
            .collect()
    }

    fn text_segments(&self, node: &DomNode) -> Vec<String> {
        self.with_element(node, |el| {
            el.select(&self.selectors.text)
                .map(|segment| segment.text().collect::<String>())
                .collect()
        })
        .unwrap_or_default()
    }

    fn identity(&self, node: &DomNode) -> Option<UserIdentity> {
        self.with_element(node, |el| {
            let block = el.select(&self.selectors.identity).next()?;
            let display_name = block
                .select(&self.selectors.display_name)
                .next()
                .map(|m| m.text().collect::<String>());
            let handle = block
                .select(&self.selectors.handle)
                .next()
                .map(|m| m.text().collect::<String>());
            Some(UserIdentity {
                display_name,
                handle,
            })
        })
        .flatten()
    }

    fn avatar_src(&self, node: &DomNode) -> Option<String> {
        self.with_element(node, |el| {
            el.select(&self.selectors.avatar_img)
                .next()
                .and_then(|img| img.value().attr("src"))
                .map(ToOwned::to_owned)
        })
        .flatten()
    }

    fn time_datetime(&self, node: &DomNode) -> Option<String> {
        self.with_element(node, |el| {
            el.select(&self.selectors.time)
                .next()
                .and_then(|time| time.value().attr("datetime"))
                .map(ToOwned::to_owned)
        })
        .flatten()
    }

    fn time_permalink(&self, node: &DomNode) -> Option<String> {
        self.with_element(node, |el| {
            let time = el.select(&self.selectors.time).next()?;
            // Nearest enclosing link around the time indicator.
            time.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|ancestor| ancestor.value().name() == "a")
                .and_then(|anchor| anchor.value().attr("href"))
                .map(ToOwned::to_owned)
        })
        .flatten()
    }

    fn span_texts(&self, node: &DomNode) -> Vec<String> {
        self.with_element(node, |el| {
            el.select(&self.selectors.spans)
                .map(|span| span.text().collect::<String>())
                .collect()
        })
        .unwrap_or_default()
    }

    fn has_tracking_marker(&self, node: &DomNode) -> bool {
        self.with_element(node, |el| el.select(&self.selectors.tracking).next().is_some())
            .unwrap_or(false)
    }

    fn action_label(&self, node: &DomNode, action: ActionKind) -> Option<String> {
        self.nested_count_label(node, self.selectors.action(action))
    }

    fn analytics_label(&self, node: &DomNode) -> Option<String> {
        self.nested_count_label(node, &self.selectors.analytics)
    }
}
