use std::collections::VecDeque;

use tokio::sync::mpsc;

use timeline_engine::{DomNode, DomSource};

use crate::host::HostEnvironment;

/// One scripted reaction to an advance action.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// Render a new chunk and report its root as an added subtree.
    AppendChunk(String),
    /// Re-render chunk `index` in place. Attribute-level mutations (an
    /// avatar image finishing its load) add no nodes, so no notification
    /// is published.
    RewriteChunk { index: usize, html: String },
}

/// Scripted host environment over a `DomSource`.
///
/// Plays one script step per advance action, mimicking a virtualized feed
/// that renders more items as the view scrolls. Chunks rendered before the
/// run starts are seeded without notifications, exactly like content that
/// predates the mutation subscription.
pub struct ScriptedTimeline {
    source: DomSource,
    steps: VecDeque<ScriptStep>,
    chunk_roots: Vec<DomNode>,
    tx: Option<mpsc::UnboundedSender<Vec<DomNode>>>,
    advance_calls: u64,
    unsubscribe_calls: u64,
}

impl ScriptedTimeline {
    pub fn new(source: DomSource) -> Self {
        Self {
            source,
            steps: VecDeque::new(),
            chunk_roots: Vec::new(),
            tx: None,
            advance_calls: 0,
            unsubscribe_calls: 0,
        }
    }

    /// Render a chunk synchronously, before any subscription exists.
    pub fn seed(&mut self, html: &str) {
        let root = self.source.push_document(html);
        self.chunk_roots.push(root);
    }

    pub fn push_step(&mut self, step: ScriptStep) {
        self.steps.push_back(step);
    }

    pub fn advance_calls(&self) -> u64 {
        self.advance_calls
    }

    pub fn unsubscribe_calls(&self) -> u64 {
        self.unsubscribe_calls
    }
}

impl HostEnvironment for ScriptedTimeline {
    type Node = DomNode;

    fn advance(&mut self) {
        self.advance_calls += 1;
        match self.steps.pop_front() {
            Some(ScriptStep::AppendChunk(html)) => {
                let root = self.source.push_document(&html);
                self.chunk_roots.push(root);
                if let Some(tx) = &self.tx {
                    let _ = tx.send(vec![root]);
                }
            }
            Some(ScriptStep::RewriteChunk { index, html }) => {
                if let Some(root) = self.chunk_roots.get(index) {
                    self.source.rewrite_document(*root, &html);
                }
            }
            // Feed exhausted: scrolling further renders nothing.
            None => {}
        }
    }

    fn subscribe(&mut self) -> mpsc::UnboundedReceiver<Vec<DomNode>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.tx = Some(tx);
        rx
    }

    fn unsubscribe(&mut self) {
        self.unsubscribe_calls += 1;
        self.tx = None;
    }
}
