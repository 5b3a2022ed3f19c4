use crate::config::MindmapConfig;
use crate::ir::{ContentNode, ContentRequest, Direction};
use crate::layout::{IdAllocator, Layout, LayoutOptions, RootAnchor, TreeLayoutEngine};
use crate::store::{CanvasStore, StoreError, StoredCanvas};
use crate::summary::MindmapSummary;
use log::info;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MindmapError {
    #[error("Root node {node_id} not found in {canvas}")]
    RootNotFound { node_id: String, canvas: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Arguments of one mind map generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MindmapRequest {
    pub filename: String,
    pub root_node_id: String,
    pub children: Vec<ContentNode>,
    pub max_depth: Option<i64>,
    pub layout: Option<String>,
}

impl MindmapRequest {
    pub fn new(
        filename: impl Into<String>,
        root_node_id: impl Into<String>,
        children: Vec<ContentNode>,
    ) -> Self {
        Self {
            filename: filename.into(),
            root_node_id: root_node_id.into(),
            children,
            ..Default::default()
        }
    }

    /// Builds a request from parsed input, returning `None` when the input
    /// names no canvas or root.
    pub fn from_content(request: ContentRequest) -> Option<Self> {
        Some(Self {
            filename: request.filename?,
            root_node_id: request.root_node_id?,
            children: request.children,
            max_depth: request.max_depth,
            layout: request.layout,
        })
    }
}

/// A computed layout that has not been written back yet.
#[derive(Debug, Clone)]
pub struct MindmapPlan {
    pub stored: StoredCanvas,
    pub layout: Layout,
    pub options: LayoutOptions,
    pub summary: MindmapSummary,
}

impl MindmapPlan {
    pub fn into_report(self) -> MindmapReport {
        MindmapReport {
            nodes_created: self.layout.nodes.len(),
            summary: self.summary,
            max_depth: self.options.max_depth,
            direction: self.options.direction,
            saved_path: self.stored.path,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MindmapReport {
    /// Content nodes plus group containers.
    pub nodes_created: usize,
    pub summary: MindmapSummary,
    pub max_depth: usize,
    pub direction: Direction,
    pub saved_path: PathBuf,
}

impl MindmapReport {
    pub fn group_count(&self) -> usize {
        self.summary.group_count
    }

    pub fn labeled_edge_count(&self) -> usize {
        self.summary.edge_label_count
    }
}

impl fmt::Display for MindmapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "✓ Created academic mindmap: {} nodes", self.nodes_created)?;
        let features = self.summary.features();
        if !features.is_empty() {
            write!(f, " ({})", features.join(", "))?;
        }
        write!(
            f,
            ", depth={}, layout={}\nSaved to: {}",
            self.max_depth,
            self.direction,
            self.saved_path.display()
        )
    }
}

/// Loads the canvas and computes the layout without touching storage again.
pub fn plan_mindmap(
    store: &impl CanvasStore,
    request: &MindmapRequest,
    config: &MindmapConfig,
) -> Result<MindmapPlan, MindmapError> {
    let stored = store.load_canvas(&request.filename)?;
    let root = stored
        .canvas
        .find_node(&request.root_node_id)
        .map(|node| RootAnchor::from(node.frame()))
        .ok_or_else(|| MindmapError::RootNotFound {
            node_id: request.root_node_id.clone(),
            canvas: request.filename.clone(),
        })?;

    let options = LayoutOptions::resolve(request.max_depth, request.layout.as_deref(), config);
    let engine = TreeLayoutEngine::new(config, options);
    let mut ids = IdAllocator::timestamped(stored.canvas.ids());
    let layout = engine.layout(&root, &request.children, &mut ids);
    let summary = MindmapSummary::from_tree(&request.children);

    Ok(MindmapPlan {
        stored,
        layout,
        options,
        summary,
    })
}

/// Lays out `request.children` next to the root node and saves the canvas.
///
/// Nothing is written when the canvas or the root node cannot be found.
pub fn create_mindmap(
    store: &impl CanvasStore,
    request: &MindmapRequest,
    config: &MindmapConfig,
) -> Result<MindmapReport, MindmapError> {
    let MindmapPlan {
        mut stored,
        layout,
        options,
        summary,
    } = plan_mindmap(store, request, config)?;

    let nodes_created = layout.nodes.len();
    stored.canvas.append_layout(layout);
    store.save_canvas(&stored)?;
    info!(
        root = request.root_node_id.as_str(),
        nodes = nodes_created,
        depth = options.max_depth,
        direction = options.direction.as_str();
        "created mindmap"
    );

    Ok(MindmapReport {
        nodes_created,
        summary,
        max_depth: options.max_depth,
        direction: options.direction,
        saved_path: stored.path,
    })
}
