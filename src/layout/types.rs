use serde::{Deserialize, Serialize};

use crate::canvas::NodeFrame;
use crate::ir::Direction;
use crate::theme::PresetColor;

/// Extent pair of a laid out subtree, relative to the expansion direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub primary: f64,
    pub secondary: f64,
}

impl Footprint {
    /// Converts to `(width, height)` for the given direction.
    pub fn to_size(self, direction: Direction) -> (f64, f64) {
        direction.to_xy(self.primary, self.secondary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// `(from, to)` connector sides for parent-to-child edges.
    pub fn connectors(direction: Direction) -> (Side, Side) {
        match direction {
            Direction::Right => (Side::Right, Side::Left),
            Direction::Down => (Side::Bottom, Side::Top),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlacedContent {
    /// Markdown body of a generated text node.
    Text(String),
    /// Bounding container around a child group.
    Group { label: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub content: PlacedContent,
    pub color: Option<PresetColor>,
}

impl PlacedNode {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_group(&self) -> bool {
        matches!(self.content, PlacedContent::Group { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedEdge {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
    pub from_side: Side,
    pub to_side: Side,
    pub color: Option<PresetColor>,
    pub label: Option<String>,
}

/// Existing canvas node the generated subtree hangs off.
#[derive(Debug, Clone, PartialEq)]
pub struct RootAnchor {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<&NodeFrame> for RootAnchor {
    fn from(frame: &NodeFrame) -> Self {
        Self {
            id: frame.id.clone(),
            x: frame.x as f64,
            y: frame.y as f64,
            width: frame.width as f64,
            height: frame.height as f64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<PlacedEdge>,
}

impl Layout {
    pub fn append(&mut self, other: Layout) {
        self.nodes.extend(other.nodes);
        self.edges.extend(other.edges);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_group()).count()
    }

    /// `(min_x, min_y, max_x, max_y)` over every placed node.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let first = self.nodes.first()?;
        let mut bounds = (first.x, first.y, first.right(), first.bottom());
        for node in &self.nodes[1..] {
            bounds.0 = bounds.0.min(node.x);
            bounds.1 = bounds.1.min(node.y);
            bounds.2 = bounds.2.max(node.right());
            bounds.3 = bounds.3.max(node.bottom());
        }
        Some(bounds)
    }
}
