//! JSON Canvas document model.
//!
//! Nodes are a closed enum tagged by `type`; the fields every kind shares
//! live in [`NodeFrame`]. Coordinates are stored as integers, matching what
//! canvas viewers write, but fractional values are accepted on load.

use crate::layout::{Layout, PlacedContent, PlacedEdge, PlacedNode, Side};
use crate::theme::PresetColor;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CanvasColor {
    Preset(PresetColor),
    /// Anything that is not a preset code, usually `#RRGGBB`.
    Custom(String),
}

impl From<String> for CanvasColor {
    fn from(value: String) -> Self {
        match PresetColor::from_code(value.trim()) {
            Some(preset) => Self::Preset(preset),
            None => Self::Custom(value),
        }
    }
}

impl From<CanvasColor> for String {
    fn from(value: CanvasColor) -> Self {
        match value {
            CanvasColor::Preset(preset) => preset.code().to_string(),
            CanvasColor::Custom(raw) => raw,
        }
    }
}

impl From<PresetColor> for CanvasColor {
    fn from(value: PresetColor) -> Self {
        Self::Preset(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeEnd {
    None,
    Arrow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeFrame {
    pub id: String,
    #[serde(deserialize_with = "coordinate")]
    pub x: i64,
    #[serde(deserialize_with = "coordinate")]
    pub y: i64,
    #[serde(deserialize_with = "coordinate")]
    pub width: i64,
    #[serde(deserialize_with = "coordinate")]
    pub height: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<CanvasColor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CanvasNode {
    Text {
        #[serde(flatten)]
        frame: NodeFrame,
        #[serde(default)]
        text: String,
    },
    File {
        #[serde(flatten)]
        frame: NodeFrame,
        file: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subpath: Option<String>,
    },
    Link {
        #[serde(flatten)]
        frame: NodeFrame,
        url: String,
    },
    Group {
        #[serde(flatten)]
        frame: NodeFrame,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        background: Option<String>,
        #[serde(
            default,
            rename = "backgroundStyle",
            skip_serializing_if = "Option::is_none"
        )]
        background_style: Option<String>,
    },
}

impl CanvasNode {
    pub fn frame(&self) -> &NodeFrame {
        match self {
            Self::Text { frame, .. }
            | Self::File { frame, .. }
            | Self::Link { frame, .. }
            | Self::Group { frame, .. } => frame,
        }
    }

    pub fn id(&self) -> &str {
        &self.frame().id
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::File { .. } => "file",
            Self::Link { .. } => "link",
            Self::Group { .. } => "group",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasEdge {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_end: Option<EdgeEnd>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_end: Option<EdgeEnd>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<CanvasColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    #[serde(default)]
    pub nodes: Vec<CanvasNode>,
    #[serde(default)]
    pub edges: Vec<CanvasEdge>,
}

impl Canvas {
    pub fn find_node(&self, id: &str) -> Option<&CanvasNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// Every id in use, nodes and edges alike.
    pub fn ids(&self) -> HashSet<String> {
        self.nodes
            .iter()
            .map(|node| node.id().to_string())
            .chain(self.edges.iter().map(|edge| edge.id.clone()))
            .collect()
    }

    /// Appends a computed layout. Positions are floored so that nodes sharing
    /// a fractional offset keep their exact integer distance.
    pub fn append_layout(&mut self, layout: Layout) {
        self.nodes.extend(layout.nodes.into_iter().map(CanvasNode::from));
        self.edges.extend(layout.edges.into_iter().map(CanvasEdge::from));
    }
}

impl From<PlacedNode> for CanvasNode {
    fn from(node: PlacedNode) -> Self {
        let frame = NodeFrame {
            id: node.id,
            x: node.x.floor() as i64,
            y: node.y.floor() as i64,
            width: node.width as i64,
            height: node.height as i64,
            color: node.color.map(CanvasColor::from),
        };
        match node.content {
            PlacedContent::Text(text) => CanvasNode::Text { frame, text },
            PlacedContent::Group { label } => CanvasNode::Group {
                frame,
                label: Some(label),
                background: None,
                background_style: None,
            },
        }
    }
}

impl From<PlacedEdge> for CanvasEdge {
    fn from(edge: PlacedEdge) -> Self {
        CanvasEdge {
            id: edge.id,
            from_node: edge.from_node,
            to_node: edge.to_node,
            from_side: Some(edge.from_side),
            to_side: Some(edge.to_side),
            from_end: None,
            to_end: None,
            color: edge.color.map(CanvasColor::from),
            label: edge.label,
        }
    }
}

fn coordinate<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.round() as i64)
}
