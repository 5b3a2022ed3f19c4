use crate::layout::{Layout, LayoutOptions, PlacedContent};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub root: String,
    pub direction: String,
    pub max_depth: usize,
    /// `[min_x, min_y, max_x, max_y]` over every placed node.
    pub bounds: Option<[f64; 4]>,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub kind: &'static str,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Option<&'static str>,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub from: String,
    pub to: String,
    pub from_side: &'static str,
    pub to_side: &'static str,
    pub label: Option<String>,
}

impl LayoutDump {
    pub fn from_layout(root: &str, layout: &Layout, options: LayoutOptions) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| {
                let (kind, text) = match &node.content {
                    PlacedContent::Text(text) => ("text", text.clone()),
                    PlacedContent::Group { label } => ("group", label.clone()),
                };
                NodeDump {
                    id: node.id.clone(),
                    kind,
                    x: node.x,
                    y: node.y,
                    width: node.width,
                    height: node.height,
                    color: node.color.map(|color| color.code()),
                    text,
                }
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                from: edge.from_node.clone(),
                to: edge.to_node.clone(),
                from_side: edge.from_side.as_str(),
                to_side: edge.to_side.as_str(),
                label: edge.label.clone(),
            })
            .collect();

        LayoutDump {
            root: root.to_string(),
            direction: options.direction.to_string(),
            max_depth: options.max_depth,
            bounds: layout
                .bounds()
                .map(|(min_x, min_y, max_x, max_y)| [min_x, min_y, max_x, max_y]),
            nodes,
            edges,
        }
    }
}

pub fn write_layout_dump(
    writer: impl Write,
    root: &str,
    layout: &Layout,
    options: LayoutOptions,
) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(root, layout, options);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
