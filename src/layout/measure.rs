use crate::config::MindmapConfig;
use crate::ir::{ContentNode, Direction};

use super::text::{ContentSizer, NormalizedContent};
use super::types::Footprint;

/// A node list measured at a given depth.
#[derive(Debug, Clone)]
pub struct MeasuredGroup<'a> {
    pub members: Vec<MeasuredNode<'a>>,
    pub footprint: Footprint,
}

/// One content node with its normalized text, own size and subtree extent.
#[derive(Debug, Clone)]
pub struct MeasuredNode<'a> {
    pub node: &'a ContentNode,
    pub content: NormalizedContent,
    /// `(width, height)` of the node itself.
    pub size: (f64, f64),
    /// Present only when the children will be placed.
    pub children: Option<MeasuredGroup<'a>>,
    /// Extent of this node together with everything placed below it.
    pub extent: Footprint,
}

/// Computes how much room each subtree needs before anything is placed.
///
/// A node list at depth `d` is placed iff `d <= max_depth`; lists past that
/// limit (and empty lists) measure as the configured minimum.
#[derive(Debug, Clone, Copy)]
pub struct SubtreeMeasurer<'c> {
    config: &'c MindmapConfig,
    sizer: ContentSizer<'c>,
    direction: Direction,
    max_depth: usize,
}

impl<'c> SubtreeMeasurer<'c> {
    pub fn new(config: &'c MindmapConfig, direction: Direction, max_depth: usize) -> Self {
        Self {
            config,
            sizer: ContentSizer::new(config),
            direction,
            max_depth,
        }
    }

    pub fn sibling_spacing(&self) -> f64 {
        match self.direction {
            Direction::Right => self.config.sibling_spacing_right,
            Direction::Down => self.config.sibling_spacing_down,
        }
    }

    pub fn level_gap(&self) -> f64 {
        match self.direction {
            Direction::Right => self.config.level_gap_right,
            Direction::Down => self.config.level_gap_down,
        }
    }

    pub fn minimum(&self) -> Footprint {
        Footprint {
            primary: self.config.min_primary_extent,
            secondary: self.config.min_span,
        }
    }

    /// Secondary-axis extent of `nodes` laid out at `depth`.
    pub fn span(&self, nodes: &[ContentNode], depth: usize) -> f64 {
        self.footprint(nodes, depth).secondary
    }

    pub fn footprint(&self, nodes: &[ContentNode], depth: usize) -> Footprint {
        self.measure(nodes, depth).footprint
    }

    /// Measures the whole list once, keeping per-node results for placement.
    pub fn measure<'a>(&self, nodes: &'a [ContentNode], depth: usize) -> MeasuredGroup<'a> {
        if nodes.is_empty() || depth > self.max_depth {
            return MeasuredGroup {
                members: Vec::new(),
                footprint: self.minimum(),
            };
        }

        let members: Vec<MeasuredNode<'a>> = nodes
            .iter()
            .map(|node| self.measure_node(node, depth))
            .collect();

        let mut secondary: f64 = members.iter().map(|member| member.extent.secondary).sum();
        secondary += (members.len() - 1) as f64 * self.sibling_spacing();
        let primary = members
            .iter()
            .map(|member| member.extent.primary)
            .fold(0.0, f64::max);

        MeasuredGroup {
            members,
            footprint: Footprint { primary, secondary },
        }
    }

    fn measure_node<'a>(&self, node: &'a ContentNode, depth: usize) -> MeasuredNode<'a> {
        let content = NormalizedContent::from_node(node, &self.config.placeholder_title);
        let size = self.sizer.size_content(&content);
        let own = Footprint {
            primary: self.direction.primary(size),
            secondary: self.direction.secondary(size),
        };

        let children = if !node.children.is_empty() && depth < self.max_depth {
            Some(self.measure(&node.children, depth + 1))
        } else {
            None
        };
        let extent = match &children {
            Some(group) => Footprint {
                primary: own.primary + self.level_gap() + group.footprint.primary,
                secondary: own.secondary.max(group.footprint.secondary),
            },
            None => own,
        };

        MeasuredNode {
            node,
            content,
            size,
            children,
            extent,
        }
    }
}
