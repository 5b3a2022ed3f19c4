mod measure;
mod text;
pub(crate) mod types;
pub use measure::{MeasuredGroup, MeasuredNode, SubtreeMeasurer};
pub use text::{ContentSizer, NormalizedContent, normalize_field};
pub use types::*;

use crate::config::MindmapConfig;
use crate::ir::{ContentNode, Direction};
use crate::theme::{PresetColor, resolve_node_color};
use log::{debug, warn};
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

/// Depth and direction a layout runs with, after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    pub max_depth: usize,
    pub direction: Direction,
}

impl LayoutOptions {
    /// Normalizes caller-supplied parameters instead of rejecting them: the
    /// depth is clamped to `0..=max_depth_limit` and an unknown direction
    /// falls back to `right`.
    pub fn resolve(
        max_depth: Option<i64>,
        direction: Option<&str>,
        config: &MindmapConfig,
    ) -> Self {
        let limit = config.max_depth_limit;
        let requested = max_depth.unwrap_or(config.default_max_depth as i64);
        let clamped = requested.clamp(0, limit as i64) as usize;
        if clamped as i64 != requested {
            warn!(requested = requested, clamped = clamped; "max depth out of range, clamping");
        }

        let direction = match direction {
            None => Direction::default(),
            Some(token) => Direction::from_token(token).unwrap_or_else(|| {
                warn!(direction = token; "unknown layout direction, using right");
                Direction::Right
            }),
        };

        Self {
            max_depth: clamped,
            direction,
        }
    }
}

/// Hands out node ids that collide with nothing already in the canvas,
/// including the derived `edge-` and `group-` ids.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    prefix: String,
    next: usize,
    taken: HashSet<String>,
}

impl IdAllocator {
    pub fn new(prefix: impl Into<String>, taken: HashSet<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
            taken,
        }
    }

    /// Allocator prefixed with the current time in milliseconds.
    pub fn timestamped(taken: HashSet<String>) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        Self::new(millis.to_string(), taken)
    }

    pub fn next_node_id(&mut self) -> String {
        loop {
            let id = format!("node-{}-{}", self.prefix, self.next);
            self.next += 1;
            let edge = edge_id(&id);
            let group = group_id(&id);
            if self.taken.contains(&id) || self.taken.contains(&edge) || self.taken.contains(&group)
            {
                continue;
            }
            self.taken.insert(edge);
            self.taken.insert(group);
            self.taken.insert(id.clone());
            return id;
        }
    }
}

fn edge_id(node_id: &str) -> String {
    format!("edge-{node_id}")
}

fn group_id(node_id: &str) -> String {
    format!("group-{node_id}")
}

/// Places a content tree next to an existing root node.
pub struct TreeLayoutEngine<'c> {
    config: &'c MindmapConfig,
    measurer: SubtreeMeasurer<'c>,
    options: LayoutOptions,
}

impl<'c> TreeLayoutEngine<'c> {
    pub fn new(config: &'c MindmapConfig, options: LayoutOptions) -> Self {
        Self {
            config,
            measurer: SubtreeMeasurer::new(config, options.direction, options.max_depth),
            options,
        }
    }

    pub fn layout(&self, root: &RootAnchor, tree: &[ContentNode], ids: &mut IdAllocator) -> Layout {
        let measured = self.measurer.measure(tree, 1);
        if measured.members.is_empty() {
            return Layout::default();
        }

        let direction = self.options.direction;
        let (root_primary, root_secondary) = direction.from_xy(root.x, root.y);
        let root_size = (root.width, root.height);
        let primary = root_primary + direction.primary(root_size) + self.measurer.level_gap();
        let secondary =
            root_secondary + direction.secondary(root_size) / 2.0 - measured.footprint.secondary / 2.0;

        let layout = self.place_group(&root.id, &measured, primary, secondary, 1, None, ids);
        debug!(
            root = root.id.as_str(),
            nodes = layout.nodes.len(),
            edges = layout.edges.len(),
            groups = layout.group_count();
            "computed mindmap layout"
        );
        layout
    }

    #[allow(clippy::too_many_arguments)]
    fn place_group(
        &self,
        parent_id: &str,
        group: &MeasuredGroup<'_>,
        primary: f64,
        secondary_start: f64,
        depth: usize,
        parent_color: Option<PresetColor>,
        ids: &mut IdAllocator,
    ) -> Layout {
        let direction = self.options.direction;
        let (from_side, to_side) = Side::connectors(direction);
        let spacing = self.measurer.sibling_spacing();
        let mut out = Layout::default();
        let mut cursor = secondary_start;

        for (index, member) in group.members.iter().enumerate() {
            let own_secondary = direction.secondary(member.size);
            let span = member.extent.secondary;
            let offset = (span - own_secondary) / 2.0;
            let (x, y) = direction.to_xy(primary, cursor + offset);

            let id = ids.next_node_id();
            let color = resolve_node_color(member.node.kind, depth, index, parent_color);
            out.nodes.push(PlacedNode {
                id: id.clone(),
                x,
                y,
                width: member.size.0,
                height: member.size.1,
                content: PlacedContent::Text(member.content.to_markdown(depth)),
                color,
            });
            out.edges.push(PlacedEdge {
                id: edge_id(&id),
                from_node: parent_id.to_string(),
                to_node: id.clone(),
                from_side,
                to_side,
                color: if depth == 1 { color } else { None },
                label: member.node.trimmed_edge_label().map(str::to_string),
            });

            if let Some(children) = &member.children {
                let child_primary = primary + direction.primary(member.size) + self.measurer.level_gap();
                if let Some(label) = member.node.group_label()
                    && !children.members.is_empty()
                {
                    out.nodes.push(self.group_container(&id, label, children, child_primary, cursor));
                }
                out.append(self.place_group(
                    &id,
                    children,
                    child_primary,
                    cursor,
                    depth + 1,
                    color,
                    ids,
                ));
            }

            cursor += span + spacing;
        }

        out
    }

    fn group_container(
        &self,
        owner_id: &str,
        label: &str,
        children: &MeasuredGroup<'_>,
        primary: f64,
        secondary: f64,
    ) -> PlacedNode {
        let direction = self.options.direction;
        let padding = self.config.group_padding;
        let (x, y) = direction.to_xy(primary - padding, secondary - padding);
        let (width, height) = Footprint {
            primary: children.footprint.primary + padding * 2.0,
            secondary: children.footprint.secondary + padding * 2.0,
        }
        .to_size(direction);
        PlacedNode {
            id: group_id(owner_id),
            x,
            y,
            width,
            height,
            content: PlacedContent::Group {
                label: label.to_string(),
            },
            color: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ContentType;
    use proptest::prelude::*;
    use std::collections::HashMap;

    const EPS: f64 = 1e-6;

    fn root() -> RootAnchor {
        RootAnchor {
            id: "root".to_string(),
            x: 0.0,
            y: 0.0,
            width: 200.0,
            height: 100.0,
        }
    }

    fn run(tree: &[ContentNode], max_depth: i64, direction: &str) -> Layout {
        let config = MindmapConfig::default();
        let options = LayoutOptions::resolve(Some(max_depth), Some(direction), &config);
        let engine = TreeLayoutEngine::new(&config, options);
        let mut ids = IdAllocator::new("t", HashSet::new());
        engine.layout(&root(), tree, &mut ids)
    }

    fn node<'a>(layout: &'a Layout, title: &str) -> &'a PlacedNode {
        layout
            .nodes
            .iter()
            .find(|node| match &node.content {
                PlacedContent::Text(text) => text.lines().next().is_some_and(|line| {
                    line.trim_start_matches('#').trim() == title
                }),
                PlacedContent::Group { .. } => false,
            })
            .unwrap_or_else(|| panic!("no node titled {title}"))
    }

    fn scenario_tree() -> Vec<ContentNode> {
        vec![
            ContentNode::new("A", "x"),
            ContentNode::new("B", "y").with_children(vec![ContentNode::new("C", "z")]),
        ]
    }

    #[test]
    fn scenario_right() {
        let layout = run(&scenario_tree(), 4, "right");
        assert_eq!(layout.nodes.len(), 3);
        assert_eq!(layout.edges.len(), 3);

        let a = node(&layout, "A");
        let b = node(&layout, "B");
        let c = node(&layout, "C");
        assert_eq!((a.x, a.y), (280.0, -140.0));
        assert_eq!((b.x, b.y), (280.0, 80.0));
        assert_eq!((c.x, c.y), (680.0, 80.0));
        assert!(b.y - a.y >= 160.0 + 60.0);
        assert!(c.x > b.x);

        let pairs: Vec<(&str, &str)> = layout
            .edges
            .iter()
            .map(|edge| (edge.from_node.as_str(), edge.to_node.as_str()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("root", a.id.as_str()),
                ("root", b.id.as_str()),
                (b.id.as_str(), c.id.as_str())
            ]
        );
        for edge in &layout.edges {
            assert_eq!((edge.from_side, edge.to_side), (Side::Right, Side::Left));
        }
    }

    #[test]
    fn scenario_down_swaps_axes() {
        let layout = run(&scenario_tree(), 4, "down");
        let a = node(&layout, "A");
        let b = node(&layout, "B");
        let c = node(&layout, "C");
        // total span 320 + 50 + 320 = 690 centered on the root's x center.
        assert_eq!((a.x, a.y), (100.0 - 345.0, 160.0));
        assert_eq!(b.x, a.x + 320.0 + 50.0);
        assert!(c.y > b.y);
        assert_eq!(c.x, b.x);
        for edge in &layout.edges {
            assert_eq!((edge.from_side, edge.to_side), (Side::Bottom, Side::Top));
        }
    }

    #[test]
    fn colors_and_edge_styling() {
        let mut finding = ContentNode::new("F", "f");
        finding.kind = Some(ContentType::Finding);
        finding.edge_label = Some("  proves ".to_string());
        let mut tree: Vec<ContentNode> = (0..7)
            .map(|i| ContentNode::new(format!("N{i}"), "t"))
            .collect();
        tree.push(ContentNode::new("N7", "t").with_children(vec![ContentNode::new("Deep", "d")]));
        tree.push(finding);

        let layout = run(&tree, 4, "right");
        assert_eq!(node(&layout, "N0").color, Some(PresetColor::Red));
        assert_eq!(node(&layout, "N7").color.map(PresetColor::code), Some("2"));
        assert_eq!(node(&layout, "Deep").color.map(PresetColor::code), Some("2"));
        assert_eq!(node(&layout, "F").color.map(PresetColor::code), Some("2"));

        let deep_id = &node(&layout, "Deep").id;
        let deep_edge = layout.edges.iter().find(|e| &e.to_node == deep_id).unwrap();
        assert_eq!(deep_edge.color, None);

        let f_id = &node(&layout, "F").id;
        let f_edge = layout.edges.iter().find(|e| &e.to_node == f_id).unwrap();
        assert_eq!(f_edge.color, Some(PresetColor::Orange));
        assert_eq!(f_edge.label.as_deref(), Some("proves"));
    }

    #[test]
    fn markdown_headers_follow_depth() {
        let tree = vec![ContentNode::new("L1", "a").with_children(vec![
            ContentNode::new("L2", "b").with_children(vec![
                ContentNode::new("L3", "c").with_children(vec![ContentNode::new("L4", "d")]),
            ]),
        ])];
        let layout = run(&tree, 4, "right");
        let texts: Vec<&str> = layout
            .nodes
            .iter()
            .filter_map(|node| match &node.content {
                PlacedContent::Text(text) => Some(text.as_str()),
                PlacedContent::Group { .. } => None,
            })
            .collect();
        assert_eq!(texts, ["# L1\n\na", "## L2\n\nb", "### L3\n\nc", "### L4\n\nd"]);
    }

    #[test]
    fn depth_limit_truncates_branches() {
        let tree = vec![ContentNode::new("L1", "a").with_children(vec![
            ContentNode::new("L2", "b").with_children(vec![ContentNode::new("L3", "c")]),
        ])];
        let layout = run(&tree, 2, "right");
        assert_eq!(layout.nodes.len(), 2);
        assert_eq!(layout.edges.len(), 2);
    }

    #[test]
    fn depth_zero_emits_nothing() {
        let layout = run(&scenario_tree(), 0, "right");
        assert!(layout.is_empty());
        let layout = run(&scenario_tree(), -3, "right");
        assert!(layout.is_empty());
    }

    #[test]
    fn depth_above_limit_matches_limit() {
        let mut tree = vec![ContentNode::new("R", "r")];
        let mut cursor = &mut tree[0];
        for level in 0..9 {
            cursor.children = vec![ContentNode::new(format!("D{level}"), "x"), ContentNode::new("S", "s")];
            cursor = &mut cursor.children[0];
        }
        let ten = run(&tree, 10, "right");
        let six = run(&tree, 6, "right");
        assert_eq!(ten, six);
        assert_eq!(six.nodes.len(), 1 + 5 * 2);
    }

    #[test]
    fn unknown_direction_defaults_to_right() {
        let config = MindmapConfig::default();
        let options = LayoutOptions::resolve(None, Some("diagonal"), &config);
        assert_eq!(options.direction, Direction::Right);
        assert_eq!(options.max_depth, 4);
    }

    #[test]
    fn group_container_wraps_children() {
        let mut parent = ContentNode::new("P", "p").with_children(vec![
            ContentNode::new("A", "a"),
            ContentNode::new("B", "b").with_children(vec![ContentNode::new("C", "c")]),
        ]);
        parent.group = Some(crate::ir::GroupSpec {
            label: Some("Ablations".to_string()),
        });
        let layout = run(&[parent], 4, "right");
        assert_eq!(layout.group_count(), 1);

        let p = node(&layout, "P");
        let group_index = layout.nodes.iter().position(PlacedNode::is_group).unwrap();
        let group = &layout.nodes[group_index];
        assert_eq!(group.id, format!("group-{}", p.id));
        assert_eq!(layout.nodes[group_index - 1].id, p.id);
        assert_eq!(
            group.content,
            PlacedContent::Group {
                label: "Ablations".to_string()
            }
        );
        assert_eq!(group.x, p.right() + 80.0 - 30.0);

        for title in ["A", "B", "C"] {
            let child = node(&layout, title);
            assert!(child.x - group.x >= 30.0 - EPS);
            assert!(child.y - group.y >= 30.0 - EPS);
            assert!(group.right() - child.right() >= 30.0 - EPS);
            assert!(group.bottom() - child.bottom() >= 30.0 - EPS);
        }
    }

    #[test]
    fn empty_group_object_requests_nothing() {
        let mut parent = ContentNode::new("P", "p").with_children(vec![ContentNode::new("A", "a")]);
        parent.group = Some(crate::ir::GroupSpec::default());
        let layout = run(&[parent], 4, "right");
        assert_eq!(layout.group_count(), 0);

        let mut leaf = ContentNode::new("L", "l");
        leaf.group = Some(crate::ir::GroupSpec {
            label: Some("Lonely".to_string()),
        });
        let layout = run(&[leaf], 4, "right");
        assert_eq!(layout.group_count(), 0);
    }

    #[test]
    fn id_allocator_skips_taken_ids() {
        let taken: HashSet<String> = ["node-p-0", "edge-node-p-1", "group-node-p-2"]
            .iter()
            .map(|id| id.to_string())
            .collect();
        let mut ids = IdAllocator::new("p", taken);
        assert_eq!(ids.next_node_id(), "node-p-3");
        assert_eq!(ids.next_node_id(), "node-p-4");
    }

    #[test]
    fn ids_are_unique() {
        let tree: Vec<ContentNode> = (0..5)
            .map(|i| {
                ContentNode::new(format!("T{i}"), "x")
                    .with_children(vec![ContentNode::new("c", "x"), ContentNode::new("d", "y")])
            })
            .collect();
        let layout = run(&tree, 4, "right");
        let ids: HashSet<&str> = layout.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), layout.nodes.len());
        for edge in &layout.edges {
            assert!(edge.from_node == "root" || ids.contains(edge.from_node.as_str()));
            assert!(ids.contains(edge.to_node.as_str()));
        }
    }

    fn content_tree() -> impl Strategy<Value = Vec<ContentNode>> {
        let leaf = ("[a-z #]{0,30}", "[a-z ]{0,400}", prop::option::of("[a-z]{1,8}")).prop_map(
            |(title, text, group)| {
                let mut node = ContentNode::new(title, text);
                node.group = group.map(|label| crate::ir::GroupSpec { label: Some(label) });
                node
            },
        );
        let node = leaf.prop_recursive(5, 48, 4, |inner| {
            (
                "[a-z #]{0,30}",
                "[a-z ]{0,400}",
                prop::option::of("[a-z]{1,8}"),
                prop::collection::vec(inner, 0..4),
            )
                .prop_map(|(title, text, group, children)| {
                    let mut node = ContentNode::new(title, text).with_children(children);
                    node.group = group.map(|label| crate::ir::GroupSpec { label: Some(label) });
                    node
                })
        });
        prop::collection::vec(node, 0..5)
    }

    /// Secondary-axis interval covered by `id` and everything below it.
    fn subtree_interval(
        id: &str,
        nodes: &HashMap<&str, &PlacedNode>,
        children: &HashMap<&str, Vec<&str>>,
        direction: Direction,
    ) -> (f64, f64) {
        let node = nodes[id];
        let (_, start) = direction.from_xy(node.x, node.y);
        let mut interval = (start, start + direction.secondary((node.width, node.height)));
        for child in children.get(id).into_iter().flatten() {
            let (lo, hi) = subtree_interval(child, nodes, children, direction);
            interval = (interval.0.min(lo), interval.1.max(hi));
        }
        interval
    }

    fn check_siblings_do_not_overlap(layout: &Layout, direction: Direction, spacing: f64) {
        let nodes: HashMap<&str, &PlacedNode> =
            layout.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &layout.edges {
            children
                .entry(edge.from_node.as_str())
                .or_default()
                .push(edge.to_node.as_str());
        }
        for siblings in children.values() {
            for pair in siblings.windows(2) {
                let prev = subtree_interval(pair[0], &nodes, &children, direction);
                let next = subtree_interval(pair[1], &nodes, &children, direction);
                assert!(
                    prev.1 + spacing <= next.0 + EPS,
                    "subtrees {} and {} overlap: {prev:?} vs {next:?}",
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    fn check_groups_contain_children(layout: &Layout) {
        for group in layout.nodes.iter().filter(|n| n.is_group()) {
            let owner = group.id.trim_start_matches("group-");
            let members: Vec<&PlacedNode> = layout
                .edges
                .iter()
                .filter(|edge| edge.from_node == owner)
                .filter_map(|edge| layout.nodes.iter().find(|n| n.id == edge.to_node))
                .collect();
            assert!(!members.is_empty());
            for child in members {
                assert!(child.x - group.x >= 30.0 - EPS);
                assert!(child.y - group.y >= 30.0 - EPS);
                assert!(group.right() - child.right() >= 30.0 - EPS);
                assert!(group.bottom() - child.bottom() >= 30.0 - EPS);
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn sibling_subtrees_never_overlap(tree in content_tree(), depth in 0i64..8, down in any::<bool>()) {
            let (token, direction, spacing) = if down {
                ("down", Direction::Down, 50.0)
            } else {
                ("right", Direction::Right, 60.0)
            };
            let layout = run(&tree, depth, token);
            check_siblings_do_not_overlap(&layout, direction, spacing);
        }

        #[test]
        fn groups_contain_their_children(tree in content_tree(), down in any::<bool>()) {
            let layout = run(&tree, 6, if down { "down" } else { "right" });
            check_groups_contain_children(&layout);
        }
    }
}
