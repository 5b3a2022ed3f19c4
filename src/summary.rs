use crate::ir::{ContentNode, ContentType};

/// Feature tally over a content tree, used for the completion message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MindmapSummary {
    /// Typed node counts in first-seen order.
    pub type_counts: Vec<(ContentType, usize)>,
    pub untyped_count: usize,
    pub edge_label_count: usize,
    pub group_count: usize,
}

impl MindmapSummary {
    /// Walks the whole input tree, including branches deeper than any depth
    /// limit applied during layout.
    pub fn from_tree(tree: &[ContentNode]) -> Self {
        let mut summary = Self::default();
        for node in tree {
            summary.visit(node);
        }
        summary
    }

    fn visit(&mut self, node: &ContentNode) {
        match node.kind {
            Some(kind) => match self.type_counts.iter_mut().find(|(seen, _)| *seen == kind) {
                Some((_, count)) => *count += 1,
                None => self.type_counts.push((kind, 1)),
            },
            None => self.untyped_count += 1,
        }
        if node.trimmed_edge_label().is_some() {
            self.edge_label_count += 1;
        }
        if node.group_label().is_some() {
            self.group_count += 1;
        }
        for child in &node.children {
            self.visit(child);
        }
    }

    pub fn count(&self, kind: ContentType) -> usize {
        self.type_counts
            .iter()
            .find(|(seen, _)| *seen == kind)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Human-readable feature list; untyped nodes are left out.
    pub fn features(&self) -> Vec<String> {
        let mut features = Vec::new();
        if !self.type_counts.is_empty() {
            let types: Vec<String> = self
                .type_counts
                .iter()
                .map(|(kind, count)| format!("{count} {kind}"))
                .collect();
            features.push(types.join(", "));
        }
        if self.group_count > 0 {
            features.push(format!("{} group(s)", self.group_count));
        }
        if self.edge_label_count > 0 {
            features.push(format!("{} labeled edge(s)", self.edge_label_count));
        }
        features
    }
}
