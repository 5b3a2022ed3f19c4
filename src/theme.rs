use crate::ir::ContentType;
use std::fmt;

/// The six color presets every canvas viewer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetColor {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Purple,
}

impl PresetColor {
    pub const ALL: [PresetColor; 6] = [
        PresetColor::Red,
        PresetColor::Orange,
        PresetColor::Yellow,
        PresetColor::Green,
        PresetColor::Cyan,
        PresetColor::Purple,
    ];

    /// Numeric code used in canvas files.
    pub fn code(self) -> &'static str {
        match self {
            Self::Red => "1",
            Self::Orange => "2",
            Self::Yellow => "3",
            Self::Green => "4",
            Self::Cyan => "5",
            Self::Purple => "6",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::Red),
            "2" => Some(Self::Orange),
            "3" => Some(Self::Yellow),
            "4" => Some(Self::Green),
            "5" => Some(Self::Cyan),
            "6" => Some(Self::Purple),
            _ => None,
        }
    }

    /// Preset for the `index`-th entry of a repeating cycle starting at red.
    pub fn cycle(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

impl fmt::Display for PresetColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

pub fn type_color(kind: ContentType) -> PresetColor {
    match kind {
        ContentType::Concept => PresetColor::Cyan,
        ContentType::Method => PresetColor::Green,
        ContentType::Finding => PresetColor::Orange,
        ContentType::Question => PresetColor::Red,
        ContentType::Evidence => PresetColor::Purple,
    }
}

/// Color of a generated node.
///
/// An explicit semantic type wins. Top-level nodes without one cycle through
/// the presets by sibling index (typed siblings still advance the cycle);
/// deeper nodes inherit their parent's color.
pub fn resolve_node_color(
    kind: Option<ContentType>,
    depth: usize,
    sibling_index: usize,
    parent: Option<PresetColor>,
) -> Option<PresetColor> {
    if let Some(kind) = kind {
        return Some(type_color(kind));
    }
    if depth == 1 {
        return Some(PresetColor::cycle(sibling_index));
    }
    parent
}
