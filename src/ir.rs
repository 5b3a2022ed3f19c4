use serde::{Deserialize, Deserializer};
use std::fmt;

/// Expansion direction of a generated mind map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Right,
    Down,
}

impl Direction {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "right" | "lr" => Some(Self::Right),
            "down" | "td" | "tb" => Some(Self::Down),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Right => "right",
            Self::Down => "down",
        }
    }

    /// Extent of a `(width, height)` pair along the expansion axis.
    pub fn primary(self, size: (f64, f64)) -> f64 {
        match self {
            Self::Right => size.0,
            Self::Down => size.1,
        }
    }

    /// Extent of a `(width, height)` pair along the stacking axis.
    pub fn secondary(self, size: (f64, f64)) -> f64 {
        match self {
            Self::Right => size.1,
            Self::Down => size.0,
        }
    }

    /// Maps an axis-relative `(primary, secondary)` pair back to `(x, y)`.
    pub fn to_xy(self, primary: f64, secondary: f64) -> (f64, f64) {
        match self {
            Self::Right => (primary, secondary),
            Self::Down => (secondary, primary),
        }
    }

    /// Splits an `(x, y)` point into `(primary, secondary)`.
    pub fn from_xy(self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Self::Right => (x, y),
            Self::Down => (y, x),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic category of a content node, used for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentType {
    Concept,
    Method,
    Finding,
    Question,
    Evidence,
}

impl ContentType {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "concept" => Some(Self::Concept),
            "method" => Some(Self::Method),
            "finding" => Some(Self::Finding),
            "question" => Some(Self::Question),
            "evidence" => Some(Self::Evidence),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Concept => "concept",
            Self::Method => "method",
            Self::Finding => "finding",
            Self::Question => "question",
            Self::Evidence => "evidence",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GroupSpec {
    #[serde(default)]
    pub label: Option<String>,
}

/// One node of the caller-supplied content tree.
///
/// Deserialization is lenient: missing or `null` fields fall back to their
/// defaults and an unrecognized `type` is dropped, so partially formed trees
/// still lay out.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContentNode {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, rename = "type", deserialize_with = "lenient_content_type")]
    pub kind: Option<ContentType>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, alias = "edgeLabel")]
    pub edge_label: Option<String>,
    #[serde(default)]
    pub group: Option<GroupSpec>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_children(mut self, children: Vec<ContentNode>) -> Self {
        self.children = children;
        self
    }

    /// Label of the requested group container. A `group` object without a
    /// label requests nothing.
    pub fn group_label(&self) -> Option<&str> {
        self.group.as_ref().and_then(|group| group.label.as_deref())
    }

    /// Edge label with surrounding whitespace removed; blank labels are none.
    pub fn trimmed_edge_label(&self) -> Option<&str> {
        self.edge_label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }
}

/// Request file accepted on the command line: either a bare node list or an
/// object carrying the full tool arguments.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ContentInput {
    Nodes(Vec<ContentNode>),
    Request(ContentRequest),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentRequest {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default, alias = "rootNodeId")]
    pub root_node_id: Option<String>,
    #[serde(default)]
    pub children: Vec<ContentNode>,
    #[serde(default, alias = "maxDepth")]
    pub max_depth: Option<i64>,
    #[serde(default)]
    pub layout: Option<String>,
}

impl ContentInput {
    pub fn into_request(self) -> ContentRequest {
        match self {
            Self::Nodes(children) => ContentRequest {
                children,
                ..Default::default()
            },
            Self::Request(request) => request,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("content tree is not valid JSON or JSON5: {0}")]
    Syntax(#[from] json5::Error),
    #[error("content tree has an unexpected shape: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Parses a content tree, falling back to JSON5 for hand-written input with
/// comments or trailing commas.
///
/// Well-formed JSON that does not fit the expected shape is reported as is,
/// without a JSON5 retry.
pub fn parse_content(input: &str) -> Result<ContentInput, ContentError> {
    match serde_json::from_str::<ContentInput>(input) {
        Ok(parsed) => Ok(parsed),
        Err(err) if err.is_data() => Err(ContentError::Shape(err)),
        Err(_) => Ok(json5::from_str::<ContentInput>(input)?),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_content_type<'de, D>(deserializer: D) -> Result<Option<ContentType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(ContentType::from_token))
}
