use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Content-length thresholds and the node size used below each one.
const SIZE_BANDS: [(usize, f64, f64); 5] = [
    (60, 320.0, 160.0),
    (120, 380.0, 200.0),
    (200, 440.0, 250.0),
    (350, 500.0, 300.0),
    (500, 560.0, 360.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeBand {
    /// Exclusive upper bound on content length for this band.
    pub below: usize,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone)]
pub struct MindmapConfig {
    pub size_bands: Vec<SizeBand>,
    pub overflow_width: f64,
    pub overflow_height: f64,
    pub sibling_spacing_right: f64,
    pub sibling_spacing_down: f64,
    pub level_gap_right: f64,
    pub level_gap_down: f64,
    pub group_padding: f64,
    pub min_span: f64,
    pub min_primary_extent: f64,
    pub default_max_depth: usize,
    pub max_depth_limit: usize,
    pub placeholder_title: String,
}

impl Default for MindmapConfig {
    fn default() -> Self {
        Self {
            size_bands: SIZE_BANDS
                .iter()
                .map(|&(below, width, height)| SizeBand {
                    below,
                    width,
                    height,
                })
                .collect(),
            overflow_width: 600.0,
            overflow_height: 420.0,
            sibling_spacing_right: 60.0,
            sibling_spacing_down: 50.0,
            level_gap_right: 80.0,
            level_gap_down: 60.0,
            group_padding: 30.0,
            min_span: 150.0,
            min_primary_extent: 300.0,
            default_max_depth: 4,
            max_depth_limit: 6,
            placeholder_title: "key point".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub output_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./output"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub mindmap: MindmapConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct MindmapConfigFile {
    size_bands: Option<Vec<SizeBand>>,
    overflow_width: Option<f64>,
    overflow_height: Option<f64>,
    sibling_spacing_right: Option<f64>,
    sibling_spacing_down: Option<f64>,
    level_gap_right: Option<f64>,
    level_gap_down: Option<f64>,
    group_padding: Option<f64>,
    min_span: Option<f64>,
    min_primary_extent: Option<f64>,
    default_max_depth: Option<usize>,
    max_depth_limit: Option<usize>,
    placeholder_title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    output_dir: Option<PathBuf>,
    mindmap: Option<MindmapConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(v) = parsed.output_dir {
        config.store.output_dir = v;
    }

    if let Some(mindmap) = parsed.mindmap {
        if let Some(mut bands) = mindmap.size_bands {
            bands.sort_by_key(|band| band.below);
            config.mindmap.size_bands = bands;
        }
        if let Some(v) = mindmap.overflow_width {
            config.mindmap.overflow_width = v;
        }
        if let Some(v) = mindmap.overflow_height {
            config.mindmap.overflow_height = v;
        }
        if let Some(v) = mindmap.sibling_spacing_right {
            config.mindmap.sibling_spacing_right = v;
        }
        if let Some(v) = mindmap.sibling_spacing_down {
            config.mindmap.sibling_spacing_down = v;
        }
        if let Some(v) = mindmap.level_gap_right {
            config.mindmap.level_gap_right = v;
        }
        if let Some(v) = mindmap.level_gap_down {
            config.mindmap.level_gap_down = v;
        }
        if let Some(v) = mindmap.group_padding {
            config.mindmap.group_padding = v;
        }
        if let Some(v) = mindmap.min_span {
            config.mindmap.min_span = v;
        }
        if let Some(v) = mindmap.min_primary_extent {
            config.mindmap.min_primary_extent = v;
        }
        if let Some(v) = mindmap.default_max_depth {
            config.mindmap.default_max_depth = v;
        }
        if let Some(v) = mindmap.max_depth_limit {
            config.mindmap.max_depth_limit = v;
        }
        if let Some(v) = mindmap.placeholder_title {
            config.mindmap.placeholder_title = v;
        }
    }

    Ok(config)
}
