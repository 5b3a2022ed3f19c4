pub mod canvas;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod mindmap;
pub mod store;
pub mod summary;
pub mod theme;

pub use canvas::Canvas;
pub use config::{Config, load_config};
pub use ir::{ContentNode, parse_content};
pub use layout::{LayoutOptions, TreeLayoutEngine};
pub use mindmap::{MindmapError, MindmapReport, MindmapRequest, create_mindmap, plan_mindmap};
pub use store::{CanvasStore, FileCanvasStore, StoreError};
pub use summary::MindmapSummary;
