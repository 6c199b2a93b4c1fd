pub mod encode;
pub mod graph;
pub mod layout;
pub mod recency;

pub use encode::{ColorAssigner, node_sizes};
pub use graph::{CollabGraph, EdgeKind, GraphEdge, build};
pub use layout::compute_layout;
