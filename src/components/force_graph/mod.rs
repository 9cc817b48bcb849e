mod builder;
mod component;
mod frame;
mod simulation;
mod state;
mod surface;
mod types;

pub use builder::build_graph;
pub use component::ForceGraphSvg;
pub use types::{EdgeRecord, GraphData};
