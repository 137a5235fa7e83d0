// Re-export all public modules
pub mod shared;
pub mod as_path;
pub mod as_graph;
pub mod artifact;
#[cfg(feature = "native")]
pub mod sources;
#[cfg(feature = "native")]
pub mod pipeline;
pub mod layout;
pub mod interaction;
pub mod renderer;
#[cfg(feature = "web")]
pub mod web;

// Re-export commonly used types at the crate root
pub use artifact::GraphArtifact;
pub use as_graph::{AsGraph, AsGraphBuilder, BuildStats, Link};
pub use as_path::{AsPath, AsPathRecord};
pub use interaction::{Interaction, NodeState, PointerEvent};
pub use layout::{Simulation, SimulationParameters};
#[cfg(feature = "native")]
pub use pipeline::{PipelineConfig, PipelineRunner};
pub use renderer::{RenderConfig, RenderState};
pub use shared::{AsGraphError, ASN};
