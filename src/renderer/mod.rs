//! Cradle rendering
//!
//! Geometry is built on the CPU in simulation pixels (`shapes`), mapped to NDC
//! through a `ViewTransform` and drawn as colored triangles with WebGPU.

pub mod pipeline;
pub mod shapes;
pub mod vertex;
pub mod view;

pub use pipeline::CradleRenderer;
pub use shapes::{SceneFrame, cradle_scene};
pub use vertex::Vertex;
pub use view::ViewTransform;
