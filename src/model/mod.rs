pub mod naming;
pub mod shape;

pub use naming::{detect_model_size, size_category};
pub use shape::{resolve, ResolvedShape, ShapeHints};
