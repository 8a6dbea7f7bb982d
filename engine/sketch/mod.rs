pub mod load_sketch;
pub mod minmax;
pub mod node;
pub mod yielder;

pub use load_sketch::*;
pub use minmax::*;
pub use node::*;
pub use yielder::*;
