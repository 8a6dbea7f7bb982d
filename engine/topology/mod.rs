pub mod ids;
pub mod nodes;
pub mod tablets;
pub mod token_metadata;

pub use ids::*;
pub use nodes::*;
pub use tablets::*;
pub use token_metadata::*;
