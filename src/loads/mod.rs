//! Load types

mod node_load;

pub use node_load::{LoadMode, NodeLoad};
