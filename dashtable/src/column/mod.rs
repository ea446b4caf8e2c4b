//! Column descriptors and the column registry

mod descriptor;
mod registry;

pub use descriptor::*;
pub use registry::*;
