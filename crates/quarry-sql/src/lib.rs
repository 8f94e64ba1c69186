pub mod serializer;
pub use serializer::{Params, Placeholder, Serializer};

pub use quarry_core::stmt::Statement;
