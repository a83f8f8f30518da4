pub mod adjust;
pub mod common;
pub mod list;
pub mod stats;
pub mod substitute;
