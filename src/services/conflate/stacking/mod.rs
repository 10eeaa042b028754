pub mod alternates;
pub mod builder;
pub mod codec;

pub use builder::{build_stacks, StackOutcome};
