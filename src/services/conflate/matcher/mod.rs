pub mod candidates;
pub mod classifier;
pub mod compare;
pub mod corner;

pub use classifier::Classifier;
