pub mod audit;

pub use audit::{low_use_tags, similarity, typo_groups};
