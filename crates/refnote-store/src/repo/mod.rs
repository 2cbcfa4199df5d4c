pub mod entries;
pub mod sources;
pub mod tags;

pub use entries::{EntriesRepo, EntryNew};
pub use sources::{ImportSummary, SourceOverview, SourcesRepo};
pub use tags::TagsRepo;
