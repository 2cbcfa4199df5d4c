pub mod error;
pub mod plain;

pub use error::{IngestError, Result};
pub use plain::{harvest_dir, parse_file, parse_str, HarvestReport, ParsedSource, MAGIC};
