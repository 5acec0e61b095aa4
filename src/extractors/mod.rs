// src/extractors/mod.rs
pub mod appendix;
pub mod commands;
pub mod comments;
pub mod environments;
pub mod numbering;
pub mod sections;
pub mod theorem;

// Re-export key extraction types for convenience
pub use appendix::{find_appendix_start, truncate_at_appendix};
pub use commands::harvest_custom_commands;
pub use comments::strip_comments;
pub use environments::{EnvironmentCatalog, EnvironmentDescriptor, EnvironmentPatterns};
pub use sections::{build_section_index, uses_section_numbering, SectionEntry};
pub use theorem::{dedup_and_sort, TheoremExtractor, TheoremSpan};
