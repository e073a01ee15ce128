///! Bundled creature dataset and the offline wiki-table importer.

mod loader;
pub mod parser;

pub use loader::{dataset_file, save_collection, RecordStore};
pub use parser::parse_wiki_table;
