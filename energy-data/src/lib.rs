pub mod loader;
pub mod logging;
pub mod writer;

pub use loader::{LoadError, load_payload, load_records, load_regional};
pub use writer::{ExportError, write_csv, write_csv_file};
