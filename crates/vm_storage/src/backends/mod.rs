pub mod csv_file;
pub mod memory;

pub use csv_file::{read_records, write_references, CsvStorage};
pub use memory::MemoryStorage;
