pub mod csv;
pub mod json;

pub use self::csv::CsvSink;
pub use self::json::{write_summary, write_summary_file};
