//! Output: the CSV log and the startup summary

pub mod csv;
pub mod text;

pub use csv::{open_log_file, CsvEmitter};
