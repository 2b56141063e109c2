pub mod workbook;

pub use workbook::{load_bytes, load_path, FileFormat};
