// File format handlers
pub mod csv;
pub mod img;
pub mod metadata;

pub use csv::{export_csv, write_csv, CsvError};
pub use img::{load_img, split_image, ImgError, MAGIC};
pub use metadata::Metadata;
