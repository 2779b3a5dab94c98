pub mod filename;
pub mod logging;

pub use filename::{allowed_file, extension_of, secure_filename};
pub use logging::truncate_text;
