pub mod record;
pub mod storage;

pub use record::{format_real, ScreeningRecord, COLUMNS};
pub use storage::{save_csv, CSV_MIME_TYPE, DEFAULT_FILE_NAME};
