// App Constants
pub const APP_NAME: &str = "ConvertFlow";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CONFIG_DIR_NAME: &str = "convertflow";
pub const SERVER_URL_ENV: &str = "CONVERTFLOW_SERVER_URL";

// Service endpoints
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const UPLOAD_ENDPOINT: &str = "/upload";
pub const PROCESS_ENDPOINT: &str = "/process";
pub const UPLOAD_FIELD_NAME: &str = "file";
pub const FALLBACK_MIME: &str = "application/octet-stream";

// Size limit reporting
pub const SIZE_LIMIT_STATUS: u16 = 413;
pub const SIZE_LIMIT_CODE: &str = "file_too_large";
pub const SIZE_LIMIT_PATTERN: &str = r"(?i)excede o tamanho m[aá]ximo|exceeds the maximum (upload |file )?size|payload too large|request entity too large";

// Labels and messages
pub const SUBMIT_LABEL: &str = "Upload";
pub const BUSY_LABEL: &str = "Processing...";
pub const PROCESSING_TEXT: &str = "Processing...";
pub const COMMUNICATION_ERROR: &str = "Failed to communicate with the server";
pub const FILE_TOO_LARGE: &str = "File too large";
pub const DOWNLOAD_LABEL: &str = "Download file";

// UI
pub const REPAINT_INTERVAL_MS: u64 = 100;
pub const DEFAULT_WINDOW_WIDTH: f32 = 900.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 700.0;
