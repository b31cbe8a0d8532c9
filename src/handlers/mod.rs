// Handler modules
pub mod rules;
pub mod scan;

// Re-export all handler functions
pub use rules::handle_rules;
pub use scan::{ScanOptions, handle_scan, load_scan_context};
