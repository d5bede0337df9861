//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

// =============================================================================
// Logging Defaults
// =============================================================================

pub fn default_log_filter() -> String {
    "info".to_string()
}

// =============================================================================
// Console Defaults
// =============================================================================

pub fn default_prompt() -> String {
    "> ".to_string()
}

pub fn default_sender_name() -> String {
    "console".to_string()
}

pub fn default_max_line_len() -> usize {
    plugcmd_line::line::DEFAULT_MAX_LEN
}
