//! Utility functions for error handling
//!
//! This module provides helpers that attach path and purpose context to I/O failures.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
///
/// # Returns
/// * `Result<fs::File>` - The opened file or a detailed error
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if path.is_dir() {
        return Err(Error::Io {
            message: format!("Expected a file for: {purpose}"),
            path: Some(path.to_path_buf()),
            source: io::Error::new(io::ErrorKind::InvalidInput, "path is a directory"),
        });
    }

    fs::File::open(path).map_err(|e| {
        let message = match e.kind() {
            io::ErrorKind::NotFound => format!("File not found, needed for: {purpose}"),
            io::ErrorKind::PermissionDenied => {
                "Permission denied - check file permissions".to_string()
            }
            _ => format!("Failed to open file for: {purpose}"),
        };

        Error::Io {
            message,
            path: Some(path.to_path_buf()),
            source: e,
        }
    })
}
