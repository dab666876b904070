#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared by the loader and the CLI."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! The merge itself is infallible; only reading, decoding and writing
//! configuration documents produce these errors.

use std::path::{Path, PathBuf};

/// Unified error type returned by the configuration loader and CLI.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Wraps I/O errors that occur while reading configuration files.
    #[error("failed to read configuration from {path:?}: {source}")]
    Io {
        /// Location of the configuration file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration {path:?}: {source}")]
    Parse {
        /// Origin of the document that failed to decode.
        path:   PathBuf,
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Wraps JSON decoding errors.
    #[error("failed to parse JSON configuration {path:?}: {source}")]
    ParseJson {
        /// Origin of the document that failed to decode.
        path:   PathBuf,
        /// Source decoding error from serde_json.
        source: serde_json::Error
    },
    /// Returned when the inputs cannot be processed as requested.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Human readable message describing the problem.
        message: String
    },
    /// Wraps serialization errors when writing merged output.
    #[error("failed to serialize targets: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Wraps I/O errors that occur while writing output.
    #[error("failed to write output: {source}")]
    Output {
        /// Underlying I/O error.
        source: std::io::Error
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Output {
            source
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the configuration file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Parse`] variant naming the document that failed.
///
/// # Parameters
///
/// * `path` - Origin of the YAML document.
/// * `source` - Decoding error reported by serde_yaml.
pub fn parse_error(path: &Path, source: serde_yaml::Error) -> Error {
    Error::Parse {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::ParseJson`] variant naming the document that failed.
pub fn json_error(path: &Path, source: serde_json::Error) -> Error {
    Error::ParseJson {
        path: path.to_path_buf(),
        source
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn validation_constructor_populates_message() {
        let error = Error::validation("something went wrong");
        match error {
            Error::Validation {
                ref message
            } => {
                assert_eq!(message, "something went wrong");
            }
            other => panic!("expected validation error, got {other:?}")
        }
    }

    #[test]
    fn to_display_string_matches_display() {
        let error = Error::validation("display me");
        assert_eq!(error.to_string(), error.to_display_string());
    }

    #[test]
    fn io_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("/tmp/targets.yaml");
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = super::io_error(path, io_error);

        match error {
            Error::Io {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected io error, got {other:?}")
        }
    }

    #[test]
    fn parse_error_helper_names_the_document() {
        let path = std::path::Path::new("conf.d/app.yaml");
        let invalid = serde_yaml::from_str::<usize>("not-a-number").unwrap_err();
        let error = super::parse_error(path, invalid);

        assert!(error.to_string().contains("conf.d/app.yaml"));
        match error {
            Error::Parse {
                path: ref stored_path, ..
            } => assert_eq!(stored_path, path),
            other => panic!("expected parse error, got {other:?}")
        }
    }

    #[test]
    fn json_error_helper_maps_to_parse_json_variant() {
        let path = std::path::Path::new("conf.d/app.json");
        let invalid = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let error = super::json_error(path, invalid);

        assert!(error.to_string().contains("conf.d/app.json"));
        assert!(matches!(error, Error::ParseJson { .. }));
    }

    #[test]
    fn serde_json_conversion_maps_to_serialize_variant() {
        let invalid = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let mapped: Error = invalid.into();
        assert!(matches!(mapped, Error::Serialize { .. }));
    }

    #[test]
    fn std_io_conversion_maps_to_output_variant() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let mapped: Error = io_error.into();
        assert!(matches!(mapped, Error::Output { .. }));
    }
}
