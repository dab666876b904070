// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Loading of configuration documents and merging them into one tree.
//!
//! Documents are decoded as YAML or JSON depending on the file extension.
//! A directory argument expands to every supported file it contains, in
//! file name order, so that a directory of per-host files merges the same
//! way on every run.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    builder::TargetListBuilder,
    config::ConfigDocument,
    error::{self, Error},
    model::Target,
};

/// Encoding of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub enum Format
{
    /// YAML document (`.yaml`, `.yml`).
    Yaml,
    /// JSON document (`.json`).
    Json,
}

impl Format
{
    /// Detects the format from the extension of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the extension is missing or not
    /// supported.
    pub fn from_path(path: &Path,) -> Result<Self, Error,>
    {
        let extension =
            path.extension().and_then(|value| value.to_str(),).map(str::to_ascii_lowercase,);

        match extension.as_deref() {
            Some("yaml" | "yml",) => Ok(Self::Yaml,),
            Some("json",) => Ok(Self::Json,),
            _ => Err(Error::validation(format!(
                "unsupported configuration format for {}",
                path.display()
            ),),),
        }
    }
}

/// Merged configuration tree ready for serialization.
#[derive(Debug, Serialize, Clone, PartialEq, Eq,)]
pub struct MergedDocument
{
    /// Deduplicated targets in first-seen order.
    pub targets:        Vec<Target,>,
    /// Number of distinct sink configurations across all targets.
    pub distinct_sinks: usize,
}

/// Parses a configuration document from a string.
///
/// `origin` names the document in error messages; it is not read.
///
/// # Errors
///
/// Returns [`Error::Parse`] or [`Error::ParseJson`] when the contents cannot
/// be decoded in the requested format.
pub fn parse_document(
    contents: &str,
    format: Format,
    origin: &Path,
) -> Result<ConfigDocument, Error,>
{
    match format {
        Format::Yaml => {
            serde_yaml::from_str(contents,).map_err(|source| error::parse_error(origin, source,),)
        }
        Format::Json => {
            serde_json::from_str(contents,).map_err(|source| error::json_error(origin, source,),)
        }
    }
}

/// Reads and parses one configuration file.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read, [`Error::Validation`]
/// for unsupported extensions, and a parse error naming `path` for malformed
/// contents.
pub fn load_document(path: &Path,) -> Result<ConfigDocument, Error,>
{
    let format = Format::from_path(path,)?;
    debug!("Reading {:?} configuration from {}", format, path.display());
    let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
    let document = parse_document(&contents, format, path,)?;
    debug!("Parsed {} targets from {}", document.targets.len(), path.display());
    Ok(document,)
}

/// Expands `path` into the configuration files it designates.
///
/// Plain files are returned as-is. Directories yield their supported files
/// sorted by name; nested directories are not descended into.
///
/// # Errors
///
/// Returns [`Error::Io`] when the directory cannot be listed.
pub fn collect_config_files(path: &Path,) -> Result<Vec<PathBuf,>, Error,>
{
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()],);
    }

    let entries = fs::read_dir(path,).map_err(|source| error::io_error(path, source,),)?;
    let mut files = Vec::new();
    for entry in entries {
        let candidate = entry.map_err(|source| error::io_error(path, source,),)?.path();
        if candidate.is_file() && Format::from_path(&candidate,).is_ok() {
            files.push(candidate,);
        }
    }
    files.sort();
    debug!("Found {} configuration files in {}", files.len(), path.display());
    Ok(files,)
}

/// Merges already parsed documents, in order, into one canonical tree.
pub fn merge_documents<'a, I,>(documents: I,) -> MergedDocument
where
    I: IntoIterator<Item = &'a ConfigDocument,>,
{
    let mut builder = TargetListBuilder::new();
    for document in documents {
        builder.add_all(&document.to_targets(),);
    }

    let distinct_sinks = builder.distinct_sinks();
    MergedDocument {
        targets: builder.build(),
        distinct_sinks,
    }
}

/// Loads every configuration file designated by `paths` and merges them.
///
/// # Errors
///
/// Returns [`Error::Validation`] when `paths` is empty and propagates any
/// error from [`collect_config_files`] or [`load_document`].
pub fn load_merged<P,>(paths: &[P],) -> Result<MergedDocument, Error,>
where
    P: AsRef<Path,>,
{
    if paths.is_empty() {
        return Err(Error::validation("at least one configuration path is required",),);
    }

    let mut documents = Vec::new();
    for path in paths {
        for file in collect_config_files(path.as_ref(),)? {
            documents.push(load_document(&file,)?,);
        }
    }

    info!("Merging {} configuration documents", documents.len());
    Ok(merge_documents(&documents,),)
}
