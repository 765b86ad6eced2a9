//! Input discovery: walk search roots and pick the files a module can parse.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use globset::{Glob, GlobMatcher};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::sample::clean_sample_name;
use crate::report::ReportError;
use crate::utils::validation::{validate_text_content, MAX_INPUT_FILE_SIZE};

/// How a module recognises its input files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPattern {
    /// Glob matched against the file name
    #[serde(rename = "fn")]
    pub fn_glob: String,

    /// Text that must appear in the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,

    /// Only look for `contents` in this many leading lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_lines: Option<usize>,
}

impl SearchPattern {
    pub fn new(fn_glob: impl Into<String>) -> Self {
        Self {
            fn_glob: fn_glob.into(),
            contents: None,
            num_lines: None,
        }
    }

    #[must_use]
    pub fn with_contents(mut self, contents: impl Into<String>, num_lines: Option<usize>) -> Self {
        self.contents = Some(contents.into());
        self.num_lines = num_lines;
        self
    }

    /// Compile the file name glob
    ///
    /// # Errors
    ///
    /// Returns the glob error if `fn_glob` is not a valid pattern.
    pub fn matcher(&self) -> Result<GlobMatcher, globset::Error> {
        Ok(Glob::new(&self.fn_glob)?.compile_matcher())
    }

    /// Whether `text` satisfies the content requirement
    #[must_use]
    pub fn content_matches(&self, text: &str) -> bool {
        let Some(needle) = self.contents.as_deref() else {
            return true;
        };
        match self.num_lines {
            Some(n) => text.lines().take(n).any(|line| line.contains(needle)),
            None => text.contains(needle),
        }
    }
}

impl std::fmt::Display for SearchPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fn_glob)?;
        if let Some(contents) = &self.contents {
            write!(f, " containing '{contents}'")?;
            if let Some(n) = self.num_lines {
                write!(f, " in first {n} line(s)")?;
            }
        }
        Ok(())
    }
}

/// A discovered input file with its content loaded
#[derive(Debug, Clone)]
pub struct InputFile {
    /// Full path to the file
    pub path: PathBuf,
    /// Search root the file was found under
    pub root: PathBuf,
    /// File name without directories
    pub file_name: String,
    /// File name with known extensions removed
    pub sample_name: String,
    /// Raw text content (decompressed for `.gz` files)
    pub content: String,
}

impl InputFile {
    /// Load a file from disk
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Io` if the file cannot be read or decompressed,
    /// or `ReportError::InvalidInput` if it is not text.
    pub fn load<S: AsRef<str>>(
        path: &Path,
        root: &Path,
        clean_extensions: &[S],
    ) -> Result<Self, ReportError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content = read_text(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
            sample_name: clean_sample_name(&file_name, clean_extensions),
            file_name,
            content,
        })
    }

    /// Build an input from in-memory text
    pub fn from_text<S: AsRef<str>>(
        file_name: impl Into<String>,
        content: impl Into<String>,
        clean_extensions: &[S],
    ) -> Self {
        let file_name = file_name.into();
        Self {
            path: PathBuf::from(&file_name),
            root: PathBuf::new(),
            sample_name: clean_sample_name(&file_name, clean_extensions),
            file_name,
            content: content.into(),
        }
    }
}

/// Read a text file, transparently decompressing `.gz`
fn read_text(path: &Path) -> Result<String, ReportError> {
    let mut bytes = Vec::new();
    let file = File::open(path)?;
    let is_gzip = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"));
    if is_gzip {
        GzDecoder::new(file).read_to_end(&mut bytes)?;
    } else {
        let mut file = file;
        file.read_to_end(&mut bytes)?;
    }

    validate_text_content(&bytes)
        .map_err(|e| ReportError::InvalidInput(format!("{}: {e}", path.display())))?;
    String::from_utf8(bytes)
        .map_err(|_| ReportError::InvalidInput(format!("{}: not valid UTF-8", path.display())))
}

/// Find every file under `roots` matching `pattern`.
///
/// Results are sorted by path within each root. Unreadable, oversized or
/// binary files are skipped with a warning.
///
/// # Errors
///
/// Returns `ReportError::Pattern` if the file name glob is invalid.
pub fn discover_inputs<S: AsRef<str>>(
    roots: &[PathBuf],
    pattern: &SearchPattern,
    clean_extensions: &[S],
) -> Result<Vec<InputFile>, ReportError> {
    let matcher = pattern.matcher()?;
    let mut inputs = Vec::new();

    for root in roots {
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable path");
                    None
                }
            });

        for entry in walker {
            if !entry.file_type().is_file() {
                continue;
            }
            if !matcher.is_match(entry.file_name()) {
                continue;
            }

            let path = entry.path();
            let too_large = entry
                .metadata()
                .map(|m| m.len() > MAX_INPUT_FILE_SIZE)
                .unwrap_or(false);
            if too_large {
                warn!(path = %path.display(), "Skipping file larger than the size limit");
                continue;
            }

            let input = match InputFile::load(path, root, clean_extensions) {
                Ok(input) => input,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable file");
                    continue;
                }
            };

            if !pattern.content_matches(&input.content) {
                debug!(path = %path.display(), "File name matched but contents did not");
                continue;
            }

            debug!(path = %path.display(), "Found input file");
            inputs.push(input);
        }
    }

    Ok(inputs)
}
