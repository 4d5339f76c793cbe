use std::path::{Path, PathBuf};

/// A path split into directory, stem and extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathName<'a> {
    pub parent: &'a Path,
    pub stem: &'a str,
    pub extension: Option<&'a str>,
}

impl<'a> PathName<'a> {
    /// `None` when the path has no file name or it is not valid UTF-8.
    pub fn parse(path: &'a Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        let extension = match path.extension() {
            Some(ext) => Some(ext.to_str()?),
            None => None,
        };
        Some(Self {
            parent: path.parent().unwrap_or_else(|| Path::new("")),
            stem,
            extension,
        })
    }

    /// Same directory and extension, different stem.
    pub fn with_stem(&self, stem: &str) -> PathBuf {
        let mut name = stem.to_string();
        if let Some(ext) = self.extension {
            name.push('.');
            name.push_str(ext);
        }
        self.parent.join(name)
    }
}

/// Byte offset where the file-name portion of `path_name` begins.
pub fn file_name_start(path_name: &str) -> usize {
    path_name
        .rfind(std::path::is_separator)
        .map(|i| i + 1)
        .unwrap_or(0)
}
