use std::path::{Path, PathBuf};

#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[derive(Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// JSON layout file
    pub input: PathBuf,
    /// Directory receiving `devinfo.h` and the device headers
    pub output_dir: PathBuf,
    pub log_level: Option<String>,
}

impl Config {
    pub fn new(output_dir: impl Into<PathBuf>, input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            log_level: None,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
