use std::{ffi::OsString, path::PathBuf};

/// Environment variable naming an explicit font file for the watermark text.
pub const ENV_FONT: &str = "IDMARK_FONT";
/// Environment variable listing extra font directories (platform path-list syntax).
pub const ENV_FONT_DIRS: &str = "IDMARK_FONT_DIRS";

/// Process-level settings that are not part of a [`crate::WatermarkSpec`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    /// Font file to use instead of font discovery.
    pub font_file: Option<PathBuf>,
    /// Directories searched for fonts in addition to system fonts.
    pub font_dirs: Vec<PathBuf>,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let font_file = lookup(ENV_FONT)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let font_dirs = lookup(ENV_FONT_DIRS)
            .map(|v| {
                std::env::split_paths(&v)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            font_file,
            font_dirs,
        }
    }

    /// Replace the font file when `font_file` is given.
    pub fn with_font_file(mut self, font_file: Option<PathBuf>) -> Self {
        if font_file.is_some() {
            self.font_file = font_file;
        }
        self
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/settings.rs"]
mod tests;
