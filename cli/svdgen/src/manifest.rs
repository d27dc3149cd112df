//! `svdgen.toml` manifest parsing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const MANIFEST_NAME: &str = "svdgen.toml";

/// Project-level defaults for `svdgen` runs. Every value can be overridden
/// on the command line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SvdgenManifest {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Device identification written into the document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Where the register descriptions live, relative to the manifest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct InputConfig {
    /// Top-level configuration JSON.
    #[serde(default)]
    pub top: Option<PathBuf>,
    /// Directory of block definition JSON files.
    #[serde(default)]
    pub ip_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output file; stdout when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Run structural validation before writing.
    #[serde(default)]
    pub verify: Option<bool>,
}

impl SvdgenManifest {
    /// Search upward from `start_dir` for an `svdgen.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_NAME);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: SvdgenManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing svdgen.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_manifest() {
        let manifest = SvdgenManifest::from_str(
            r#"
[device]
version = "2.0"
description = "Earl Grey"

[input]
top = "hw/top.json"
ip-dir = "hw/ip"

[output]
path = "build/earlgrey.svd"
verify = false
"#,
        )
        .unwrap();

        assert_eq!(manifest.device.version.as_deref(), Some("2.0"));
        assert_eq!(manifest.device.description.as_deref(), Some("Earl Grey"));
        assert_eq!(manifest.input.top, Some(PathBuf::from("hw/top.json")));
        assert_eq!(manifest.input.ip_dir, Some(PathBuf::from("hw/ip")));
        assert_eq!(manifest.output.path, Some(PathBuf::from("build/earlgrey.svd")));
        assert_eq!(manifest.output.verify, Some(false));
    }

    #[test]
    fn empty_manifest_is_all_defaults() {
        let manifest = SvdgenManifest::from_str("").unwrap();
        assert!(manifest.device.version.is_none());
        assert!(manifest.input.top.is_none());
        assert!(manifest.output.verify.is_none());
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(SvdgenManifest::from_str("[input]\nipdir = \"ip\"\n").is_err());
    }

    #[test]
    fn find_walks_upward() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_NAME),
            "[device]\nversion = \"3.1\"\n",
        )
        .unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let (manifest, found) = SvdgenManifest::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(found, dir.path());
        assert_eq!(manifest.device.version.as_deref(), Some("3.1"));
    }

    #[test]
    fn find_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_NAME), "[device\n").unwrap();
        let err = SvdgenManifest::find_and_load(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
