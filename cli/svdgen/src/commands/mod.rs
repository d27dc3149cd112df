//! CLI command implementations.

pub mod check;
pub mod generate;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use svdgen_core::PipelineConfig;
use svdgen_model::{load, BlockMap, TopConfig};
use tracing::info;

use crate::manifest::SvdgenManifest;

/// Input locations given on the command line. Relative paths are taken
/// from the working directory.
#[derive(Debug, Clone, Default)]
pub struct InputArgs {
    pub top: Option<PathBuf>,
    pub ip_dirs: Vec<PathBuf>,
    pub ip_files: Vec<PathBuf>,
}

/// The working directory plus the manifest governing it, if any.
#[derive(Debug, Clone)]
pub struct Project {
    pub cwd: PathBuf,
    pub manifest: Option<(SvdgenManifest, PathBuf)>,
}

impl Project {
    pub fn discover(cwd: &Path) -> Result<Self> {
        let manifest = SvdgenManifest::find_and_load(cwd)?;
        if let Some((_, dir)) = &manifest {
            info!(manifest = %dir.display(), "using manifest");
        }
        Ok(Self {
            cwd: cwd.to_path_buf(),
            manifest,
        })
    }

    fn manifest(&self) -> Option<&SvdgenManifest> {
        self.manifest.as_ref().map(|(m, _)| m)
    }

    /// A manifest path, resolved against the manifest's directory.
    fn from_manifest(&self, pick: impl Fn(&SvdgenManifest) -> Option<&PathBuf>) -> Option<PathBuf> {
        let (manifest, dir) = self.manifest.as_ref()?;
        pick(manifest).map(|path| dir.join(path))
    }

    fn from_cwd(&self, path: &Path) -> PathBuf {
        self.cwd.join(path)
    }

    /// Effective inputs: command-line sources win over the manifest's.
    pub fn input_paths(&self, args: &InputArgs) -> Result<InputPaths> {
        let top = match &args.top {
            Some(path) => self.from_cwd(path),
            None => match self.from_manifest(|m| m.input.top.as_ref()) {
                Some(path) => path,
                None => bail!(
                    "no top-level configuration given; pass --top or set [input] top in svdgen.toml"
                ),
            },
        };

        let (ip_dirs, ip_files) = if args.ip_dirs.is_empty() && args.ip_files.is_empty() {
            let dirs: Vec<_> = self.from_manifest(|m| m.input.ip_dir.as_ref()).into_iter().collect();
            (dirs, Vec::new())
        } else {
            (
                args.ip_dirs.iter().map(|p| self.from_cwd(p)).collect(),
                args.ip_files.iter().map(|p| self.from_cwd(p)).collect(),
            )
        };
        if ip_dirs.is_empty() && ip_files.is_empty() {
            bail!("no block definitions given; pass --ip-dir/--ip or set [input] ip-dir in svdgen.toml");
        }

        Ok(InputPaths {
            top,
            ip_dirs,
            ip_files,
        })
    }

    /// Effective output path: `-o` wins over the manifest. `None` is stdout.
    pub fn output_path(&self, flag: Option<&Path>) -> Option<PathBuf> {
        match flag {
            Some(path) => Some(self.from_cwd(path)),
            None => self.from_manifest(|m| m.output.path.as_ref()),
        }
    }

    /// Pipeline settings for `top`: flags, then manifest, then defaults.
    pub fn pipeline_config(
        &self,
        top: &TopConfig,
        version: Option<&str>,
        description: Option<&str>,
        no_verify: bool,
    ) -> PipelineConfig {
        let mut config = PipelineConfig::for_device(&top.name);
        let device = self.manifest().map(|m| &m.device);

        if let Some(v) = version.or_else(|| device.and_then(|d| d.version.as_deref())) {
            config.version = v.to_string();
        }
        if let Some(d) = description.or_else(|| device.and_then(|d| d.description.as_deref())) {
            config.description = d.to_string();
        }
        config.verify = !no_verify
            && self
                .manifest()
                .and_then(|m| m.output.verify)
                .unwrap_or(true);
        config
    }
}

/// Resolved input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub top: PathBuf,
    pub ip_dirs: Vec<PathBuf>,
    pub ip_files: Vec<PathBuf>,
}

impl InputPaths {
    /// Load the top-level configuration and every block definition. A block
    /// name defined by two sources is an error.
    pub fn load(&self) -> Result<(TopConfig, BlockMap)> {
        let top = load::load_top(&self.top)
            .with_context(|| format!("loading {}", self.top.display()))?;

        let mut blocks = BlockMap::new();
        for dir in &self.ip_dirs {
            let found = load::load_block_dir(dir)
                .with_context(|| format!("loading block definitions from {}", dir.display()))?;
            for block in found.into_values() {
                load::insert(&mut blocks, block)?;
            }
        }
        for file in &self.ip_files {
            let block = load::load_block(file)
                .with_context(|| format!("loading {}", file.display()))?;
            load::insert(&mut blocks, block)?;
        }

        info!(
            top = %top.name,
            modules = top.modules.len(),
            blocks = blocks.len(),
            "inputs loaded"
        );
        Ok((top, blocks))
    }
}
