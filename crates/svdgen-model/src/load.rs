//! Loading the top-level configuration and block definitions from disk.
//!
//! Both are stored as JSON renderings of the validated description. Block
//! definitions are usually kept one per file in a directory; [`load_block_dir`]
//! picks up every `.json` file there, in file-name order.

use std::path::{Path, PathBuf};

use crate::block::{BlockMap, IpBlock};
use crate::error::{ModelError, Result};
use crate::top::TopConfig;

fn read(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ModelError::NotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Load a top-level configuration from a JSON file.
pub fn load_top(path: &Path) -> Result<TopConfig> {
    parse_top(&read(path)?)
}

/// Parse a top-level configuration from a JSON string.
pub fn parse_top(json: &str) -> Result<TopConfig> {
    Ok(serde_json::from_str(json)?)
}

/// Load one block definition from a JSON file.
pub fn load_block(path: &Path) -> Result<IpBlock> {
    parse_block(&read(path)?)
}

/// Parse one block definition from a JSON string.
pub fn parse_block(json: &str) -> Result<IpBlock> {
    Ok(serde_json::from_str(json)?)
}

/// Load several block definitions into a map keyed by block name.
///
/// A name appearing twice is an error rather than a silent override.
pub fn load_blocks<P: AsRef<Path>>(paths: &[P]) -> Result<BlockMap> {
    let mut blocks = BlockMap::new();
    for path in paths {
        insert(&mut blocks, load_block(path.as_ref())?)?;
    }
    Ok(blocks)
}

/// Load every `*.json` block definition in `dir`.
pub fn load_block_dir(dir: &Path) -> Result<BlockMap> {
    if !dir.is_dir() {
        return Err(ModelError::NotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.retain(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"));
    paths.sort();

    load_blocks(&paths)
}

/// Add a block to `blocks`, rejecting duplicate names.
pub fn insert(blocks: &mut BlockMap, block: IpBlock) -> Result<()> {
    if blocks.contains_key(&block.name) {
        return Err(ModelError::DuplicateBlock { name: block.name });
    }
    blocks.insert(block.name.clone(), block);
    Ok(())
}
