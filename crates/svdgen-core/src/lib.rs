//! Register-map to SVD compiler.
//!
//! Turns a validated top-level configuration plus its block definitions into
//! a System View Description document. The work happens in stages, each
//! producing a subtree consumed by the next:
//!
//! - [`access`] and [`bits`]: leaf lookups for access modes and bit ranges
//! - [`register`]: one register list entry to zero or more nodes
//! - [`cluster`]: multiregs as `<cluster>` nodes with relative offsets
//! - [`peripheral`] and [`device`]: the document skeleton
//! - [`validate`]: structural checks on the finished tree
//! - [`serialize`]: indented XML text
//!
//! [`pipeline::render`] runs all of them.

pub mod access;
pub mod bits;
pub mod cluster;
pub mod device;
pub mod error;
pub mod node;
pub mod peripheral;
pub mod pipeline;
pub mod register;
pub mod serialize;
pub mod validate;

pub use access::{access_modes, Access, AccessModes, ModifiedWriteValues, ReadAction};
pub use bits::{bit_range, BitRange};
pub use cluster::build_cluster;
pub use device::{build_device, resolve_device, Device};
pub use error::{Result, SvdError};
pub use node::{hex, Node, NodeBuilder};
pub use peripheral::{build_peripheral, Peripheral};
pub use pipeline::{convert, render, PipelineConfig, PipelineOutput, TreeStats};
pub use register::{compile_entries, compile_entry};
pub use serialize::{to_svd_string, write_svd, GENERATED_HEADER};
pub use validate::{check, validate, Violation};
