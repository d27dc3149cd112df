//! Input model for the SVD generator.
//!
//! The types in this crate mirror the validated register description produced
//! by the upstream register tooling: a top-level configuration listing module
//! instances, and one block definition per module type holding its register
//! list and interrupts. Every derived value (absolute offsets, reset values,
//! masks, window valid bits) is taken as given.
//!
//! The register list is a closed set of entry kinds, see [`RegisterEntry`].

pub mod block;
pub mod error;
pub mod load;
pub mod number;
pub mod register;
pub mod top;

pub use block::{BlockMap, Interrupt, IpBlock};
pub use error::{ModelError, Result};
pub use load::{load_block, load_block_dir, load_blocks, load_top, parse_block, parse_top};
pub use register::{
    BitInfo, FieldSpec, MultiregSpec, RegisterEntry, RegisterSpec, ReservedEntry, SameAddrGroup,
    WindowSpec,
};
pub use top::{ModuleSpec, TopConfig};
