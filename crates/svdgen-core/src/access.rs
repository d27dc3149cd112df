//! Software access labels to SVD access attributes.
//!
//! The register description uses one label per register or field (`rw1c`,
//! `rc`, ...). SVD splits the same information across three optional
//! elements: `access`, `readAction` and `modifiedWriteValues`.

use std::fmt;

use crate::error::{Result, SvdError};
use crate::node::NodeBuilder;

/// SVD `access` values emitted by this generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    ReadWrite,
    WriteOnly,
}

impl Access {
    pub fn as_str(self) -> &'static str {
        match self {
            Access::ReadOnly => "read-only",
            Access::ReadWrite => "read-write",
            Access::WriteOnly => "write-only",
        }
    }
}

/// SVD `readAction` values emitted by this generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadAction {
    /// Reading clears the register.
    Clear,
}

impl ReadAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ReadAction::Clear => "clear",
        }
    }
}

/// SVD `modifiedWriteValues` values emitted by this generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifiedWriteValues {
    OneToClear,
    OneToSet,
    ZeroToClear,
}

impl ModifiedWriteValues {
    pub fn as_str(self) -> &'static str {
        match self {
            ModifiedWriteValues::OneToClear => "oneToClear",
            ModifiedWriteValues::OneToSet => "oneToSet",
            ModifiedWriteValues::ZeroToClear => "zeroToClear",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

display_as_str!(Access, ReadAction, ModifiedWriteValues);

/// The SVD attributes for one access label. Unset parts are omitted from
/// the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessModes {
    pub access: Option<Access>,
    pub read_action: Option<ReadAction>,
    pub modified_write_values: Option<ModifiedWriteValues>,
}

impl AccessModes {
    const fn new(
        access: Access,
        read_action: Option<ReadAction>,
        modified_write_values: Option<ModifiedWriteValues>,
    ) -> Self {
        Self {
            access: Some(access),
            read_action,
            modified_write_values,
        }
    }

    /// Append the `access`, `readAction` and `modifiedWriteValues` leaves
    /// that are set.
    pub fn apply(self, builder: NodeBuilder) -> NodeBuilder {
        builder
            .leaf_opt("access", self.access)
            .leaf_opt("readAction", self.read_action)
            .leaf_opt("modifiedWriteValues", self.modified_write_values)
    }
}

/// Map a software access label to its SVD attributes.
///
/// `r0w1c` (reads return zero, writing one clears) has no SVD equivalent.
/// Software may assume the read value is always zero, so it is described as
/// write-only with one-to-clear semantics.
///
/// `owner` names the register or field carrying the label and is only used
/// in the error.
pub fn access_modes(label: Option<&str>, owner: &str) -> Result<AccessModes> {
    use Access::*;
    use ModifiedWriteValues::*;

    let Some(label) = label else {
        return Ok(AccessModes::default());
    };

    let modes = match label {
        "ro" => AccessModes::new(ReadOnly, None, None),
        "rc" => AccessModes::new(ReadOnly, Some(ReadAction::Clear), None),
        "rw" => AccessModes::new(ReadWrite, None, None),
        "r0w1c" => AccessModes::new(WriteOnly, None, Some(OneToClear)),
        "rw1s" => AccessModes::new(ReadWrite, None, Some(OneToSet)),
        "rw1c" => AccessModes::new(ReadWrite, None, Some(OneToClear)),
        "rw0c" => AccessModes::new(ReadWrite, None, Some(ZeroToClear)),
        "wo" => AccessModes::new(WriteOnly, None, None),
        other => {
            return Err(SvdError::UnrecognizedAccessMode {
                label: other.to_string(),
                owner: owner.to_string(),
            })
        }
    };
    Ok(modes)
}
