//! Conversion errors.

use thiserror::Error;

/// Errors raised while building or writing an SVD document. All of them
/// abort the conversion.
#[derive(Debug, Error)]
pub enum SvdError {
    #[error("unrecognized software access mode `{label}` on {owner}")]
    UnrecognizedAccessMode { label: String, owner: String },

    #[error("field {field} has invalid bit width {width}")]
    InvalidBitWidth { field: String, width: u32 },

    #[error("could not determine {kind} offset: {entry}")]
    MissingOffset { kind: &'static str, entry: String },

    #[error("register {name} at {offset:#x} lies below its base {base:#x}")]
    OffsetBelowBase { name: String, offset: u64, base: u64 },

    #[error("multireg `{name}`: nesting multireg elements is not supported")]
    NestedMultiregUnsupported { name: String },

    #[error("module `{module}` has type `{ty}` with no register definition")]
    UnresolvedModuleType { module: String, ty: String },

    #[error("schema violation at {node}: {reason}")]
    SchemaViolation { node: String, reason: String },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, SvdError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SvdError::UnrecognizedAccessMode {
            label: "rw2c".into(),
            owner: "register CTRL".into(),
        };
        assert_eq!(
            err.to_string(),
            "unrecognized software access mode `rw2c` on register CTRL"
        );

        let err = SvdError::OffsetBelowBase {
            name: "R".into(),
            offset: 0x4,
            base: 0x10,
        };
        assert!(err.to_string().contains("0x4"));
        assert!(err.to_string().contains("0x10"));

        let err = SvdError::MissingOffset {
            kind: "window",
            entry: "{}".into(),
        };
        assert_eq!(err.to_string(), "could not determine window offset: {}");
    }
}
