//! Register list entries.
//!
//! A block's register list mixes several kinds of entry, distinguished in the
//! source description by which key an object carries (`reserved`, `skipto`,
//! `window`, `sameaddr`, `multireg`, or none of these for a plain register).
//! [`RegisterEntry`] turns that convention into a closed enum.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::number;

/// Bit placement of a field: `[bits_used_mask, width, lsb]` in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BitInfoRepr", into = "(u64, u32, u32)")]
pub struct BitInfo {
    pub mask: u64,
    pub width: u32,
    pub lsb: u32,
}

impl BitInfo {
    /// Placement for a field of `width` bits starting at `lsb`.
    pub fn new(width: u32, lsb: u32) -> Self {
        let ones = if width >= 64 {
            u64::MAX
        } else {
            (1u64 << width) - 1
        };
        Self {
            mask: ones.checked_shl(lsb).unwrap_or(0),
            width,
            lsb,
        }
    }
}

/// `bitinfo` triple; each element may be quoted.
#[derive(Deserialize)]
struct BitInfoRepr(
    #[serde(deserialize_with = "number::deserialize")] u64,
    #[serde(deserialize_with = "number::deserialize")] u32,
    #[serde(deserialize_with = "number::deserialize")] u32,
);

impl From<BitInfoRepr> for BitInfo {
    fn from(BitInfoRepr(mask, width, lsb): BitInfoRepr) -> Self {
        Self { mask, width, lsb }
    }
}

impl From<BitInfo> for (u64, u32, u32) {
    fn from(bits: BitInfo) -> Self {
        (bits.mask, bits.width, bits.lsb)
    }
}

/// A bit field inside a register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "desc")]
    pub description: String,
    #[serde(rename = "bitinfo")]
    pub bits: BitInfo,
    /// Software access label (`ro`, `rw1c`, ...). Absent means unspecified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swaccess: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, width: u32, lsb: u32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            bits: BitInfo::new(width, lsb),
            swaccess: None,
        }
    }

    pub fn with_swaccess(mut self, label: impl Into<String>) -> Self {
        self.swaccess = Some(label.into());
        self
    }

    pub fn width(&self) -> u32 {
        self.bits.width
    }

    pub fn lsb(&self) -> u32 {
        self.bits.lsb
    }
}

/// A single register.
///
/// `offset` is the absolute offset from the peripheral base as computed
/// upstream (`genoffset`). It is optional here only so that a malformed entry
/// can be reported with its full contents instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSpec {
    pub name: String,
    #[serde(rename = "desc")]
    pub description: String,
    #[serde(
        rename = "genoffset",
        default,
        deserialize_with = "number::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub offset: Option<u64>,
    #[serde(
        rename = "genbitsused",
        default,
        deserialize_with = "number::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub bits_used: Option<u64>,
    #[serde(
        rename = "genresval",
        default,
        deserialize_with = "number::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub reset_value: Option<u64>,
    #[serde(
        rename = "genresmask",
        default,
        deserialize_with = "number::deserialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub reset_mask: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swaccess: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSpec>,
}

impl RegisterSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, offset: u64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            offset: Some(offset),
            bits_used: None,
            reset_value: None,
            reset_mask: None,
            swaccess: None,
            fields: Vec::new(),
        }
    }

    pub fn with_swaccess(mut self, label: impl Into<String>) -> Self {
        self.swaccess = Some(label.into());
        self
    }

    pub fn with_reset(mut self, value: u64, mask: u64) -> Self {
        self.reset_value = Some(value);
        self.reset_mask = Some(mask);
        self
    }

    pub fn with_bits_used(mut self, mask: u64) -> Self {
        self.bits_used = Some(mask);
        self
    }

    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }
}

/// A memory window: `items` repeated registers described by one template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    #[serde(flatten)]
    pub register: RegisterSpec,
    #[serde(deserialize_with = "number::deserialize")]
    pub items: u64,
    /// Valid bits per item; the item stride is `valid_bits / 8` bytes.
    #[serde(rename = "genvalidbits", deserialize_with = "number::deserialize")]
    pub valid_bits: u64,
}

impl WindowSpec {
    pub fn new(register: RegisterSpec, items: u64, valid_bits: u64) -> Self {
        Self {
            register,
            items,
            valid_bits,
        }
    }
}

/// A generator-expanded group of registers emitted as one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiregSpec {
    pub name: String,
    #[serde(rename = "desc")]
    pub description: String,
    /// Fully expanded member registers with absolute offsets.
    pub genregs: Vec<RegisterEntry>,
}

impl MultiregSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, genregs: Vec<RegisterEntry>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            genregs,
        }
    }
}

/// Alternative views of the same address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SameAddrGroup {
    pub members: Vec<RegisterEntry>,
}

/// An address range that produces no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedEntry {
    /// `reserved`: a number of unused register slots.
    Reserved(u64),
    /// `skipto`: jump the allocation cursor to an offset.
    SkipTo(u64),
}

/// One entry of a block's register list.
///
/// Deserialization classifies an object by the first key present, in the
/// order `reserved`, `skipto`, `window`, `sameaddr`, `multireg`, and only
/// then parses the matching variant, so errors name the actual problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "EntryRepr")]
pub enum RegisterEntry {
    Reserved(ReservedEntry),
    Window(WindowSpec),
    SameAddr(SameAddrGroup),
    Multireg(MultiregSpec),
    Register(RegisterSpec),
}

impl RegisterEntry {
    /// Short kind name, used in diagnostics such as missing-offset errors.
    pub fn kind(&self) -> &'static str {
        match self {
            RegisterEntry::Reserved(_) => "reserved",
            RegisterEntry::Window(_) => "window",
            RegisterEntry::SameAddr(_) => "sameaddr",
            RegisterEntry::Multireg(_) => "multireg",
            RegisterEntry::Register(_) => "register",
        }
    }

    /// Pretty JSON rendering in the source layout.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

impl From<RegisterSpec> for RegisterEntry {
    fn from(reg: RegisterSpec) -> Self {
        RegisterEntry::Register(reg)
    }
}

impl From<WindowSpec> for RegisterEntry {
    fn from(window: WindowSpec) -> Self {
        RegisterEntry::Window(window)
    }
}

impl From<MultiregSpec> for RegisterEntry {
    fn from(multi: MultiregSpec) -> Self {
        RegisterEntry::Multireg(multi)
    }
}

impl From<SameAddrGroup> for RegisterEntry {
    fn from(group: SameAddrGroup) -> Self {
        RegisterEntry::SameAddr(group)
    }
}

impl<'de> Deserialize<'de> for RegisterEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut object = Map::<String, Value>::deserialize(deserializer)?;

        let (key, parsed) = if let Some(value) = object.remove("reserved") {
            let parsed = number::deserialize(value).map(ReservedEntry::Reserved);
            ("reserved", parsed.map(RegisterEntry::Reserved))
        } else if let Some(value) = object.remove("skipto") {
            let parsed = number::deserialize(value).map(ReservedEntry::SkipTo);
            ("skipto", parsed.map(RegisterEntry::Reserved))
        } else if let Some(value) = object.remove("window") {
            ("window", WindowSpec::deserialize(value).map(RegisterEntry::Window))
        } else if let Some(value) = object.remove("sameaddr") {
            let parsed = Vec::<RegisterEntry>::deserialize(value)
                .map(|members| RegisterEntry::SameAddr(SameAddrGroup { members }));
            ("sameaddr", parsed)
        } else if let Some(value) = object.remove("multireg") {
            ("multireg", MultiregSpec::deserialize(value).map(RegisterEntry::Multireg))
        } else {
            let parsed = RegisterSpec::deserialize(Value::Object(object));
            ("register", parsed.map(RegisterEntry::Register))
        };

        parsed.map_err(|e| de::Error::custom(format!("invalid {key} entry: {e}")))
    }
}

/// Source layout of an entry, for serialization.
#[derive(Serialize)]
#[serde(untagged)]
enum EntryRepr {
    Reserved {
        reserved: u64,
    },
    SkipTo {
        skipto: u64,
    },
    Window {
        window: WindowSpec,
    },
    SameAddr {
        sameaddr: Vec<RegisterEntry>,
    },
    Multireg {
        multireg: MultiregSpec,
    },
    Register(RegisterSpec),
}

impl From<RegisterEntry> for EntryRepr {
    fn from(entry: RegisterEntry) -> Self {
        match entry {
            RegisterEntry::Reserved(ReservedEntry::Reserved(reserved)) => {
                EntryRepr::Reserved { reserved }
            }
            RegisterEntry::Reserved(ReservedEntry::SkipTo(skipto)) => EntryRepr::SkipTo { skipto },
            RegisterEntry::Window(window) => EntryRepr::Window { window },
            RegisterEntry::SameAddr(group) => EntryRepr::SameAddr {
                sameaddr: group.members,
            },
            RegisterEntry::Multireg(multireg) => EntryRepr::Multireg { multireg },
            RegisterEntry::Register(reg) => EntryRepr::Register(reg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(json: &str) -> Vec<RegisterEntry> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn classify_every_kind() {
        let list = entries(
            r#"[
                {"reserved": "2"},
                {"skipto": "0x100"},
                {"window": {"name": "buf", "desc": "buffer", "genoffset": 256,
                            "items": "16", "genvalidbits": 32, "swaccess": "rw"}},
                {"sameaddr": [
                    {"name": "A", "desc": "view a", "genoffset": 8},
                    {"name": "B", "desc": "view b", "genoffset": 8}
                ]},
                {"multireg": {"name": "en", "desc": "enables", "count": 2, "genregs": [
                    {"name": "en0", "desc": "enable 0", "genoffset": 16}
                ]}},
                {"name": "CTRL", "desc": "control", "genoffset": "0x0",
                 "genresval": 0, "genresmask": "0xff", "swaccess": "rw",
                 "fields": [
                    {"name": "go", "desc": "start", "bitinfo": [1, 1, 0]},
                    {"name": "mode", "desc": "mode", "bitinfo": ["0x6", "2", "1"]}
                 ]}
            ]"#,
        );

        let kinds: Vec<_> = list.iter().map(RegisterEntry::kind).collect();
        assert_eq!(
            kinds,
            ["reserved", "reserved", "window", "sameaddr", "multireg", "register"]
        );
        assert_eq!(list[0], RegisterEntry::Reserved(ReservedEntry::Reserved(2)));
        assert_eq!(list[1], RegisterEntry::Reserved(ReservedEntry::SkipTo(0x100)));

        let RegisterEntry::Window(window) = &list[2] else {
            panic!("expected window");
        };
        assert_eq!(window.items, 16);
        assert_eq!(window.valid_bits, 32);
        assert_eq!(window.register.offset, Some(256));
        assert_eq!(window.register.swaccess.as_deref(), Some("rw"));

        let RegisterEntry::Register(reg) = &list[5] else {
            panic!("expected register");
        };
        assert_eq!(reg.offset, Some(0));
        assert_eq!(reg.reset_mask, Some(0xff));
        assert_eq!(reg.bits_used, None);
        assert_eq!(reg.fields[0].bits, BitInfo { mask: 1, width: 1, lsb: 0 });
        assert_eq!(reg.fields[1].bits, BitInfo { mask: 0x6, width: 2, lsb: 1 });
    }

    fn entry_error(json: &str) -> String {
        serde_json::from_str::<RegisterEntry>(json).unwrap_err().to_string()
    }

    #[test]
    fn malformed_entries_name_the_problem() {
        let err = entry_error(r#"{"window": {"name": "buf", "desc": "b", "genvalidbits": 32}}"#);
        assert!(err.contains("invalid window entry"), "{err}");
        assert!(err.contains("items"), "{err}");

        let err = entry_error(r#"{"multireg": {"name": "en", "desc": "enables"}}"#);
        assert!(err.contains("invalid multireg entry"), "{err}");
        assert!(err.contains("genregs"), "{err}");

        let err = entry_error(r#"{"name": "CTRL", "genoffset": 0}"#);
        assert!(err.contains("invalid register entry"), "{err}");
        assert!(err.contains("desc"), "{err}");

        let err = entry_error(r#"{"reserved": "lots"}"#);
        assert!(err.contains("invalid reserved entry"), "{err}");
        assert!(err.contains("invalid number `lots`"), "{err}");
    }

    #[test]
    fn bad_bitinfo_names_the_register() {
        let err = entry_error(
            r#"{"name": "CTRL", "desc": "c", "genoffset": 0,
                "fields": [{"name": "go", "desc": "g", "bitinfo": ["one", 1, 0]}]}"#,
        );
        assert!(err.contains("invalid register entry"), "{err}");
        assert!(err.contains("invalid number `one`"), "{err}");
    }

    #[test]
    fn register_without_offset_still_parses() {
        let list = entries(r#"[{"name": "LOST", "desc": "no offset"}]"#);
        let RegisterEntry::Register(reg) = &list[0] else {
            panic!("expected register");
        };
        assert_eq!(reg.offset, None);
        assert!(reg.fields.is_empty());
    }

    #[test]
    fn pretty_json_uses_source_keys() {
        let entry = RegisterEntry::from(WindowSpec::new(RegisterSpec::new("buf", "buffer", 0x40), 4, 32));
        let json = entry.to_pretty_json();
        assert!(json.contains("\"window\""));
        assert!(json.contains("\"genoffset\": 64"));
        assert!(json.contains("\"genvalidbits\": 32"));

        let again: RegisterEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(again, entry);
    }

    #[test]
    fn bit_info_mask() {
        assert_eq!(BitInfo::new(4, 8).mask, 0xf00);
        assert_eq!(BitInfo::new(32, 0).mask, 0xffff_ffff);
        assert_eq!(BitInfo::new(64, 0).mask, u64::MAX);
    }

    #[test]
    fn builders_fill_optional_values() {
        let reg = RegisterSpec::new("STATUS", "status", 0x4)
            .with_swaccess("ro")
            .with_reset(0x1, 0xff)
            .with_bits_used(0xff)
            .with_field(FieldSpec::new("ready", "ready", 1, 0).with_swaccess("rc"));
        assert_eq!(reg.reset_value, Some(1));
        assert_eq!(reg.fields[0].width(), 1);
        assert_eq!(reg.fields[0].lsb(), 0);
        assert_eq!(reg.fields[0].swaccess.as_deref(), Some("rc"));
    }
}
