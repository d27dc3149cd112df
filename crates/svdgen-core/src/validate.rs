//! Structural checks on a finished document.
//!
//! This is a sanity gate run before anything is written, not a full schema
//! validator. It covers the parts of the SVD schema this generator can get
//! wrong: required elements, element kinds, enumerated values, numeric
//! formats, bit ranges, dimensioned registers, and cluster nesting.

use crate::bits::BitRange;
use crate::error::{Result, SvdError};
use crate::node::Node;
use svdgen_model::number::parse_number;

/// A structural problem in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Slash-separated path to the offending node, with element names in
    /// brackets, e.g. `device/peripherals/peripheral[uart0]`.
    pub node: String,
    pub reason: String,
}

impl From<Violation> for SvdError {
    fn from(v: Violation) -> Self {
        SvdError::SchemaViolation {
            node: v.node,
            reason: v.reason,
        }
    }
}

const ACCESS: &[&str] = &[
    "read-only",
    "write-only",
    "read-write",
    "writeOnce",
    "read-writeOnce",
];
const READ_ACTION: &[&str] = &["clear", "set", "modify", "modifyExternal"];
const MODIFIED_WRITE_VALUES: &[&str] = &[
    "oneToClear",
    "oneToSet",
    "oneToToggle",
    "zeroToClear",
    "zeroToSet",
    "zeroToToggle",
    "clear",
    "set",
    "modify",
];

/// Tags that only ever hold a value.
const LEAF_TAGS: &[&str] = &[
    "vendor",
    "name",
    "version",
    "description",
    "width",
    "size",
    "addressUnitBits",
    "baseAddress",
    "addressOffset",
    "mask",
    "resetValue",
    "resetMask",
    "access",
    "readAction",
    "modifiedWriteValues",
    "bitRange",
    "dim",
    "dimIncrement",
    "value",
    "endian",
    "revision",
    "mpuPresent",
    "fpuPresent",
    "nvicPrioBits",
    "vendorSystickConfig",
];

/// Tags whose value must be a number.
const NUMERIC_TAGS: &[&str] = &[
    "width",
    "size",
    "addressUnitBits",
    "baseAddress",
    "addressOffset",
    "mask",
    "resetValue",
    "resetMask",
    "dim",
    "dimIncrement",
    "value",
    "nvicPrioBits",
];

/// Check `root` and return the first violation as an error.
pub fn validate(root: &Node) -> Result<()> {
    match check(root).into_iter().next() {
        Some(violation) => Err(violation.into()),
        None => Ok(()),
    }
}

/// Check `root` and return every violation, in document order.
pub fn check(root: &Node) -> Vec<Violation> {
    let mut checker = Checker::default();
    if root.tag() != Some("device") {
        checker.report(label(root), "document root must be <device>");
        return checker.violations;
    }
    checker.device(root);
    checker.violations
}

fn label(node: &Node) -> String {
    let tag = node.tag().unwrap_or("#comment");
    match node.child_text("name") {
        Some(name) if node.is_parent() && tag != "device" && tag != "cpu" => {
            format!("{tag}[{name}]")
        }
        _ => tag.to_string(),
    }
}

#[derive(Default)]
struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    fn report(&mut self, node: String, reason: impl Into<String>) {
        self.violations.push(Violation {
            node,
            reason: reason.into(),
        });
    }

    /// Rules shared by every element: leaf-only tags hold text and numeric
    /// tags parse. Returns the element's path.
    fn element(&mut self, node: &Node, parent: &str, required: &[&str]) -> String {
        let path = if parent.is_empty() {
            label(node)
        } else {
            format!("{parent}/{}", label(node))
        };
        for tag in required {
            if node.child(tag).is_none() {
                self.report(path.clone(), format!("missing required <{tag}>"));
            }
        }
        for child in node.children() {
            let Some(tag) = child.tag() else { continue };
            let is_leaf_tag = LEAF_TAGS.contains(&tag);
            if is_leaf_tag && child.is_parent() {
                self.report(format!("{path}/{tag}"), "must hold a value, not child elements");
            }
            if !is_leaf_tag && !child.is_parent() {
                self.report(format!("{path}/{tag}"), "must hold child elements, not a value");
            }
            if let Some(text) = child.text() {
                self.leaf_value(&path, tag, text);
            }
        }
        path
    }

    fn leaf_value(&mut self, path: &str, tag: &str, text: &str) {
        let allowed = match tag {
            "access" => Some(ACCESS),
            "readAction" => Some(READ_ACTION),
            "modifiedWriteValues" => Some(MODIFIED_WRITE_VALUES),
            _ => None,
        };
        if let Some(allowed) = allowed {
            if !allowed.contains(&text) {
                self.report(format!("{path}/{tag}"), format!("`{text}` is not a valid <{tag}>"));
            }
        }
        if NUMERIC_TAGS.contains(&tag) {
            match parse_number(text) {
                None => self.report(format!("{path}/{tag}"), format!("`{text}` is not a number")),
                Some(0) if tag == "size" => {
                    self.report(format!("{path}/{tag}"), "size must be at least one bit")
                }
                Some(_) => {}
            }
        }
        if tag == "bitRange" && BitRange::parse(text).is_none() {
            self.report(format!("{path}/{tag}"), format!("`{text}` is not a [msb:lsb] range"));
        }
    }

    fn device(&mut self, device: &Node) {
        let path = self.element(
            device,
            "",
            &[
                "name",
                "version",
                "description",
                "addressUnitBits",
                "width",
                "peripherals",
            ],
        );

        if let Some(cpu) = device.child("cpu") {
            self.element(cpu, &path, &["name", "endian"]);
        }
        if let Some(peripherals) = device.child("peripherals") {
            let list_path = format!("{path}/peripherals");
            for child in peripherals.children() {
                match child.tag() {
                    Some("peripheral") => self.peripheral(child, &list_path),
                    Some(other) => self.report(
                        format!("{list_path}/{other}"),
                        "only <peripheral> may appear in <peripherals>",
                    ),
                    None => {}
                }
            }
        }
    }

    fn peripheral(&mut self, peripheral: &Node, parent: &str) {
        let path = self.element(peripheral, parent, &["name", "baseAddress"]);

        for child in peripheral.children() {
            match child.tag() {
                Some("interrupt") => {
                    self.element(child, &path, &["name", "value"]);
                }
                Some("registers") => {
                    let registers_path = format!("{path}/registers");
                    self.register_list(child, &registers_path, false);
                }
                _ => {}
            }
        }
    }

    fn register_list(&mut self, list: &Node, path: &str, in_cluster: bool) {
        for child in list.children() {
            match child.tag() {
                Some("register") => self.register(child, path),
                Some("cluster") if in_cluster => {
                    self.report(format!("{path}/{}", label(child)), "clusters may not nest");
                }
                Some("cluster") => self.cluster(child, path),
                Some(other) if list.tag() == Some("registers") => self.report(
                    format!("{path}/{other}"),
                    "only <register> and <cluster> may appear in <registers>",
                ),
                _ => {}
            }
        }
    }

    fn cluster(&mut self, cluster: &Node, parent: &str) {
        let path = self.element(cluster, parent, &["name", "addressOffset"]);
        self.register_list(cluster, &path, true);
    }

    fn register(&mut self, register: &Node, parent: &str) {
        let path = self.element(register, parent, &["name", "addressOffset"]);

        if register.child("dim").is_some() {
            if register.child("dimIncrement").is_none() {
                self.report(path.clone(), "<dim> requires <dimIncrement>");
            }
            let name = register.child_text("name").unwrap_or_default();
            if !name.contains("%s") {
                self.report(path.clone(), "dimensioned register name must contain %s");
            }
        }

        if let Some(fields) = register.child("fields") {
            if fields.children().is_empty() {
                self.report(format!("{path}/fields"), "<fields> must not be empty");
            }
            for field in fields.children() {
                match field.tag() {
                    Some("field") => {
                        self.element(field, &format!("{path}/fields"), &["name", "bitRange"]);
                    }
                    Some(other) => self.report(
                        format!("{path}/fields/{other}"),
                        "only <field> may appear in <fields>",
                    ),
                    None => {}
                }
            }
        }
    }
}
