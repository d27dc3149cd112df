//! Indented XML output.
//!
//! Whitespace in an SVD document is insignificant, so the serializer lays it
//! out itself: every child starts on a new line indented two spaces deeper
//! than its parent, and a parent's closing tag lines up with its opening
//! tag. This only works because leaves never hold children and parents never
//! hold text.

use std::io::Write;

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::Result;
use crate::node::Node;

/// Comment written ahead of the root element.
pub const GENERATED_HEADER: &str = r#"
  Copyright lowRISC contributors.
  Licensed under the Apache License, Version 2.0, see LICENSE for details.
  SPDX-License-Identifier: Apache-2.0

  This file generated from HJSON source by "svdgen", do not edit.
"#;

const INDENT: &str = "  ";

/// Write the XML declaration, the generated-file header and `root`.
pub fn write_svd<W: Write>(root: &Node, out: W) -> Result<()> {
    let mut writer = Writer::new(out);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    whitespace(&mut writer, "\n")?;
    writer.write_event(Event::Comment(BytesText::from_escaped(GENERATED_HEADER)))?;
    whitespace(&mut writer, "\n")?;
    write_node(&mut writer, root, "\n")?;
    whitespace(&mut writer, "\n")
}

/// Render a complete document to a string.
pub fn to_svd_string(root: &Node) -> Result<String> {
    let mut buf = Vec::new();
    write_svd(root, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn whitespace<W: Write>(writer: &mut Writer<W>, text: &str) -> Result<()> {
    writer.write_event(Event::Text(BytesText::from_escaped(text)))?;
    Ok(())
}

/// `indent` is the newline plus leading spaces of the line `node` starts on.
fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node, indent: &str) -> Result<()> {
    match node {
        Node::Leaf { tag, text } => {
            writer.write_event(Event::Start(BytesStart::new(tag.as_str())))?;
            writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
            writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
        }
        Node::Comment { text } => {
            writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?;
        }
        Node::Parent {
            tag,
            attributes,
            children,
        } => {
            let start = BytesStart::new(tag.as_str())
                .with_attributes(attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            if children.is_empty() {
                writer.write_event(Event::Empty(start))?;
                return Ok(());
            }

            writer.write_event(Event::Start(start))?;
            let child_indent = format!("{indent}{INDENT}");
            for child in children {
                whitespace(writer, &child_indent)?;
                write_node(writer, child, &child_indent)?;
            }
            whitespace(writer, indent)?;
            writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
        }
    }
    Ok(())
}
