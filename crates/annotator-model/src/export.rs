//! BPMN 2.0 XML export.
//!
//! Writes what [`import_xml`](crate::import_xml) reads: semantic elements with their
//! attributes and extension records, followed by DI for shapes and connections.

use crate::document::Document;
use crate::element::{Attrs, Element, ElementKind, ExtensionRecord};
use crate::moddle::{BPMN_NS, BPMNDI_NS, DC_NS, DI_NS, Moddle, lower_first};
use serde_json::Value;
use std::fmt::Write as _;

pub fn export_xml(document: &Document, moddle: &Moddle) -> String {
    let mut out = String::new();
    let defs = document.definitions();
    let root = document.root();

    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push('\n');
    let _ = write!(
        out,
        r#"<bpmn:definitions xmlns:bpmn="{BPMN_NS}" xmlns:bpmndi="{BPMNDI_NS}" xmlns:dc="{DC_NS}" xmlns:di="{DI_NS}""#
    );
    for package in moddle.packages() {
        let _ = write!(
            out,
            r#" xmlns:{}="{}""#,
            package.prefix,
            escape_attr(&package.uri)
        );
    }
    for (prefix, uri) in &defs.foreign_namespaces {
        let _ = write!(out, r#" xmlns:{}="{}""#, prefix, escape_attr(uri));
    }
    let _ = write!(
        out,
        r#" id="{}" targetNamespace="{}">"#,
        escape_attr(defs.id.as_deref().unwrap_or("Definitions_1")),
        escape_attr(
            defs.target_namespace
                .as_deref()
                .unwrap_or("http://bpmn.io/schema/bpmn")
        ),
    );
    out.push('\n');

    write_element(&mut out, document, moddle, root, 1);

    let _ = writeln!(out, r#"  <bpmndi:BPMNDiagram id="BPMNDiagram_1">"#);
    let _ = writeln!(
        out,
        r#"    <bpmndi:BPMNPlane id="BPMNPlane_1" bpmnElement="{}">"#,
        escape_attr(root.id().as_str())
    );
    for element in document.elements() {
        let id = escape_attr(element.id().as_str());
        match element.kind() {
            ElementKind::Root => {}
            ElementKind::Shape { bounds } => {
                let _ = writeln!(
                    out,
                    r#"      <bpmndi:BPMNShape id="{id}_di" bpmnElement="{id}">"#
                );
                let _ = writeln!(
                    out,
                    r#"        <dc:Bounds x="{}" y="{}" width="{}" height="{}" />"#,
                    js_number(bounds.origin.x),
                    js_number(bounds.origin.y),
                    js_number(bounds.size.width),
                    js_number(bounds.size.height),
                );
                let _ = writeln!(out, "      </bpmndi:BPMNShape>");
            }
            ElementKind::Connection { waypoints } => {
                let _ = writeln!(
                    out,
                    r#"      <bpmndi:BPMNEdge id="{id}_di" bpmnElement="{id}">"#
                );
                for p in waypoints {
                    let _ = writeln!(
                        out,
                        r#"        <di:waypoint x="{}" y="{}" />"#,
                        js_number(p.x),
                        js_number(p.y)
                    );
                }
                let _ = writeln!(out, "      </bpmndi:BPMNEdge>");
            }
        }
    }
    let _ = writeln!(out, "    </bpmndi:BPMNPlane>");
    let _ = writeln!(out, "  </bpmndi:BPMNDiagram>");
    out.push_str("</bpmn:definitions>\n");
    out
}

fn write_element(
    out: &mut String,
    document: &Document,
    moddle: &Moddle,
    element: &Element,
    depth: usize,
) {
    let bo = element.business_object();
    let tag = element_tag(bo.type_name());
    let indent = "  ".repeat(depth);

    let _ = write!(out, r#"{indent}<{tag} id="{}""#, escape_attr(bo.id()));
    write_attrs(out, moddle, bo.type_name(), bo.attrs());

    let ext = bo.extension_elements().filter(|e| !e.is_empty());
    let has_children = !element.children().is_empty();
    if ext.is_none() && !has_children {
        out.push_str(" />\n");
        return;
    }
    out.push_str(">\n");

    if let Some(ext) = ext {
        let _ = writeln!(out, "{indent}  <bpmn:extensionElements>");
        for record in &ext.values {
            write_record(out, moddle, record, depth + 2);
        }
        let _ = writeln!(out, "{indent}  </bpmn:extensionElements>");
    }
    for child in document.children(element.id().as_str()) {
        write_element(out, document, moddle, child, depth + 1);
    }
    let _ = writeln!(out, "{indent}</{tag}>");
}

fn write_record(out: &mut String, moddle: &Moddle, record: &ExtensionRecord, depth: usize) {
    let indent = "  ".repeat(depth);
    let tag = if record.foreign_namespace().is_some() {
        record.type_name().to_string()
    } else {
        moddle.tag_for_type(record.type_name())
    };
    let _ = write!(out, "{indent}<{tag}");
    for (name, value) in record.attrs() {
        if let Some(text) = attr_text(value) {
            let _ = write!(out, r#" {}="{}""#, name, escape_attr(&text));
        }
    }
    out.push_str(" />\n");
}

fn write_attrs(out: &mut String, moddle: &Moddle, type_name: &str, attrs: &Attrs) {
    for (name, value) in attrs {
        let Some(text) = attr_text(value) else {
            continue;
        };
        let _ = write!(
            out,
            r#" {}="{}""#,
            moddle.attribute_name(type_name, name),
            escape_attr(&text)
        );
    }
}

fn attr_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Some(i.to_string()),
            (None, Some(f)) => Some(js_number(f)),
            (None, None) => Some(n.to_string()),
        },
    }
}

/// Formats a number the way JavaScript's `Number#toString` does (`7`, `7.5`, `0.1`).
pub fn js_number(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let v = if v == -0.0 { 0.0 } else { v };
    let mut buf = ryu_js::Buffer::new();
    buf.format_finite(v).to_string()
}

fn element_tag(type_name: &str) -> String {
    match type_name.split_once(':') {
        Some((prefix, local)) => format!("{prefix}:{}", lower_first(local)),
        None => lower_first(type_name),
    }
}

fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            _ => out.push(ch),
        }
    }
    out
}
