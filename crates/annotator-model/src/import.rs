//! BPMN 2.0 XML import.
//!
//! Only the parts needed to edit and draw a single process are modelled: flow elements
//! (nested into sub-processes), their attributes (including attributes of registered
//! extension packages), `extensionElements` records, and DI bounds/waypoints. Everything
//! else is skipped.

use crate::document::{Definitions, Document};
use crate::element::{
    Attrs, BusinessObject, Element, ElementId, ElementKind, ExtensionElements, ExtensionRecord,
};
use crate::error::ImportError;
use crate::geom::{Point, Rect, bounds, point};
use crate::moddle::{BPMN_NS, BPMNDI_NS, DC_NS, DI_NS, Moddle, upper_first};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub document: Document,
    /// Non-fatal problems, e.g. DI for unknown elements or elements without DI.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
enum Di {
    Shape(Rect),
    Edge(Vec<Point>),
}

pub fn import_xml(xml: &str, moddle: &Moddle) -> Result<ImportOutcome, ImportError> {
    let doc = roxmltree::Document::parse(xml)?;
    let definitions = doc.root_element();
    if !is_bpmn(definitions, "definitions") {
        return Err(ImportError::NotDefinitions {
            found: definitions.tag_name().name().to_string(),
        });
    }

    let Some(process) = definitions
        .children()
        .find(|n| is_bpmn(*n, "process"))
    else {
        return Err(ImportError::MissingProcess);
    };

    let mut warnings = Vec::new();
    let di = read_di(definitions)?;

    let root_bo = read_business_object(process, "bpmn:Process", moddle)?;
    let root_id = ElementId::new(root_bo.id());
    let mut document = Document::new(Element::new(ElementKind::Root, root_bo));
    document.set_definitions(read_definitions(definitions, moddle));

    let mut seen: FxHashSet<String> = FxHashSet::default();
    seen.insert(root_id.to_string());
    import_children(
        process,
        &root_id,
        moddle,
        &di,
        &mut document,
        &mut seen,
        &mut warnings,
    )?;

    for id in di.keys() {
        if !seen.contains(id.as_str()) {
            warnings.push(format!("DI references unknown element {id}"));
        }
    }

    for w in &warnings {
        tracing::warn!(warning = %w, "bpmn import");
    }

    Ok(ImportOutcome { document, warnings })
}

fn import_children(
    parent_node: roxmltree::Node<'_, '_>,
    parent: &ElementId,
    moddle: &Moddle,
    di: &FxHashMap<String, Di>,
    document: &mut Document,
    seen: &mut FxHashSet<String>,
    warnings: &mut Vec<String>,
) -> Result<(), ImportError> {
    for node in parent_node.children().filter(|n| n.is_element()) {
        if node.tag_name().namespace() != Some(BPMN_NS) {
            continue;
        }
        let type_name = format!("bpmn:{}", upper_first(node.tag_name().name()));
        if !moddle.is_a(&type_name, "bpmn:FlowElement")
            && !moddle.is_a(&type_name, "bpmn:TextAnnotation")
            && !moddle.is_a(&type_name, "bpmn:Association")
        {
            continue;
        }

        let bo = read_business_object(node, &type_name, moddle)?;
        let id = bo.id().to_string();
        if !seen.insert(id.clone()) {
            return Err(ImportError::DuplicateId { id });
        }

        let is_connection = moddle.is_a(&type_name, "bpmn:SequenceFlow")
            || moddle.is_a(&type_name, "bpmn:Association");
        let kind = match di.get(&id) {
            Some(Di::Shape(rect)) => ElementKind::Shape { bounds: *rect },
            Some(Di::Edge(points)) => ElementKind::Connection {
                waypoints: points.clone(),
            },
            None => {
                warnings.push(format!("no DI for element {id}"));
                if is_connection {
                    ElementKind::Connection {
                        waypoints: Vec::new(),
                    }
                } else {
                    ElementKind::Shape {
                        bounds: Rect::zero(),
                    }
                }
            }
        };

        let element_id = ElementId::new(id);
        // Ids are unique at this point, and the parent was added before its children.
        if let Err(err) = document.add(parent, Element::new(kind, bo)) {
            tracing::debug!(error = %err, "skipping element during import");
            continue;
        }

        if moddle.is_a(&type_name, "bpmn:SubProcess") {
            import_children(node, &element_id, moddle, di, document, seen, warnings)?;
        }
    }
    Ok(())
}

fn read_business_object(
    node: roxmltree::Node<'_, '_>,
    type_name: &str,
    moddle: &Moddle,
) -> Result<BusinessObject, ImportError> {
    let Some(id) = node.attribute("id") else {
        return Err(ImportError::MissingId {
            tag: node.tag_name().name().to_string(),
        });
    };

    let mut bo = BusinessObject::new(type_name, id);
    for attr in node.attributes() {
        let name = attr.name();
        match attr.namespace() {
            None => {
                if name == "id" {
                    continue;
                }
                bo.set_attr(name, Some(moddle.coerce(type_name, name, attr.value())));
            }
            Some(ns) if moddle.package_by_uri(ns).is_some() => {
                bo.set_attr(name, Some(moddle.coerce(type_name, name, attr.value())));
            }
            Some(ns) => {
                let key = match node.lookup_prefix(ns) {
                    Some(prefix) => format!("{prefix}:{name}"),
                    None => name.to_string(),
                };
                bo.set_attr(&key, Some(serde_json::Value::String(attr.value().to_string())));
            }
        }
    }

    if let Some(ext) = node
        .children()
        .find(|n| is_bpmn(*n, "extensionElements"))
    {
        let values = ext
            .children()
            .filter(|n| n.is_element())
            .map(|n| read_extension_record(n, moddle))
            .collect();
        bo.set_extension_elements(Some(ExtensionElements { values }));
    }

    Ok(bo)
}

fn read_extension_record(node: roxmltree::Node<'_, '_>, moddle: &Moddle) -> ExtensionRecord {
    let local = node.tag_name().name();
    let ns = node.tag_name().namespace();

    if let Some(type_name) = ns.and_then(|ns| moddle.type_for_tag(ns, local)) {
        let mut record = ExtensionRecord::new(type_name.as_str());
        for attr in node.attributes() {
            record.set(attr.name(), moddle.coerce(&type_name, attr.name(), attr.value()));
        }
        return record;
    }

    let prefix = ns.and_then(|ns| node.lookup_prefix(ns));
    let type_name = match prefix {
        Some(p) if !p.is_empty() => format!("{p}:{local}"),
        _ => local.to_string(),
    };
    let attrs: Attrs = node
        .attributes()
        .map(|a| {
            (
                a.name().to_string(),
                serde_json::Value::String(a.value().to_string()),
            )
        })
        .collect();
    ExtensionRecord::foreign(type_name, ns.map(str::to_string), attrs)
}

fn read_definitions(node: roxmltree::Node<'_, '_>, moddle: &Moddle) -> Definitions {
    let known = |uri: &str| {
        matches!(uri, BPMN_NS | BPMNDI_NS | DC_NS | DI_NS)
            || uri == "http://www.w3.org/2001/XMLSchema-instance"
            || moddle.package_by_uri(uri).is_some()
    };
    let foreign_namespaces = node
        .namespaces()
        .filter(|ns| !known(ns.uri()))
        .filter_map(|ns| ns.name().map(|p| (p.to_string(), ns.uri().to_string())))
        .collect();
    Definitions {
        id: node.attribute("id").map(str::to_string),
        target_namespace: node.attribute("targetNamespace").map(str::to_string),
        foreign_namespaces,
    }
}

fn read_di(definitions: roxmltree::Node<'_, '_>) -> Result<FxHashMap<String, Di>, ImportError> {
    let mut out = FxHashMap::default();
    for node in definitions.descendants() {
        let ns = node.tag_name().namespace();
        if ns != Some(BPMNDI_NS) {
            continue;
        }
        let Some(target) = node.attribute("bpmnElement") else {
            continue;
        };
        match node.tag_name().name() {
            "BPMNShape" => {
                let Some(b) = node
                    .children()
                    .find(|n| is_tag(*n, DC_NS, "Bounds"))
                else {
                    continue;
                };
                let rect = bounds(
                    number(b, "x", target)?,
                    number(b, "y", target)?,
                    number(b, "width", target)?,
                    number(b, "height", target)?,
                );
                out.insert(target.to_string(), Di::Shape(rect));
            }
            "BPMNEdge" => {
                let mut points = Vec::new();
                for wp in node
                    .children()
                    .filter(|n| is_tag(*n, DI_NS, "waypoint"))
                {
                    points.push(point(number(wp, "x", target)?, number(wp, "y", target)?));
                }
                out.insert(target.to_string(), Di::Edge(points));
            }
            _ => {}
        }
    }
    Ok(out)
}

fn number(
    node: roxmltree::Node<'_, '_>,
    attribute: &'static str,
    id: &str,
) -> Result<f64, ImportError> {
    let raw = node.attribute(attribute).unwrap_or("0");
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ImportError::InvalidNumber {
            id: id.to_string(),
            attribute,
            value: raw.to_string(),
        })
}

fn is_tag(node: roxmltree::Node<'_, '_>, ns: &str, local: &str) -> bool {
    node.tag_name().namespace() == Some(ns) && node.tag_name().name() == local
}

fn is_bpmn(node: roxmltree::Node<'_, '_>, local: &str) -> bool {
    node.is_element()
        && node.tag_name().namespace() == Some(BPMN_NS)
        && node.tag_name().name() == local
}
