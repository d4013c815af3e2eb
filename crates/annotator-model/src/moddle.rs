//! Schema registry for BPMN and extension packages.
//!
//! Extension packages use the same JSON descriptor shape bpmn-io tooling uses, e.g.
//!
//! ```json
//! { "name": "QualityAssurance", "prefix": "qa", "uri": "http://example.com/qa",
//!   "xml": { "tagAlias": "lowerCase" },
//!   "types": [
//!     { "name": "AnalyzedNode", "extends": ["bpmn:FlowNode"],
//!       "properties": [{ "name": "suitable", "isAttr": true, "type": "Real" }] }
//!   ] }
//! ```

use crate::element::ExtensionRecord;
use crate::error::{Error, Result};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::Value;

pub const BPMN_NS: &str = "http://www.omg.org/spec/BPMN/20100524/MODEL";
pub const BPMNDI_NS: &str = "http://www.omg.org/spec/BPMN/20100524/DI";
pub const DC_NS: &str = "http://www.omg.org/spec/DD/20100524/DC";
pub const DI_NS: &str = "http://www.omg.org/spec/DD/20100524/DI";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub name: String,
    pub prefix: String,
    pub uri: String,
    #[serde(default)]
    pub xml: Option<XmlOptions>,
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

impl Package {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidPackage {
            message: e.to_string(),
        })
    }

    fn lower_case_tags(&self) -> bool {
        self.xml
            .as_ref()
            .and_then(|x| x.tag_alias.as_deref())
            .is_some_and(|alias| alias == "lowerCase")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XmlOptions {
    #[serde(default)]
    pub tag_alias: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    pub name: String,
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub super_class: Vec<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub is_attr: bool,
    #[serde(default)]
    pub is_many: bool,
}

#[derive(Debug, Clone, Default)]
struct TypeInfo {
    supertypes: Vec<String>,
    properties: Vec<PropertyDescriptor>,
    /// Package prefix for types contributed by an extension package.
    package: Option<String>,
    /// Property name -> package prefix, for properties added through `extends`.
    contributed: FxHashMap<String, String>,
}

/// BPMN 2.0 element types this crate knows about, with their direct supertypes.
const BPMN_TYPES: &[(&str, &[&str])] = &[
    ("BaseElement", &[]),
    ("RootElement", &["BaseElement"]),
    ("Definitions", &["BaseElement"]),
    ("Process", &["RootElement"]),
    ("Collaboration", &["RootElement"]),
    ("ExtensionElements", &[]),
    ("FlowElement", &["BaseElement"]),
    ("FlowNode", &["FlowElement"]),
    ("SequenceFlow", &["FlowElement"]),
    ("Activity", &["FlowNode"]),
    ("Task", &["Activity"]),
    ("UserTask", &["Task"]),
    ("ServiceTask", &["Task"]),
    ("ScriptTask", &["Task"]),
    ("ManualTask", &["Task"]),
    ("SendTask", &["Task"]),
    ("ReceiveTask", &["Task"]),
    ("BusinessRuleTask", &["Task"]),
    ("SubProcess", &["Activity"]),
    ("CallActivity", &["Activity"]),
    ("Event", &["FlowNode"]),
    ("StartEvent", &["Event"]),
    ("EndEvent", &["Event"]),
    ("IntermediateCatchEvent", &["Event"]),
    ("IntermediateThrowEvent", &["Event"]),
    ("BoundaryEvent", &["Event"]),
    ("Gateway", &["FlowNode"]),
    ("ExclusiveGateway", &["Gateway"]),
    ("ParallelGateway", &["Gateway"]),
    ("InclusiveGateway", &["Gateway"]),
    ("EventBasedGateway", &["Gateway"]),
    ("ComplexGateway", &["Gateway"]),
    ("DataObjectReference", &["FlowElement"]),
    ("DataStoreReference", &["FlowElement"]),
    ("TextAnnotation", &["BaseElement"]),
    ("Association", &["BaseElement"]),
];

const BPMN_PROPERTIES: &[(&str, &str, &str)] = &[
    ("BaseElement", "id", "String"),
    ("FlowElement", "name", "String"),
    ("Process", "name", "String"),
    ("Process", "isExecutable", "Boolean"),
    ("SequenceFlow", "sourceRef", "String"),
    ("SequenceFlow", "targetRef", "String"),
    ("Activity", "isForCompensation", "Boolean"),
    ("SubProcess", "triggeredByEvent", "Boolean"),
    ("BoundaryEvent", "attachedToRef", "String"),
    ("BoundaryEvent", "cancelActivity", "Boolean"),
    ("Gateway", "gatewayDirection", "String"),
    ("ExclusiveGateway", "default", "String"),
    ("InclusiveGateway", "default", "String"),
];

#[derive(Debug, Clone)]
pub struct Moddle {
    types: FxHashMap<String, TypeInfo>,
    packages: Vec<Package>,
}

impl Default for Moddle {
    fn default() -> Self {
        let mut types: FxHashMap<String, TypeInfo> = FxHashMap::default();
        for (name, supers) in BPMN_TYPES {
            types.insert(
                format!("bpmn:{name}"),
                TypeInfo {
                    supertypes: supers.iter().map(|s| format!("bpmn:{s}")).collect(),
                    ..Default::default()
                },
            );
        }
        for (owner, name, ty) in BPMN_PROPERTIES {
            if let Some(info) = types.get_mut(&format!("bpmn:{owner}")) {
                info.properties.push(PropertyDescriptor {
                    name: (*name).to_string(),
                    ty: (*ty).to_string(),
                    is_attr: true,
                    is_many: false,
                });
            }
        }
        Self {
            types,
            packages: Vec::new(),
        }
    }
}

impl Moddle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_packages(packages: impl IntoIterator<Item = Package>) -> Result<Self> {
        let mut moddle = Self::new();
        for package in packages {
            moddle.register(package)?;
        }
        Ok(moddle)
    }

    pub fn register(&mut self, package: Package) -> Result<()> {
        if package.prefix == "bpmn" || self.package(&package.prefix).is_some() {
            return Err(Error::DuplicatePackage {
                prefix: package.prefix,
            });
        }

        for ty in &package.types {
            let qualified = qualify(&package.prefix, &ty.name);
            if !ty.extends.is_empty() {
                // `extends` adds properties to existing types without declaring a new
                // instantiable type.
                for target in &ty.extends {
                    let Some(info) = self.types.get_mut(target) else {
                        return Err(Error::InvalidPackage {
                            message: format!("{qualified} extends unknown type {target}"),
                        });
                    };
                    info.properties.extend(ty.properties.iter().cloned());
                    for p in &ty.properties {
                        info.contributed
                            .insert(p.name.clone(), package.prefix.clone());
                    }
                }
                continue;
            }

            let supertypes = ty
                .super_class
                .iter()
                .filter(|s| s.as_str() != "Element")
                .map(|s| {
                    if s.contains(':') {
                        s.clone()
                    } else {
                        qualify(&package.prefix, s)
                    }
                })
                .collect();
            self.types.insert(
                qualified,
                TypeInfo {
                    supertypes,
                    properties: ty.properties.clone(),
                    package: Some(package.prefix.clone()),
                    contributed: FxHashMap::default(),
                },
            );
        }

        self.packages.push(package);
        Ok(())
    }

    pub fn package(&self, prefix: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.prefix == prefix)
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn package_by_uri(&self, uri: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.uri == uri)
    }

    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// `true` when `type_name` is `supertype` or (transitively) derives from it.
    pub fn is_a(&self, type_name: &str, supertype: &str) -> bool {
        let mut stack = vec![type_name];
        while let Some(cur) = stack.pop() {
            if cur == supertype {
                return true;
            }
            if let Some(info) = self.types.get(cur) {
                stack.extend(info.supertypes.iter().map(String::as_str));
            }
        }
        false
    }

    /// Resolves a property through the type's supertypes and package `extends` contributions.
    pub fn property(&self, type_name: &str, name: &str) -> Option<&PropertyDescriptor> {
        let mut stack = vec![type_name];
        while let Some(cur) = stack.pop() {
            let Some(info) = self.types.get(cur) else {
                continue;
            };
            if let Some(p) = info.properties.iter().find(|p| p.name == name) {
                return Some(p);
            }
            stack.extend(info.supertypes.iter().map(String::as_str));
        }
        None
    }

    /// The XML attribute name a property is written as: properties contributed to BPMN
    /// types by a package carry the package prefix (`qa:suitable`), everything else is
    /// written unqualified.
    pub fn attribute_name(&self, type_name: &str, name: &str) -> String {
        if name.contains(':') {
            return name.to_string();
        }
        let mut stack = vec![type_name];
        while let Some(cur) = stack.pop() {
            let Some(info) = self.types.get(cur) else {
                continue;
            };
            if let Some(prefix) = info.contributed.get(name) {
                return qualify(prefix, name);
            }
            if info.properties.iter().any(|p| p.name == name) {
                return name.to_string();
            }
            stack.extend(info.supertypes.iter().map(String::as_str));
        }
        name.to_string()
    }

    /// Creates a new, empty extension record of a registered package type.
    pub fn create(&self, type_tag: &str) -> Result<ExtensionRecord> {
        match self.types.get(type_tag) {
            Some(info) if info.package.is_some() => Ok(ExtensionRecord::new(type_tag)),
            _ => Err(Error::UnknownType {
                type_name: type_tag.to_string(),
            }),
        }
    }

    /// Maps an XML element name in a registered package namespace to its type name.
    pub fn type_for_tag(&self, namespace: &str, local: &str) -> Option<String> {
        let package = self.package_by_uri(namespace)?;
        let candidate = if package.lower_case_tags() {
            upper_first(local)
        } else {
            local.to_string()
        };
        let qualified = qualify(&package.prefix, &candidate);
        self.types.contains_key(&qualified).then_some(qualified)
    }

    /// The XML tag a record type is written as.
    pub fn tag_for_type(&self, type_name: &str) -> String {
        let Some((prefix, local)) = type_name.split_once(':') else {
            return type_name.to_string();
        };
        match self.package(prefix) {
            Some(p) if p.lower_case_tags() => qualify(prefix, &lower_first(local)),
            _ => type_name.to_string(),
        }
    }

    /// Converts raw attribute text into the JSON value for the declared property type.
    ///
    /// Unknown properties and unparsable values are kept as strings.
    pub fn coerce(&self, type_name: &str, name: &str, raw: &str) -> Value {
        let ty = self
            .property(type_name, name)
            .map(|p| p.ty.as_str())
            .unwrap_or("String");
        match ty {
            "Integer" => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(raw.to_string())),
            "Real" | "Float" | "Double" => raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(raw.to_string())),
            "Boolean" => match raw.trim() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => Value::String(raw.to_string()),
            },
            _ => Value::String(raw.to_string()),
        }
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    format!("{prefix}:{name}")
}

pub(crate) fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
