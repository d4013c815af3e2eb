use annotator_model::{ElementId, Moddle, Modeler, Package, PropertyPatch};
use futures::executor::block_on;
use serde_json::json;
use std::sync::Arc;

const EMOJI: &str = r#"{
  "name": "Emoji",
  "prefix": "emoji",
  "uri": "http://emoji",
  "types": [
    { "name": "EmojiTask", "extends": ["bpmn:Task"],
      "properties": [{ "name": "emoji", "isAttr": true, "type": "String" }] }
  ]
}"#;

const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL"
    xmlns:bpmndi="http://www.omg.org/spec/BPMN/20100524/DI"
    xmlns:dc="http://www.omg.org/spec/DD/20100524/DC"
    xmlns:emoji="http://emoji" id="Defs">
  <bpmn:process id="P">
    <bpmn:task id="T" name="A &amp; B" emoji:emoji="🙂" />
  </bpmn:process>
  <bpmndi:BPMNDiagram id="D">
    <bpmndi:BPMNPlane id="DP" bpmnElement="P">
      <bpmndi:BPMNShape id="T_di" bpmnElement="T">
        <dc:Bounds x="10.5" y="20" width="100" height="80" />
      </bpmndi:BPMNShape>
    </bpmndi:BPMNPlane>
  </bpmndi:BPMNDiagram>
</bpmn:definitions>"#;

fn modeler() -> Modeler {
    let moddle = Moddle::with_packages([Package::from_json(EMOJI).unwrap()]).unwrap();
    let mut modeler = Modeler::new(moddle);
    block_on(modeler.import_xml(XML)).unwrap();
    modeler
}

#[test]
fn exported_xml_imports_to_the_same_model() {
    let mut modeler = modeler();
    modeler
        .update_properties(&ElementId::new("T"), PropertyPatch::new().set("emoji", "🎉"))
        .unwrap();
    let xml = modeler.save_xml().unwrap();
    assert!(xml.contains(r#"emoji:emoji="🎉""#), "{xml}");
    assert!(xml.contains(r#"name="A &amp; B""#), "{xml}");
    assert!(xml.contains(r#"<dc:Bounds x="10.5" y="20" width="100" height="80" />"#));

    let mut again = Modeler::with_moddle(Arc::clone(modeler.moddle()));
    again.import_xml_sync(&xml).unwrap();
    let bo = again.business_object("T").unwrap();
    assert_eq!(bo.get("emoji"), Some(&json!("🎉")));
    assert_eq!(bo.name(), Some("A & B"));
    assert_eq!(again.save_xml().unwrap(), xml);
}

#[test]
fn undo_and_redo_restore_exact_values() {
    let mut modeler = modeler();
    let t = ElementId::new("T");
    let original = modeler.save_xml().unwrap();
    modeler
        .update_properties(&t, PropertyPatch::new().unset("emoji").set("name", "C"))
        .unwrap();
    let edited = modeler.save_xml().unwrap();
    assert!(!edited.contains("emoji:emoji="));

    assert!(modeler.undo().unwrap());
    assert_eq!(modeler.save_xml().unwrap(), original);
    assert!(!modeler.undo().unwrap());
    assert!(modeler.redo().unwrap());
    assert_eq!(modeler.save_xml().unwrap(), edited);
}
