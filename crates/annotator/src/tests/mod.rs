mod controller;

use crate::session::{EMOJI_PACKAGE, QA_PACKAGE};
use annotator_model::{Moddle, Modeler, Package};
use std::sync::Arc;

pub(crate) const DIAGRAM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL"
                  xmlns:bpmndi="http://www.omg.org/spec/BPMN/20100524/DI"
                  xmlns:dc="http://www.omg.org/spec/DD/20100524/DC"
                  xmlns:di="http://www.omg.org/spec/DD/20100524/DI"
                  xmlns:qa="http://some-company/schema/bpmn/qa"
                  xmlns:emoji="http://emoji"
                  xmlns:camunda="http://camunda.org/schema/1.0/bpmn"
                  id="Definitions_1" targetNamespace="http://bpmn.io/schema/bpmn">
  <bpmn:process id="Process_1">
    <bpmn:startEvent id="StartEvent_1" />
    <bpmn:task id="n1" name="Review" />
    <bpmn:task id="Scored" qa:suitable="3">
      <bpmn:extensionElements>
        <camunda:properties />
        <qa:analysisDetails lastChecked="2015-01-20T14:23:21.000Z" />
      </bpmn:extensionElements>
    </bpmn:task>
    <bpmn:task id="Smiley" emoji:emoji="😀" />
    <bpmn:sequenceFlow id="Flow_1" sourceRef="StartEvent_1" targetRef="n1" />
  </bpmn:process>
  <bpmndi:BPMNDiagram id="BPMNDiagram_1">
    <bpmndi:BPMNPlane id="BPMNPlane_1" bpmnElement="Process_1">
      <bpmndi:BPMNShape id="StartEvent_1_di" bpmnElement="StartEvent_1">
        <dc:Bounds x="100" y="102" width="36" height="36" />
      </bpmndi:BPMNShape>
      <bpmndi:BPMNShape id="n1_di" bpmnElement="n1">
        <dc:Bounds x="200" y="80" width="100" height="80" />
      </bpmndi:BPMNShape>
      <bpmndi:BPMNShape id="Scored_di" bpmnElement="Scored">
        <dc:Bounds x="350" y="80" width="100" height="80" />
      </bpmndi:BPMNShape>
      <bpmndi:BPMNShape id="Smiley_di" bpmnElement="Smiley">
        <dc:Bounds x="500" y="80" width="100" height="80" />
      </bpmndi:BPMNShape>
      <bpmndi:BPMNEdge id="Flow_1_di" bpmnElement="Flow_1">
        <di:waypoint x="136" y="120" />
        <di:waypoint x="200" y="120" />
      </bpmndi:BPMNEdge>
    </bpmndi:BPMNPlane>
  </bpmndi:BPMNDiagram>
</bpmn:definitions>
"#;

pub(crate) fn moddle() -> Arc<Moddle> {
    Arc::new(
        Moddle::with_packages([
            Package::from_json(QA_PACKAGE).unwrap(),
            Package::from_json(EMOJI_PACKAGE).unwrap(),
        ])
        .unwrap(),
    )
}

pub(crate) fn modeler() -> Modeler {
    let mut modeler = Modeler::with_moddle(moddle());
    modeler.import_xml_sync(DIAGRAM).unwrap();
    modeler
}
