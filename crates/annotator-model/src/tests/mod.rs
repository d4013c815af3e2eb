
use crate::{Moddle, Package};

pub(crate) const QA_PACKAGE: &str = r#"{
  "name": "QualityAssurance",
  "prefix": "qa",
  "uri": "http://some-company/schema/bpmn/qa",
  "xml": { "tagAlias": "lowerCase" },
  "types": [
    { "name": "AnalyzedNode", "extends": ["bpmn:FlowNode"],
      "properties": [{ "name": "suitable", "isAttr": true, "type": "Real" }] },
    { "name": "AnalysisDetails", "superClass": ["Element"],
      "properties": [
        { "name": "lastChecked", "isAttr": true, "type": "String" },
        { "name": "nextCheck", "isAttr": true, "type": "String" }
      ] }
  ]
}"#;

pub(crate) const DIAGRAM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL"
                  xmlns:bpmndi="http://www.omg.org/spec/BPMN/20100524/DI"
                  xmlns:dc="http://www.omg.org/spec/DD/20100524/DC"
                  xmlns:di="http://www.omg.org/spec/DD/20100524/DI"
                  xmlns:qa="http://some-company/schema/bpmn/qa"
                  xmlns:camunda="http://camunda.org/schema/1.0/bpmn"
                  id="Definitions_1" targetNamespace="http://bpmn.io/schema/bpmn">
  <bpmn:process id="Process_1" isExecutable="false">
    <bpmn:startEvent id="StartEvent_1" name="Order received" />
    <bpmn:task id="Task_1" name="Check order" qa:suitable="7" camunda:asyncBefore="true">
      <bpmn:extensionElements>
        <camunda:properties />
        <qa:analysisDetails lastChecked="2015-01-20T14:23:21.000Z" />
      </bpmn:extensionElements>
    </bpmn:task>
    <bpmn:subProcess id="SubProcess_1">
      <bpmn:userTask id="Task_2" name="Ship" />
    </bpmn:subProcess>
    <bpmn:sequenceFlow id="Flow_1" sourceRef="StartEvent_1" targetRef="Task_1" />
  </bpmn:process>
  <bpmndi:BPMNDiagram id="BPMNDiagram_1">
    <bpmndi:BPMNPlane id="BPMNPlane_1" bpmnElement="Process_1">
      <bpmndi:BPMNShape id="StartEvent_1_di" bpmnElement="StartEvent_1">
        <dc:Bounds x="173" y="102" width="36" height="36" />
      </bpmndi:BPMNShape>
      <bpmndi:BPMNShape id="Task_1_di" bpmnElement="Task_1">
        <dc:Bounds x="260" y="80" width="100" height="80" />
      </bpmndi:BPMNShape>
      <bpmndi:BPMNShape id="SubProcess_1_di" bpmnElement="SubProcess_1">
        <dc:Bounds x="400" y="40" width="300" height="200" />
      </bpmndi:BPMNShape>
      <bpmndi:BPMNShape id="Task_2_di" bpmnElement="Task_2">
        <dc:Bounds x="450" y="80" width="100" height="80" />
      </bpmndi:BPMNShape>
      <bpmndi:BPMNEdge id="Flow_1_di" bpmnElement="Flow_1">
        <di:waypoint x="209" y="120" />
        <di:waypoint x="260" y="120" />
      </bpmndi:BPMNEdge>
    </bpmndi:BPMNPlane>
  </bpmndi:BPMNDiagram>
</bpmn:definitions>
"#;

pub(crate) fn qa_moddle() -> Moddle {
    Moddle::with_packages([Package::from_json(QA_PACKAGE).unwrap()]).unwrap()
}
