use super::AnnotationFeature;
use crate::adapter::{self, Annotation};
use crate::clock;
use crate::error::{Error, Result};
use crate::locator;
use annotator_model::{Document, ElementId, Moddle, Modeler, PropertyPatch, js_number};
use chrono::SecondsFormat;
use serde_json::Value;

pub const SUITABLE_ATTR: &str = "suitable";
pub const ANALYSIS_DETAILS: &str = "qa:AnalysisDetails";
pub const LAST_CHECKED: &str = "lastChecked";

/// Numeric suitability score, with the time of the last confirmation kept in a
/// `qa:AnalysisDetails` extension record.
#[derive(Debug, Clone)]
pub struct SuitabilityScore {
    precision: SecondsFormat,
}

impl Default for SuitabilityScore {
    fn default() -> Self {
        Self::new(SecondsFormat::Millis)
    }
}

impl SuitabilityScore {
    pub fn new(precision: SecondsFormat) -> Self {
        Self { precision }
    }
}

impl AnnotationFeature for SuitabilityScore {
    fn name(&self) -> &'static str {
        "qa"
    }

    fn attribute(&self) -> &'static str {
        SUITABLE_ATTR
    }

    fn has_input_field(&self) -> bool {
        true
    }

    fn field_text(&self, annotation: &Annotation) -> String {
        match annotation.as_value() {
            Some(Value::Number(n)) => n.as_f64().map(js_number).unwrap_or_else(|| n.to_string()),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    fn detail_text(&self, document: &Document, moddle: &Moddle, id: &str) -> String {
        adapter::read_extension_record(document, moddle, id, ANALYSIS_DETAILS)
            .and_then(|record| record.get_str(LAST_CHECKED))
            .unwrap_or("-")
            .to_string()
    }

    fn parse(&self, input: &str) -> Option<Value> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        let score: f64 = trimmed.parse().ok()?;
        score.is_finite().then(|| Value::from(score))
    }

    fn patch(&self, modeler: &Modeler, id: &ElementId, value: Value) -> Result<PropertyPatch> {
        let Some(element) = modeler.document()?.get(id.as_str()) else {
            return Err(Error::StaleTarget { id: id.clone() });
        };
        let bo = element.business_object();
        let mut extension_elements = bo.extension_elements().cloned().unwrap_or_default();
        let index = match locator::locate_index(bo, ANALYSIS_DETAILS, modeler.moddle()) {
            Some(index) => index,
            None => {
                extension_elements
                    .values
                    .push(modeler.create_record(ANALYSIS_DETAILS)?);
                extension_elements.values.len() - 1
            }
        };
        if let Some(record) = extension_elements.values.get_mut(index) {
            record.set(LAST_CHECKED, clock::timestamp(self.precision));
        }
        Ok(PropertyPatch::new()
            .set(SUITABLE_ATTR, value)
            .extension_elements(extension_elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_accepts_finite_numbers_only() {
        let score = SuitabilityScore::default();
        assert_eq!(score.parse("7.5"), Some(json!(7.5)));
        assert_eq!(score.parse(" 12 "), Some(json!(12.0)));
        assert_eq!(score.parse("-0.25"), Some(json!(-0.25)));
        assert_eq!(score.parse("1e3"), Some(json!(1000.0)));
        for bad in ["", "   ", "abc", "12x", "inf", "NaN", "7,5"] {
            assert_eq!(score.parse(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn field_text_uses_javascript_number_formatting() {
        let score = SuitabilityScore::default();
        assert_eq!(score.field_text(&Annotation::Present(json!(7.0))), "7");
        assert_eq!(score.field_text(&Annotation::Present(json!(7.5))), "7.5");
        assert_eq!(score.field_text(&Annotation::Absent), "");
    }

    #[test]
    fn patch_creates_the_record_through_the_modeler() {
        let mut modeler = crate::tests::modeler();
        let patch = SuitabilityScore::default()
            .patch(&modeler, &ElementId::new("n1"), json!(2.0))
            .unwrap();
        modeler
            .update_properties(&ElementId::new("n1"), patch)
            .unwrap();
        let records = &modeler
            .business_object("n1")
            .unwrap()
            .extension_elements()
            .unwrap()
            .values;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].type_name(), ANALYSIS_DETAILS);
    }

    #[test]
    fn patch_fails_when_the_record_type_is_not_registered() {
        use annotator_model::Package;

        let package = Package::from_json(crate::session::EMOJI_PACKAGE).unwrap();
        let mut modeler = Modeler::new(Moddle::with_packages([package]).unwrap());
        modeler.import_xml_sync(crate::tests::DIAGRAM).unwrap();
        let err = SuitabilityScore::default()
            .patch(&modeler, &ElementId::new("n1"), json!(2.0))
            .unwrap_err();
        assert!(matches!(err, Error::Model(_)), "{err:?}");
    }
}
