//! Lookup of typed extension records on a business object.

use annotator_model::{BusinessObject, ExtensionRecord, Moddle};

/// First record in `bo`'s extension collection whose type is (a subtype of) `type_tag`.
pub fn locate<'a>(
    bo: &'a BusinessObject,
    type_tag: &str,
    moddle: &Moddle,
) -> Option<&'a ExtensionRecord> {
    let index = locate_index(bo, type_tag, moddle)?;
    bo.extension_elements()?.values.get(index)
}

/// Position of the record [`locate`] would return.
pub fn locate_index(bo: &BusinessObject, type_tag: &str, moddle: &Moddle) -> Option<usize> {
    bo.extension_elements()?
        .values
        .iter()
        .position(|record| moddle.is_a(record.type_name(), type_tag))
}
