use std::collections::BTreeMap;

use crate::containers::BreakpointComplication;
use crate::utils;

/// Turn a breakpoint's complication detail into output attributes. Entries
/// are only written when applicable, so a clean breakpoint contributes an
/// empty map.
pub fn complication_attributes(complication: &BreakpointComplication) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();

    if complication.has_inserted_sequence() {
        attributes.insert(
            utils::INSERTED_SEQUENCE.to_string(),
            complication.inserted_sequence.clone(),
        );
    }

    if !complication.homology.is_empty() {
        attributes.insert(utils::HOMOLOGY.to_string(), complication.homology.clone());
        attributes.insert(
            utils::HOMOLOGY_LENGTH.to_string(),
            complication.homology.len().to_string(),
        );
    }

    if let Some(duplication) = &complication.duplication {
        attributes.insert(
            utils::DUP_REPEAT_UNIT_REF_SPAN.to_string(),
            duplication.unit_span_string(),
        );
        if !duplication.contig_shapes.is_empty() {
            attributes.insert(
                utils::DUP_SEQ_SHAPES.to_string(),
                duplication.contig_shapes.join(utils::ATTRIBUTE_SEPARATOR),
            );
        }
        attributes.insert(
            utils::DUPLICATION_NUMBERS.to_string(),
            format!(
                "{}{}{}",
                duplication.ref_copies,
                utils::ATTRIBUTE_SEPARATOR,
                duplication.contig_copies
            ),
        );
        if duplication.imprecise {
            // flag-style attribute, present with no value
            attributes.insert(utils::DUP_ANNOTATIONS_IMPRECISE.to_string(), String::new());
        }
    }

    attributes
}
