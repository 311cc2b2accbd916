use std::collections::BTreeMap;

use crate::allele_builder::{produce_alleles, ReferenceAccessor};
use crate::attribute_aggregator::complication_attributes;
use crate::containers::{ChimericAlignment, NovelAdjacency, VariantRecord};
use crate::errors::SvDiscoveryError;
use crate::evidence_aggregator::{evidence_attributes, AggregationConfig};
use crate::type_classifier::classify;
use crate::utils;

/// Turn one consensus cluster into a finished variant record: validate the
/// breakpoint ordering, classify the type, build the alleles, and merge the
/// type-specific, complication, and evidence attributes. The three
/// attribute namespaces are disjoint by construction, so the merge never
/// resolves collisions. A failure here is fatal to this cluster only.
pub fn assemble_variant<R: ReferenceAccessor>(
    adjacency: &NovelAdjacency,
    evidence: &[ChimericAlignment],
    reference: &R,
    config: &AggregationConfig,
) -> Result<VariantRecord, SvDiscoveryError> {
    adjacency.validate()?;

    let sv_type = classify(adjacency)?;
    let (ref_allele, alt_allele) = produce_alleles(adjacency, reference, &sv_type)?;

    let mut attributes: BTreeMap<String, String> = sv_type.info().attributes.clone();
    attributes.insert(
        utils::END.to_string(),
        adjacency.right_breakpoint_start.to_string(),
    );
    attributes.extend(complication_attributes(&adjacency.complication));
    attributes.extend(evidence_attributes(evidence, config));

    Ok(VariantRecord {
        chrom: adjacency.ref_contig.clone(),
        pos: adjacency.left_breakpoint_end,
        end: adjacency.right_breakpoint_start,
        id: sv_type.info().variant_id.clone(),
        ref_allele,
        alt_allele,
        sv_type: sv_type.name().to_string(),
        sv_len: sv_type.info().sv_len,
        attributes,
    })
}
