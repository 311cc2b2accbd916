use std::collections::BTreeMap;

use crate::containers::{BreakpointEvidenceAnnotations, ChimericAlignment};
use crate::utils;

/// Tunables for evidence aggregation, passed in explicitly so the
/// aggregation stays a pure function.
#[derive(Debug, Clone, Copy)]
pub struct AggregationConfig {
    pub high_mapq_threshold: u8,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        AggregationConfig {
            high_mapq_threshold: utils::HIGH_MAPQ_THRESHOLD,
        }
    }
}

/// Summarize all evidence of one consensus cluster into output attributes.
///
/// Evidence may have been merged from distributed partitions in any order,
/// so the per-evidence records are sorted by (assembly ID, contig ID)
/// before any list-valued attribute is emitted; the output is invariant
/// under permutation of the input.
pub fn evidence_attributes(
    evidence: &[ChimericAlignment],
    config: &AggregationConfig,
) -> BTreeMap<String, String> {
    let mut annotations: Vec<BreakpointEvidenceAnnotations> = evidence
        .iter()
        .map(BreakpointEvidenceAnnotations::new)
        .collect();
    annotations.sort_by(|a, b| {
        (&a.assembly_id, &a.contig_id).cmp(&(&b.assembly_id, &b.contig_id))
    });

    let mut attributes = BTreeMap::new();
    attributes.insert(
        utils::TOTAL_MAPPINGS.to_string(),
        annotations.len().to_string(),
    );
    // strict equality to the threshold, not "at least": the published
    // definition of this attribute, preserved as-is
    let hq_count = annotations
        .iter()
        .filter(|annotation| annotation.min_mapq == config.high_mapq_threshold)
        .count();
    attributes.insert(utils::HQ_MAPPINGS.to_string(), hq_count.to_string());
    attributes.insert(
        utils::MAPPING_QUALITIES.to_string(),
        join_values(&annotations, |annotation| annotation.min_mapq.to_string()),
    );
    attributes.insert(
        utils::ALIGN_LENGTHS.to_string(),
        join_values(&annotations, |annotation| {
            annotation.min_align_length.to_string()
        }),
    );
    let max_align_length = annotations
        .iter()
        .map(|annotation| annotation.min_align_length)
        .max()
        .unwrap_or(0);
    attributes.insert(
        utils::MAX_ALIGN_LENGTH.to_string(),
        max_align_length.to_string(),
    );
    attributes.insert(
        utils::ASSEMBLY_IDS.to_string(),
        join_values(&annotations, |annotation| annotation.assembly_id.clone()),
    );
    attributes.insert(
        utils::CONTIG_IDS.to_string(),
        join_values(&annotations, |annotation| annotation.contig_id.clone()),
    );

    let mut insertion_mappings: Vec<String> = annotations
        .iter()
        .flat_map(|annotation| annotation.insertion_mappings.iter().cloned())
        .collect();
    insertion_mappings.sort();
    if !insertion_mappings.is_empty() {
        attributes.insert(
            utils::INSERTED_SEQUENCE_MAPPINGS.to_string(),
            insertion_mappings.join(utils::ATTRIBUTE_SEPARATOR),
        );
    }

    attributes
}

fn join_values<F>(annotations: &[BreakpointEvidenceAnnotations], value: F) -> String
where
    F: Fn(&BreakpointEvidenceAnnotations) -> String,
{
    annotations
        .iter()
        .map(value)
        .collect::<Vec<String>>()
        .join(utils::ATTRIBUTE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::AlignmentRegion;

    fn create_test_region(
        assembly_id: &str,
        contig_id: &str,
        ref_span: i64,
        contig_start: i64,
        mapq: u8,
    ) -> AlignmentRegion {
        AlignmentRegion {
            assembly_id: assembly_id.to_string(),
            contig_id: contig_id.to_string(),
            ref_contig: "chr1".to_string(),
            ref_start: 1000,
            ref_end: 1000 + ref_span - 1,
            contig_start,
            contig_end: contig_start + ref_span - 1,
            is_fwd_strand: true,
            mapq,
        }
    }

    /// The two-evidence scenario pinned down in the external contract:
    /// one clean high-quality mapping with 10 bases of contig overlap, one
    /// mixed-quality mapping carrying an insertion mapping.
    fn create_scenario_evidence() -> Vec<ChimericAlignment> {
        let first = ChimericAlignment::new(
            create_test_region("a1", "c1", 100, 1, 60),
            create_test_region("a1", "c1", 100, 91, 60),
            Vec::new(),
        );
        let second = ChimericAlignment::new(
            create_test_region("a1", "c2", 50, 1, 30),
            create_test_region("a1", "c2", 80, 51, 60),
            vec!["m1".to_string()],
        );
        vec![first, second]
    }

    #[test]
    fn test_scenario_attributes() {
        let attributes =
            evidence_attributes(&create_scenario_evidence(), &AggregationConfig::default());
        assert_eq!(attributes[utils::TOTAL_MAPPINGS], "2");
        assert_eq!(attributes[utils::HQ_MAPPINGS], "1");
        assert_eq!(attributes[utils::MAPPING_QUALITIES], "60,30");
        assert_eq!(attributes[utils::ALIGN_LENGTHS], "90,50");
        assert_eq!(attributes[utils::MAX_ALIGN_LENGTH], "90");
        assert_eq!(attributes[utils::ASSEMBLY_IDS], "a1,a1");
        assert_eq!(attributes[utils::CONTIG_IDS], "c1,c2");
        assert_eq!(attributes[utils::INSERTED_SEQUENCE_MAPPINGS], "m1");
    }

    #[test]
    fn test_output_invariant_under_evidence_permutation() {
        let evidence = create_scenario_evidence();
        let reversed: Vec<ChimericAlignment> = evidence.iter().rev().cloned().collect();
        let config = AggregationConfig::default();
        assert_eq!(
            evidence_attributes(&evidence, &config),
            evidence_attributes(&reversed, &config)
        );
    }

    #[test]
    fn test_empty_collection() {
        let attributes = evidence_attributes(&[], &AggregationConfig::default());
        assert_eq!(attributes[utils::TOTAL_MAPPINGS], "0");
        assert_eq!(attributes[utils::MAX_ALIGN_LENGTH], "0");
        assert!(!attributes.contains_key(utils::INSERTED_SEQUENCE_MAPPINGS));
    }

    #[test]
    fn test_insertion_mappings_present_iff_any_exist() {
        let mut evidence = create_scenario_evidence();
        let with_mappings = evidence_attributes(&evidence, &AggregationConfig::default());
        assert!(with_mappings.contains_key(utils::INSERTED_SEQUENCE_MAPPINGS));

        evidence[1].insertion_mappings.clear();
        let without_mappings = evidence_attributes(&evidence, &AggregationConfig::default());
        assert!(!without_mappings.contains_key(utils::INSERTED_SEQUENCE_MAPPINGS));
    }

    #[test]
    fn test_hq_count_is_strict_equality() {
        // a mapping above the threshold is deliberately not counted
        let evidence = vec![ChimericAlignment::new(
            create_test_region("a1", "c1", 100, 1, 60),
            create_test_region("a1", "c1", 100, 101, 60),
            Vec::new(),
        )];
        let below = AggregationConfig {
            high_mapq_threshold: 50,
        };
        let attributes = evidence_attributes(&evidence, &below);
        assert_eq!(attributes[utils::HQ_MAPPINGS], "0");
    }

    #[test]
    fn test_mappings_flattened_and_resorted_globally() {
        let mut evidence = create_scenario_evidence();
        evidence[0].insertion_mappings = vec!["z9".to_string(), "a0".to_string()];
        let attributes = evidence_attributes(&evidence, &AggregationConfig::default());
        assert_eq!(attributes[utils::INSERTED_SEQUENCE_MAPPINGS], "a0,m1,z9");
    }
}
