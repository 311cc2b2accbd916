use std::collections::BTreeMap;

use crate::containers::{NovelAdjacency, StrandConnection};
use crate::errors::SvDiscoveryError;

/// The four identifiers a classification may produce. Anything outside this
/// list is a logic defect.
pub const KNOWN_SV_TYPES: [&str; 4] = ["INS", "DUP", "DEL", "INV"];

/// Payload shared by every classified type: a deterministic variant
/// identifier, the signed SV length, and type-specific attributes.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SvTypeInfo {
    pub variant_id: String,
    pub sv_len: i64,
    pub attributes: BTreeMap<String, String>,
}

/// Closed classification of a consensus breakpoint. Classification is a
/// pure function producing this union; no further dispatch hangs off it.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SvType {
    Insertion(SvTypeInfo),
    DuplicationTandem(SvTypeInfo),
    Deletion(SvTypeInfo),
    Inversion(SvTypeInfo),
}

impl SvType {
    pub fn name(&self) -> &'static str {
        match self {
            SvType::Insertion(_) => "INS",
            SvType::DuplicationTandem(_) => "DUP",
            SvType::Deletion(_) => "DEL",
            SvType::Inversion(_) => "INV",
        }
    }

    /// Symbolic alternate-allele representation for this type
    pub fn alt_allele(&self) -> String {
        format!("<{}>", self.name())
    }

    pub fn info(&self) -> &SvTypeInfo {
        match self {
            SvType::Insertion(info)
            | SvType::DuplicationTandem(info)
            | SvType::Deletion(info)
            | SvType::Inversion(info) => info,
        }
    }
}

/// Infer the SV type of one consensus breakpoint.
///
/// A strand switch is always an inversion; translocation detection is not
/// attempted. On the same strand, a zero-length reference span means
/// something was inserted (simple insertion, or a tandem-duplication
/// expansion when a duplication annotation is present), while a positive
/// span means something was deleted (clean, scarred, or a repeat
/// contraction). Two signal combinations are fatally ambiguous and fail
/// classification for manual review.
pub fn classify(adjacency: &NovelAdjacency) -> Result<SvType, SvDiscoveryError> {
    adjacency.validate()?;

    let start = adjacency.left_breakpoint_end;
    let end = adjacency.right_breakpoint_start;
    let has_dup = adjacency.complication.has_duplication_annotation();
    let has_ins = adjacency.complication.has_inserted_sequence();

    let sv_type = match adjacency.connection {
        StrandConnection::StrandSwitch => {
            SvType::Inversion(make_info("INV", adjacency, end - start))
        }
        StrandConnection::SameStrand if start == end => {
            if has_dup {
                // clean 1 -> 2 expansion and expansion with extra sequence
                // between the copies are not distinguished at the type level
                SvType::DuplicationTandem(make_info("DUP", adjacency, duplication_length(adjacency)))
            } else if has_ins {
                SvType::Insertion(make_info(
                    "INS",
                    adjacency,
                    adjacency.complication.inserted_sequence.len() as i64,
                ))
            } else {
                return Err(SvDiscoveryError::InsertionWithoutSequence {
                    adjacency: adjacency.to_string(),
                });
            }
        }
        StrandConnection::SameStrand => {
            if has_dup && has_ins {
                return Err(SvDiscoveryError::DeletionWithDuplicationAndInsertion {
                    adjacency: adjacency.to_string(),
                });
            }
            // clean deletion, scarred junction, or repeat contraction 2 -> 1
            SvType::Deletion(make_info("DEL", adjacency, -(end - start)))
        }
    };

    ensure_known(sv_type)
}

fn make_info(name: &str, adjacency: &NovelAdjacency, sv_len: i64) -> SvTypeInfo {
    SvTypeInfo {
        variant_id: format!(
            "{}_{}_{}_{}",
            name,
            adjacency.ref_contig,
            adjacency.left_breakpoint_end,
            adjacency.right_breakpoint_start
        ),
        sv_len,
        attributes: BTreeMap::new(),
    }
}

/// Net bases gained by a tandem-duplication expansion: one repeat-unit span
/// per extra copy, plus any sequence inserted between the copies
fn duplication_length(adjacency: &NovelAdjacency) -> i64 {
    let duplication = adjacency
        .complication
        .duplication
        .as_ref()
        .expect("caller checked for a duplication annotation");
    let copy_delta = duplication.contig_copies as i64 - duplication.ref_copies as i64;
    duplication.unit_span_len() * copy_delta
        + adjacency.complication.inserted_sequence.len() as i64
}

/// Guard against new classification outcomes being wired in without the
/// rest of the pipeline learning about them
fn ensure_known(sv_type: SvType) -> Result<SvType, SvDiscoveryError> {
    if !KNOWN_SV_TYPES.contains(&sv_type.name()) {
        return Err(SvDiscoveryError::UnknownSvType {
            name: sv_type.name().to_string(),
        });
    }
    Ok(sv_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{BreakpointComplication, DuplicationAnnotation};

    fn create_test_adjacency(
        start: i64,
        end: i64,
        connection: StrandConnection,
        inserted_sequence: &str,
        duplication: Option<DuplicationAnnotation>,
    ) -> NovelAdjacency {
        NovelAdjacency {
            ref_contig: "chr1".to_string(),
            left_breakpoint_end: start,
            right_breakpoint_start: end,
            connection,
            complication: BreakpointComplication {
                inserted_sequence: inserted_sequence.to_string(),
                homology: String::new(),
                duplication,
            },
        }
    }

    fn create_test_duplication() -> DuplicationAnnotation {
        DuplicationAnnotation {
            unit_contig: "chr1".to_string(),
            unit_start: 1051,
            unit_end: 1100,
            contig_shapes: vec!["50M".to_string(), "50M".to_string()],
            ref_copies: 1,
            contig_copies: 2,
            imprecise: false,
        }
    }

    #[test]
    fn test_strand_switch_is_always_inversion() {
        for (inserted, duplication) in [
            ("", None),
            ("ACGT", None),
            ("", Some(create_test_duplication())),
            ("ACGT", Some(create_test_duplication())),
        ] {
            let adjacency = create_test_adjacency(
                1000,
                2000,
                StrandConnection::StrandSwitch,
                inserted,
                duplication,
            );
            let sv_type = classify(&adjacency).unwrap();
            assert!(matches!(sv_type, SvType::Inversion(_)));
            assert_eq!(sv_type.info().sv_len, 1000);
        }
    }

    #[test]
    fn test_zero_span_insertion() {
        let adjacency =
            create_test_adjacency(1000, 1000, StrandConnection::SameStrand, "ACGT", None);
        let sv_type = classify(&adjacency).unwrap();
        assert!(matches!(sv_type, SvType::Insertion(_)));
        assert_eq!(sv_type.info().sv_len, 4);
        assert_eq!(sv_type.info().variant_id, "INS_chr1_1000_1000");
        assert_eq!(sv_type.alt_allele(), "<INS>");
    }

    #[test]
    fn test_zero_span_without_sequence_is_fatal() {
        let adjacency = create_test_adjacency(1000, 1000, StrandConnection::SameStrand, "", None);
        let error = classify(&adjacency).unwrap_err();
        assert!(matches!(
            error,
            SvDiscoveryError::InsertionWithoutSequence { .. }
        ));
        assert!(error.to_string().contains("chr1:1000-1000"));
    }

    #[test]
    fn test_zero_span_duplication_with_and_without_insertion() {
        for inserted in ["", "ACGT"] {
            let adjacency = create_test_adjacency(
                1050,
                1050,
                StrandConnection::SameStrand,
                inserted,
                Some(create_test_duplication()),
            );
            let sv_type = classify(&adjacency).unwrap();
            assert!(matches!(sv_type, SvType::DuplicationTandem(_)));
            // one extra 50bp copy plus whatever sits between the copies
            assert_eq!(sv_type.info().sv_len, 50 + inserted.len() as i64);
        }
    }

    #[test]
    fn test_positive_span_deletions() {
        let cases = [
            ("", None),                               // clean
            ("ACGT", None),                           // scarred junction
            ("", Some(create_test_duplication())),    // repeat contraction
        ];
        for (inserted, duplication) in cases {
            let adjacency = create_test_adjacency(
                1000,
                2000,
                StrandConnection::SameStrand,
                inserted,
                duplication,
            );
            let sv_type = classify(&adjacency).unwrap();
            assert!(matches!(sv_type, SvType::Deletion(_)));
            assert_eq!(sv_type.info().sv_len, -1000);
            assert_eq!(sv_type.alt_allele(), "<DEL>");
        }
    }

    #[test]
    fn test_positive_span_with_dup_and_insertion_is_fatal() {
        let adjacency = create_test_adjacency(
            1000,
            2000,
            StrandConnection::SameStrand,
            "ACGT",
            Some(create_test_duplication()),
        );
        assert!(matches!(
            classify(&adjacency).unwrap_err(),
            SvDiscoveryError::DeletionWithDuplicationAndInsertion { .. }
        ));
    }

    #[test]
    fn test_out_of_order_breakpoints_fail_before_inference() {
        // even with signals that would otherwise classify cleanly
        let adjacency =
            create_test_adjacency(500, 480, StrandConnection::SameStrand, "ACGT", None);
        assert!(matches!(
            classify(&adjacency).unwrap_err(),
            SvDiscoveryError::BreakpointsOutOfOrder { .. }
        ));
    }

    #[test]
    fn test_classification_stays_in_known_types() {
        let adjacencies = [
            create_test_adjacency(1000, 1000, StrandConnection::SameStrand, "ACGT", None),
            create_test_adjacency(
                1050,
                1050,
                StrandConnection::SameStrand,
                "",
                Some(create_test_duplication()),
            ),
            create_test_adjacency(1000, 2000, StrandConnection::SameStrand, "", None),
            create_test_adjacency(1000, 2000, StrandConnection::StrandSwitch, "", None),
        ];
        for adjacency in adjacencies {
            let sv_type = classify(&adjacency).unwrap();
            assert!(KNOWN_SV_TYPES.contains(&sv_type.name()));
        }
    }
}
