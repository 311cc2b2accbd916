use crate::containers::{
    AlignmentRegion, BreakpointComplication, ChimericAlignment, DuplicationAnnotation,
    NovelAdjacency, StrandConnection,
};
use crate::errors::SvDiscoveryError;
use crate::utils;

/// Contract for the breakpoint-normalization collaborator: a deterministic
/// function of a chimeric alignment and its contig sequence that resolves
/// ambiguous breakpoint placement by left-justification and detects
/// complications (inserted sequence, homology, tandem duplication).
/// Implementations must produce structurally equal adjacencies for evidence
/// pointing at the same breakpoint, since the adjacency is the consensus
/// grouping key.
pub trait BreakpointNormalizer {
    fn normalize(
        &self,
        chimeric: &ChimericAlignment,
        contig_sequence: &[u8],
    ) -> Result<NovelAdjacency, SvDiscoveryError>;
}

/// Direct-evidence normalizer.
///
/// Homology is read off the contig-coordinate overlap of the two regions and
/// both breakpoints are shifted left across it. Unaligned contig sequence
/// between the regions becomes the inserted sequence. A reference-interval
/// overlap with no contig overlap is called as a 1 -> 2 tandem-duplication
/// expansion. Duplication contractions and heuristic (imprecise) duplication
/// calls are upstream concerns and never produced here.
pub struct BaselineNormalizer;

impl BreakpointNormalizer for BaselineNormalizer {
    fn normalize(
        &self,
        chimeric: &ChimericAlignment,
        contig_sequence: &[u8],
    ) -> Result<NovelAdjacency, SvDiscoveryError> {
        let lower = &chimeric.region_with_lower_coord;
        let higher = &chimeric.region_with_higher_coord;

        if lower.ref_contig != higher.ref_contig {
            return Err(SvDiscoveryError::CrossContigEvidence {
                left: lower.ref_contig.clone(),
                right: higher.ref_contig.clone(),
            });
        }

        let connection = if lower.is_fwd_strand == higher.is_fwd_strand {
            StrandConnection::SameStrand
        } else {
            StrandConnection::StrandSwitch
        };

        let overlap = utils::overlap_on_contig(lower, higher);
        let gap = higher.contig_start - lower.contig_end - 1;

        let homology = if overlap > 0 {
            contig_slice(contig_sequence, higher.contig_start, lower.contig_end)
        } else {
            String::new()
        };
        let inserted_sequence = if gap > 0 {
            contig_slice(contig_sequence, lower.contig_end + 1, higher.contig_start - 1)
        } else {
            String::new()
        };

        // reference order decides which region provides the left breakpoint
        let (first, second) = if lower.ref_start <= higher.ref_start {
            (lower, higher)
        } else {
            (higher, lower)
        };

        let ref_overlap = connection == StrandConnection::SameStrand
            && second.ref_start <= first.ref_end
            && overlap == 0;
        if ref_overlap {
            // the contig walks the same reference span twice: a clean
            // repeat expansion, possibly with inserted sequence between
            // the two copies
            let duplication = make_expansion_annotation(first, second);
            let breakpoint = second.ref_start - 1;
            return Ok(NovelAdjacency {
                ref_contig: first.ref_contig.clone(),
                left_breakpoint_end: breakpoint,
                right_breakpoint_start: breakpoint,
                connection,
                complication: BreakpointComplication {
                    inserted_sequence,
                    homology,
                    duplication: Some(duplication),
                },
            });
        }

        // left-justify: an overlap on the contig means the breakpoint can be
        // placed anywhere within the homologous span, so both loci take the
        // leftmost valid placement
        Ok(NovelAdjacency {
            ref_contig: first.ref_contig.clone(),
            left_breakpoint_end: first.ref_end - overlap,
            right_breakpoint_start: second.ref_start - 1 - overlap,
            connection,
            complication: BreakpointComplication {
                inserted_sequence,
                homology,
                duplication: None,
            },
        })
    }
}

fn make_expansion_annotation(
    first: &AlignmentRegion,
    second: &AlignmentRegion,
) -> DuplicationAnnotation {
    let unit_start = second.ref_start;
    let unit_end = first.ref_end;
    let unit_len = unit_end - unit_start + 1;
    DuplicationAnnotation {
        unit_contig: first.ref_contig.clone(),
        unit_start,
        unit_end,
        contig_shapes: vec![format!("{}M", unit_len), format!("{}M", unit_len)],
        ref_copies: 1,
        contig_copies: 2,
        imprecise: false,
    }
}

/// Forward-strand contig bases over a 1-based closed interval. Out-of-range
/// intervals yield an empty string rather than panicking on malformed input.
fn contig_slice(contig_sequence: &[u8], start: i64, end: i64) -> String {
    if start < 1 || end < start || end as usize > contig_sequence.len() {
        return String::new();
    }
    String::from_utf8_lossy(&contig_sequence[(start - 1) as usize..end as usize]).to_string()
}
