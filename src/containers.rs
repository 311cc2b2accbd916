use core::fmt;
use serde::Serialize;
use std::cmp::min;
use std::collections::BTreeMap;

use crate::errors::SvDiscoveryError;
use crate::utils;

/// Key identifying one assembled contig: (assembly ID, contig ID)
pub type ContigKey = (String, String);

/// Raw per-contig input to grouping: the contig's alignment regions plus
/// its base sequence.
#[derive(Debug, Clone)]
pub struct ContigAlignments {
    pub regions: Vec<AlignmentRegion>,
    pub sequence: Vec<u8>,
}

/// One contiguous mapping of part of an assembled contig to the reference.
/// All intervals are 1-based and closed.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, PartialOrd, Ord)]
pub struct AlignmentRegion {
    pub assembly_id: String,
    pub contig_id: String,

    /// reference sequence name
    pub ref_contig: String,
    pub ref_start: i64,
    pub ref_end: i64,

    /// interval covered on the contig itself
    pub contig_start: i64,
    pub contig_end: i64,

    pub is_fwd_strand: bool,
    pub mapq: u8,
}

impl AlignmentRegion {
    /// Number of reference bases covered by this region
    pub fn ref_span_len(&self) -> i64 {
        self.ref_end - self.ref_start + 1
    }
}

impl fmt::Display for AlignmentRegion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}.{} {}:{}-{} ctg:{}-{} {} mapq={}",
            &self.assembly_id,
            &self.contig_id,
            &self.ref_contig,
            self.ref_start,
            self.ref_end,
            self.contig_start,
            self.contig_end,
            if self.is_fwd_strand { '+' } else { '-' },
            self.mapq,
        )
    }
}

/// One evidentiary unit: a pair of alignment regions from the same contig,
/// ordered by contig coordinate, plus mapping annotations for any sequence
/// inserted between them. Immutable once built; identity is structural.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ChimericAlignment {
    pub region_with_lower_coord: AlignmentRegion,
    pub region_with_higher_coord: AlignmentRegion,
    pub insertion_mappings: Vec<String>,
}

impl ChimericAlignment {
    /// Build from two regions of the same contig, ordering them by contig
    /// coordinate
    pub fn new(
        region_a: AlignmentRegion,
        region_b: AlignmentRegion,
        insertion_mappings: Vec<String>,
    ) -> Self {
        let (lower, higher) = if region_a.contig_start <= region_b.contig_start {
            (region_a, region_b)
        } else {
            (region_b, region_a)
        };
        ChimericAlignment {
            region_with_lower_coord: lower,
            region_with_higher_coord: higher,
            insertion_mappings,
        }
    }
}

/// How the two breakpoint ends connect on the sample haplotype
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize)]
pub enum StrandConnection {
    SameStrand,
    StrandSwitch,
}

impl fmt::Display for StrandConnection {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrandConnection::SameStrand => write!(formatter, "SAME_STRAND"),
            StrandConnection::StrandSwitch => write!(formatter, "STRAND_SWITCH"),
        }
    }
}

/// Tandem-duplication detail attached to a breakpoint
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize)]
pub struct DuplicationAnnotation {
    /// reference span of a single repeat unit
    pub unit_contig: String,
    pub unit_start: i64,
    pub unit_end: i64,

    /// alignment-shape strings for each repeat copy on the contig
    pub contig_shapes: Vec<String>,

    pub ref_copies: u32,
    pub contig_copies: u32,

    /// true when the duplication call came from heuristic optimization
    /// rather than direct alignment evidence
    pub imprecise: bool,
}

impl DuplicationAnnotation {
    pub fn unit_span_len(&self) -> i64 {
        self.unit_end - self.unit_start + 1
    }

    pub fn unit_span_string(&self) -> String {
        format!("{}:{}-{}", self.unit_contig, self.unit_start, self.unit_end)
    }
}

/// Extra detail at a breakpoint that complicates the simple
/// deletion/insertion interpretation. Sequences are forward-strand
/// representations.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Default)]
pub struct BreakpointComplication {
    pub inserted_sequence: String,
    pub homology: String,
    pub duplication: Option<DuplicationAnnotation>,
}

impl BreakpointComplication {
    pub fn has_duplication_annotation(&self) -> bool {
        self.duplication.is_some()
    }

    pub fn has_inserted_sequence(&self) -> bool {
        !self.inserted_sequence.is_empty()
    }
}

impl fmt::Display for BreakpointComplication {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "ins={} hom={} dup={}",
            if self.inserted_sequence.is_empty() {
                "."
            } else {
                &self.inserted_sequence
            },
            if self.homology.is_empty() {
                "."
            } else {
                &self.homology
            },
            match &self.duplication {
                Some(dup) => dup.unit_span_string(),
                None => ".".to_string(),
            },
        )
    }
}

/// The consensus breakpoint key: two left-justified reference loci, the end
/// connection type, and the complication. Field-wise equality and hashing
/// make this the grouping key for consensus clusters, so all fields must
/// stay immutable after construction.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize)]
pub struct NovelAdjacency {
    pub ref_contig: String,

    /// end of the left-justified left breakpoint locus (1-based)
    pub left_breakpoint_end: i64,

    /// start of the left-justified right breakpoint locus (1-based)
    pub right_breakpoint_start: i64,

    pub connection: StrandConnection,
    pub complication: BreakpointComplication,
}

impl NovelAdjacency {
    /// Check the breakpoint ordering invariant. A violation is a data
    /// problem fatal to this cluster only and is never silently corrected.
    pub fn validate(&self) -> Result<(), SvDiscoveryError> {
        if self.left_breakpoint_end > self.right_breakpoint_start {
            return Err(SvDiscoveryError::BreakpointsOutOfOrder {
                adjacency: self.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for NovelAdjacency {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}:{}-{} {} [{}]",
            &self.ref_contig,
            self.left_breakpoint_end,
            self.right_breakpoint_start,
            self.connection,
            self.complication,
        )
    }
}

/// Per-evidence record derived from one chimeric alignment, used only while
/// aggregating cluster statistics
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct BreakpointEvidenceAnnotations {
    pub min_mapq: u8,
    pub min_align_length: i64,
    pub assembly_id: String,
    pub contig_id: String,
    pub insertion_mappings: Vec<String>,
}

impl BreakpointEvidenceAnnotations {
    pub fn new(chimeric_alignment: &ChimericAlignment) -> Self {
        let lower = &chimeric_alignment.region_with_lower_coord;
        let higher = &chimeric_alignment.region_with_higher_coord;
        BreakpointEvidenceAnnotations {
            min_mapq: min(lower.mapq, higher.mapq),
            min_align_length: min(lower.ref_span_len(), higher.ref_span_len())
                - utils::overlap_on_contig(lower, higher),
            assembly_id: lower.assembly_id.clone(),
            contig_id: lower.contig_id.clone(),
            insertion_mappings: chimeric_alignment.insertion_mappings.clone(),
        }
    }
}

/// Finished consensus variant call for one cluster
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct VariantRecord {
    pub chrom: String,
    pub pos: i64,
    pub end: i64,
    pub id: String,
    pub ref_allele: String,
    pub alt_allele: String,
    pub sv_type: String,
    pub sv_len: i64,

    /// merged type-specific, complication, and evidence attributes;
    /// BTreeMap keeps output ordering stable
    pub attributes: BTreeMap<String, String>,
}

impl fmt::Display for VariantRecord {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attribute_string = self
            .attributes
            .iter()
            .map(|(key, value)| {
                if value.is_empty() {
                    key.clone()
                } else {
                    format!("{}={}", key, value)
                }
            })
            .collect::<Vec<String>>()
            .join(";");
        write!(
            formatter,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            &self.chrom,
            self.pos,
            self.end,
            &self.id,
            &self.ref_allele,
            &self.alt_allele,
            &self.sv_type,
            self.sv_len,
            attribute_string,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn create_test_region(ref_start: i64, ref_end: i64, mapq: u8) -> AlignmentRegion {
        AlignmentRegion {
            assembly_id: "asm1".to_string(),
            contig_id: "ctg1".to_string(),
            ref_contig: "chr1".to_string(),
            ref_start,
            ref_end,
            contig_start: 1,
            contig_end: ref_end - ref_start + 1,
            is_fwd_strand: true,
            mapq,
        }
    }

    fn create_test_adjacency(left: i64, right: i64) -> NovelAdjacency {
        NovelAdjacency {
            ref_contig: "chr1".to_string(),
            left_breakpoint_end: left,
            right_breakpoint_start: right,
            connection: StrandConnection::SameStrand,
            complication: BreakpointComplication::default(),
        }
    }

    #[test]
    fn test_chimeric_alignment_orders_regions_by_contig_coordinate() {
        let mut lower = create_test_region(100, 200, 60);
        lower.contig_start = 1;
        lower.contig_end = 101;
        let mut higher = create_test_region(500, 600, 60);
        higher.contig_start = 102;
        higher.contig_end = 202;

        let swapped = ChimericAlignment::new(higher.clone(), lower.clone(), Vec::new());
        assert_eq!(swapped.region_with_lower_coord, lower);
        assert_eq!(swapped.region_with_higher_coord, higher);
    }

    #[test]
    fn test_novel_adjacency_is_a_value_key() {
        let first = create_test_adjacency(1000, 2000);
        let second = create_test_adjacency(1000, 2000);
        let third = create_test_adjacency(1000, 2001);
        assert_eq!(first, second);
        assert_ne!(first, third);

        let mut grouped: HashMap<NovelAdjacency, Vec<u32>> = HashMap::new();
        grouped.entry(first).or_default().push(1);
        grouped.entry(second).or_default().push(2);
        grouped.entry(third).or_default().push(3);
        assert_eq!(grouped.len(), 2);
    }

    #[test]
    fn test_novel_adjacency_validation() {
        assert!(create_test_adjacency(1000, 1000).validate().is_ok());
        assert!(create_test_adjacency(1000, 2000).validate().is_ok());

        let inverted = create_test_adjacency(500, 480);
        let error = inverted.validate().unwrap_err();
        // the error must carry the full breakpoint description
        assert!(error.to_string().contains("chr1:500-480"));
    }

    #[test]
    fn test_evidence_annotations_from_chimeric_alignment() {
        let mut region_a = create_test_region(1000, 1099, 60);
        region_a.contig_start = 1;
        region_a.contig_end = 100;
        let mut region_b = create_test_region(2000, 2049, 30);
        region_b.contig_start = 91;
        region_b.contig_end = 140;

        let chimeric = ChimericAlignment::new(region_a, region_b, vec!["m1".to_string()]);
        let annotations = BreakpointEvidenceAnnotations::new(&chimeric);
        assert_eq!(annotations.min_mapq, 30);
        // min ref span (50) minus 10 bases of contig overlap
        assert_eq!(annotations.min_align_length, 40);
        assert_eq!(annotations.assembly_id, "asm1");
        assert_eq!(annotations.contig_id, "ctg1");
        assert_eq!(annotations.insertion_mappings, vec!["m1".to_string()]);
    }

    #[test]
    fn test_variant_record_display() {
        let mut attributes = BTreeMap::new();
        attributes.insert("TOTAL_MAPPINGS".to_string(), "2".to_string());
        attributes.insert("DUP_ANNOTATIONS_IMPRECISE".to_string(), String::new());
        let record = VariantRecord {
            chrom: "chr1".to_string(),
            pos: 1000,
            end: 1200,
            id: "DEL_chr1_1000_1200".to_string(),
            ref_allele: "A".to_string(),
            alt_allele: "<DEL>".to_string(),
            sv_type: "DEL".to_string(),
            sv_len: -200,
            attributes,
        };
        assert_eq!(
            record.to_string(),
            "chr1\t1000\t1200\tDEL_chr1_1000_1200\tA\t<DEL>\tDEL\t-200\tDUP_ANNOTATIONS_IMPRECISE;TOTAL_MAPPINGS=2"
        );
    }
}
