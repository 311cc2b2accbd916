use log::{debug, warn};
use std::collections::HashMap;

use crate::breakpoint_normalizer::BreakpointNormalizer;
use crate::containers::{
    AlignmentRegion, ChimericAlignment, ContigAlignments, ContigKey, NovelAdjacency,
};

/// Pair up a contig's alignment regions into chimeric-alignment evidence
/// units. Regions are ordered by contig coordinate and each consecutive pair
/// becomes one unit; any unaligned contig gap between the paired regions is
/// recorded as an insertion-sequence mapping string.
pub fn make_chimeric_alignments(regions: &[AlignmentRegion]) -> Vec<ChimericAlignment> {
    let mut ordered: Vec<AlignmentRegion> = regions.to_vec();
    ordered.sort_by_key(|region| (region.contig_start, region.contig_end));

    let mut chimeric_alignments = Vec::new();
    for pair in ordered.windows(2) {
        let (lower, higher) = (&pair[0], &pair[1]);
        let mut insertion_mappings = Vec::new();
        let gap_start = lower.contig_end + 1;
        let gap_end = higher.contig_start - 1;
        if gap_start <= gap_end {
            insertion_mappings.push(format!(
                "{}.{}:{}-{}",
                lower.assembly_id, lower.contig_id, gap_start, gap_end
            ));
        }
        chimeric_alignments.push(ChimericAlignment::new(
            lower.clone(),
            higher.clone(),
            insertion_mappings,
        ));
    }
    chimeric_alignments
}

/// Group all chimeric-alignment evidence by its normalized breakpoint.
///
/// Contigs with fewer than two alignment regions carry no breakpoint
/// evidence and are dropped up front. Every remaining evidence unit is
/// normalized to its NovelAdjacency key and units with structurally equal
/// keys land in one consensus cluster. Accumulation is purely key-driven,
/// so the result is independent of the order contigs arrive in; evidence
/// whose normalization fails is logged and skipped without affecting
/// sibling contigs.
pub fn group_evidence<N: BreakpointNormalizer>(
    contigs: &HashMap<ContigKey, ContigAlignments>,
    normalizer: &N,
) -> HashMap<NovelAdjacency, Vec<ChimericAlignment>> {
    let mut clusters: HashMap<NovelAdjacency, Vec<ChimericAlignment>> = HashMap::new();
    let mut dropped_contigs = 0;
    let mut rejected_evidence = 0;

    for ((assembly_id, contig_id), contig_alignments) in contigs.iter() {
        if contig_alignments.regions.len() < 2 {
            dropped_contigs += 1;
            continue;
        }
        for chimeric in make_chimeric_alignments(&contig_alignments.regions) {
            match normalizer.normalize(&chimeric, &contig_alignments.sequence) {
                Ok(adjacency) => {
                    clusters.entry(adjacency).or_default().push(chimeric);
                }
                Err(error) => {
                    warn!(
                        "Dropping evidence from {}.{}: {}",
                        assembly_id, contig_id, error
                    );
                    rejected_evidence += 1;
                }
            }
        }
    }

    debug!("{} contigs dropped with fewer than two alignments", dropped_contigs);
    debug!("{} evidence units rejected during normalization", rejected_evidence);
    debug!("{} consensus breakpoint clusters", clusters.len());
    clusters
}

/// Merge grouped evidence from two partitions. Equal adjacency keys merge
/// into one cluster, so repeated merging is associative and commutative up
/// to evidence order within a cluster; downstream aggregation sorts the
/// evidence, making partition order immaterial to the output.
pub fn merge_grouped(
    mut accumulated: HashMap<NovelAdjacency, Vec<ChimericAlignment>>,
    partition: HashMap<NovelAdjacency, Vec<ChimericAlignment>>,
) -> HashMap<NovelAdjacency, Vec<ChimericAlignment>> {
    for (adjacency, mut evidence) in partition {
        accumulated
            .entry(adjacency)
            .or_default()
            .append(&mut evidence);
    }
    accumulated
}
