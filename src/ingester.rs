use log::{debug, error, warn};
use std::collections::HashMap;
use std::path::PathBuf;

use bio::io::fasta;

use crate::containers::{AlignmentRegion, ContigAlignments, ContigKey};
use crate::utils;

/// Read alignment regions from a plain or gzipped TSV, keyed by
/// (assembly ID, contig ID). Expected columns:
/// assembly, contig, chrom, ref_start, ref_end, contig_start, contig_end,
/// strand (+/-), mapq. Lines starting with '#' are skipped. Termination
/// triggered on malformed records.
pub fn read_alignment_regions(alignments_path: &String) -> HashMap<ContigKey, Vec<AlignmentRegion>> {
    let mut regions_by_contig: HashMap<ContigKey, Vec<AlignmentRegion>> = HashMap::new();
    let mut region_count = 0;

    for (line_number, line) in utils::read_file_from_path(alignments_path).iter().enumerate() {
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let region = match parse_alignment_line(line) {
            Some(region) => region,
            None => {
                error!(
                    "Malformed alignment record at line {} of {}: \"{}\"",
                    line_number + 1,
                    alignments_path,
                    line
                );
                std::process::exit(exitcode::DATAERR);
            }
        };
        region_count += 1;
        regions_by_contig
            .entry((region.assembly_id.clone(), region.contig_id.clone()))
            .or_default()
            .push(region);
    }
    debug!(
        "{} alignment regions across {} contigs",
        region_count,
        regions_by_contig.len()
    );
    regions_by_contig
}

fn parse_alignment_line(line: &str) -> Option<AlignmentRegion> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != 9 {
        return None;
    }
    let is_fwd_strand = match fields[7] {
        "+" => true,
        "-" => false,
        _ => return None,
    };
    Some(AlignmentRegion {
        assembly_id: fields[0].to_string(),
        contig_id: fields[1].to_string(),
        ref_contig: fields[2].to_string(),
        ref_start: fields[3].parse().ok()?,
        ref_end: fields[4].parse().ok()?,
        contig_start: fields[5].parse().ok()?,
        contig_end: fields[6].parse().ok()?,
        is_fwd_strand,
        mapq: fields[8].parse().ok()?,
    })
}

/// Read assembled contig sequences from FASTA. Record IDs are expected as
/// {assembly}.{contig}; records without the separator are skipped with a
/// warning.
pub fn read_contig_sequences(contigs_path: &PathBuf) -> HashMap<ContigKey, Vec<u8>> {
    let contigs_name_str = contigs_path.as_os_str().to_str().unwrap();
    let reader = fasta::Reader::from_file(contigs_path).unwrap_or_else(|_error| {
        error!("Input contig FASTA does not exist: \"{}\"", contigs_name_str);
        std::process::exit(exitcode::NOINPUT);
    });

    let mut sequences = HashMap::new();
    for record_result in reader.records() {
        let record = match record_result {
            Ok(record) => record,
            Err(_) => {
                error!("Error parsing contig FASTA: {}", contigs_name_str);
                std::process::exit(exitcode::IOERR);
            }
        };
        match record.id().split_once('.') {
            Some((assembly_id, contig_id)) => {
                sequences.insert(
                    (assembly_id.to_string(), contig_id.to_string()),
                    record.seq().to_vec(),
                );
            }
            None => {
                warn!(
                    "Skipping contig record \"{}\" without {{assembly}}.{{contig}} name",
                    record.id()
                );
            }
        }
    }
    debug!("{} contig sequences", sequences.len());
    sequences
}

/// Join alignment regions with their contig sequences into grouping input.
/// Contigs without a sequence cannot be normalized and are skipped with a
/// warning.
pub fn assemble_contig_inputs(
    regions_by_contig: HashMap<ContigKey, Vec<AlignmentRegion>>,
    mut sequences: HashMap<ContigKey, Vec<u8>>,
) -> HashMap<ContigKey, ContigAlignments> {
    let mut contigs = HashMap::new();
    for (contig_key, regions) in regions_by_contig {
        match sequences.remove(&contig_key) {
            Some(sequence) => {
                contigs.insert(contig_key, ContigAlignments { regions, sequence });
            }
            None => {
                warn!(
                    "No sequence for contig {}.{}; its evidence is skipped",
                    contig_key.0, contig_key.1
                );
            }
        }
    }
    debug!("{} contigs with alignments and sequence", contigs.len());
    contigs
}
