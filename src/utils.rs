use std::io::{BufRead, BufReader};

use log::error;

use crate::containers::AlignmentRegion;

/// Mapping quality at which a chimeric alignment is counted as
/// high-confidence support for a breakpoint.
pub const HIGH_MAPQ_THRESHOLD: u8 = 60;

/// Separator used to join multi-value attribute entries. Downstream
/// variant-format tooling parses on this character, so it is a fixed
/// external contract.
pub const ATTRIBUTE_SEPARATOR: &str = ",";

/// Attribute key identifiers, fixed for downstream compatibility.
pub const SVTYPE: &str = "SVTYPE";
pub const SVLEN: &str = "SVLEN";
pub const END: &str = "END";
pub const INSERTED_SEQUENCE: &str = "INSERTED_SEQUENCE";
pub const HOMOLOGY: &str = "HOMOLOGY";
pub const HOMOLOGY_LENGTH: &str = "HOMOLOGY_LENGTH";
pub const DUP_REPEAT_UNIT_REF_SPAN: &str = "DUP_REPEAT_UNIT_REF_SPAN";
pub const DUP_SEQ_SHAPES: &str = "DUP_SEQ_SHAPES";
pub const DUPLICATION_NUMBERS: &str = "DUPLICATION_NUMBERS";
pub const DUP_ANNOTATIONS_IMPRECISE: &str = "DUP_ANNOTATIONS_IMPRECISE";
pub const TOTAL_MAPPINGS: &str = "TOTAL_MAPPINGS";
pub const HQ_MAPPINGS: &str = "HQ_MAPPINGS";
pub const MAPPING_QUALITIES: &str = "MAPPING_QUALITIES";
pub const ALIGN_LENGTHS: &str = "ALIGN_LENGTHS";
pub const MAX_ALIGN_LENGTH: &str = "MAX_ALIGN_LENGTH";
pub const ASSEMBLY_IDS: &str = "ASSEMBLY_IDS";
pub const CONTIG_IDS: &str = "CONTIG_IDS";
pub const INSERTED_SEQUENCE_MAPPINGS: &str = "INSERTED_SEQUENCE_MAPPINGS";

/// first two bytes of a gzip file that indicate the compression algorithm used
const GZIP_INDICATOR: [u8; 2] = [0x1F, 0x8B];

/// Number of contig-coordinate bases shared by two alignment regions of the
/// same contig. Zero when the regions are disjoint on the contig.
pub fn overlap_on_contig(region_a: &AlignmentRegion, region_b: &AlignmentRegion) -> i64 {
    let (first, second) = if region_a.contig_start <= region_b.contig_start {
        (region_a, region_b)
    } else {
        (region_b, region_a)
    };
    std::cmp::max(0, first.contig_end - second.contig_start + 1)
}

pub fn is_local_file(filepath: &String) -> bool {
    let path = std::path::Path::new(filepath);

    match std::fs::metadata(path) {
        Ok(metadata) => metadata.is_file(),
        Err(_) => false, // If there is an error (e.g., path doesn't exist), return false
    }
}

/// Check if a file is a gzipped file from a String path
pub fn is_gzipped(path: &String) -> bool {
    if !is_local_file(path) {
        return false;
    }
    let file_handle = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) => {
            error!("File does not exist: \"{}\"", path);
            error!("{}", e);
            std::process::exit(exitcode::IOERR);
        }
    };
    let mut reader = std::io::BufReader::new(file_handle);
    let mut gzip_indicator_bytes = [0; 2];
    let _ = std::io::Read::read_exact(&mut reader, &mut gzip_indicator_bytes);
    let _ = std::io::Seek::rewind(&mut reader);
    gzip_indicator_bytes == GZIP_INDICATOR
}

/// Read a plain text or gzipped text file into vector of Strings by line
pub fn read_file_from_path(file_path: &String) -> Vec<String> {
    assert!(is_local_file(file_path));

    let path = std::path::Path::new(file_path);
    let file: std::fs::File = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(_) => {
            error!("File not found {}", file_path);
            std::process::exit(exitcode::IOERR);
        }
    };

    let lines_result = match is_gzipped(file_path) {
        true => {
            let bgzf_reader = match rust_htslib::bgzf::Reader::from_path(file_path) {
                Ok(r) => r,
                Err(_) => {
                    error!("Failed to read alignment file {}", file_path);
                    std::process::exit(exitcode::IOERR);
                }
            };
            let reader = BufReader::new(bgzf_reader);
            reader.lines().collect()
        }
        false => {
            let reader = BufReader::new(file);
            reader.lines().collect()
        }
    };
    match lines_result {
        Ok(l) => l,
        Err(_) => {
            error!("Failed to read alignment file {}", file_path);
            std::process::exit(exitcode::IOERR);
        }
    }
}
