use std::io;
use std::path::PathBuf;

use rust_htslib::faidx;

use crate::containers::NovelAdjacency;
use crate::errors::SvDiscoveryError;
use crate::type_classifier::SvType;

/// Reference-sequence lookup over 1-based closed intervals. This is the
/// only external I/O in per-cluster processing; implementations may block
/// and any caching/broadcast is their own concern.
pub trait ReferenceAccessor {
    fn fetch(&self, contig: &str, start: i64, end: i64) -> io::Result<Vec<u8>>;
}

/// Indexed-FASTA reference accessor
pub struct FastaReferenceAccessor {
    reader: faidx::Reader,
}

impl FastaReferenceAccessor {
    pub fn new(fasta_path: &PathBuf) -> io::Result<Self> {
        let reader = faidx::Reader::from_path(fasta_path)
            .map_err(|error| io::Error::new(io::ErrorKind::Other, error.to_string()))?;
        Ok(FastaReferenceAccessor { reader })
    }
}

impl ReferenceAccessor for FastaReferenceAccessor {
    fn fetch(&self, contig: &str, start: i64, end: i64) -> io::Result<Vec<u8>> {
        // faidx takes 0-based inclusive coordinates
        let bases = self
            .reader
            .fetch_seq(contig, (start - 1) as usize, (end - 1) as usize)
            .map_err(|error| io::Error::new(io::ErrorKind::Other, error.to_string()))?;
        Ok(bases.to_vec())
    }
}

/// Derive the [reference allele, alternate allele] pair for a classified
/// breakpoint: the single reference base at the left breakpoint position
/// and the type's symbolic allele. Accessor failures propagate unchanged;
/// there is no retry here.
pub fn produce_alleles<R: ReferenceAccessor>(
    adjacency: &NovelAdjacency,
    reference: &R,
    sv_type: &SvType,
) -> Result<(String, String), SvDiscoveryError> {
    let position = adjacency.left_breakpoint_end;
    let bases = reference.fetch(&adjacency.ref_contig, position, position)?;
    let ref_allele = String::from_utf8_lossy(&bases).to_uppercase();
    Ok((ref_allele, sv_type.alt_allele()))
}
