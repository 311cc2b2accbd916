use chrono::Datelike;
use clap::Parser;
use std::path::PathBuf;

#[derive(Clone, Parser)]
#[clap(author, version, about,
    after_help = format!("Copyright (C) {}     svconsensus contributors.
This program is intended for Research Use Only and not
for use in diagnostic procedures.", chrono::Utc::now().year()))]
pub struct Arguments {
    /// Tab-separated contig alignment regions
    /// (assembly, contig, chrom, ref_start, ref_end, contig_start, contig_end, strand, mapq).
    /// GZIP files allowed.
    #[clap(required = true)]
    #[clap(long = "alignments")]
    #[clap(value_name = "TSV")]
    pub alignments_path: String,

    /// FASTA of assembled contig sequences, records named {assembly}.{contig}
    #[clap(required = true)]
    #[clap(long = "contigs")]
    #[clap(value_name = "FASTA")]
    pub contigs_path: PathBuf,

    /// Indexed reference genome FASTA
    #[clap(required = true)]
    #[clap(long = "reference")]
    #[clap(value_name = "FASTA")]
    pub reference_path: PathBuf,

    /// Output directory path
    #[clap(required = true)]
    #[clap(long = "outdir")]
    #[clap(value_name = "STRING")]
    pub outdir: String,

    /// Sample or project ID. No underscores allowed.
    #[clap(required = true)]
    #[clap(long = "prefix")]
    #[clap(value_name = "STRING")]
    pub prefix: String,

    /// Mapping quality counted as high-confidence breakpoint support
    #[clap(required = false)]
    #[clap(long = "high-mapq")]
    #[clap(value_name = "INT")]
    #[clap(default_value = "60")]
    pub high_mapq_threshold: u8,

    /// Flag to output results in unzipped format
    #[clap(long = "write-unzipped", hide = true)]
    pub write_unzipped: bool,

    /// Optional flag to print verbose output for debugging purposes.
    #[clap(long = "verbose")]
    pub verbose: bool,
}

pub fn get_args() -> Arguments {
    Arguments::parse()
}
