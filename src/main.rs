use std::collections::HashMap;
use std::env;
use std::time::SystemTime;

use log::{debug, error, info, LevelFilter};
use svconsensus::allele_builder::FastaReferenceAccessor;
use svconsensus::breakpoint_normalizer::BaselineNormalizer;
use svconsensus::cli::{get_args, Arguments};
use svconsensus::containers::{ChimericAlignment, NovelAdjacency, VariantRecord};
use svconsensus::evidence_aggregator::AggregationConfig;
use svconsensus::evidence_grouper::group_evidence;
use svconsensus::ingester::{
    assemble_contig_inputs, read_alignment_regions, read_contig_sequences,
};
use svconsensus::utils::is_local_file;
use svconsensus::variant_assembler::assemble_variant;
use svconsensus::result_writer;

fn set_up() -> Arguments {
    let args = get_args();
    let filter_level: LevelFilter = match args.verbose {
        false => LevelFilter::Info,
        true => LevelFilter::Debug,
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    let version = env!("CARGO_PKG_VERSION");
    info!("\nRunning svconsensus v{version}\n");

    let cmd: Vec<String> = env::args().collect();
    let cmd_str = cmd.join(" ");
    debug!("Run command: {cmd_str}");
    debug!("v{version}\n");

    if !is_local_file(&args.alignments_path) {
        error!("Alignments file {} not found", args.alignments_path);
        std::process::exit(exitcode::CONFIG);
    }

    let path = std::path::Path::new(&args.outdir);
    if !path.exists() || !path.is_dir() {
        error!("outdir {} does not exist", args.outdir,);
        std::process::exit(exitcode::CONFIG);
    }
    if args.prefix.contains('_') {
        error!("Prefix does not allow underscores");
        std::process::exit(exitcode::CONFIG);
    }

    args
}

fn log_time(start_time: SystemTime) {
    let elapsed_time = start_time.elapsed().unwrap().as_secs();
    let hours = elapsed_time / 3600;
    let minutes = (elapsed_time % 3600) / 60;
    let seconds = elapsed_time % 60;
    debug!("Running time: {hours}h:{minutes}m:{seconds}s");
}

/// Turn every consensus cluster into a variant record. Clusters are
/// processed in reference order for reproducible logs, and a failing
/// cluster is reported and skipped without aborting its siblings.
fn call_variants(
    clusters: HashMap<NovelAdjacency, Vec<ChimericAlignment>>,
    reference: &FastaReferenceAccessor,
    config: &AggregationConfig,
) -> Vec<VariantRecord> {
    let mut ordered_clusters: Vec<(&NovelAdjacency, &Vec<ChimericAlignment>)> =
        clusters.iter().collect();
    ordered_clusters.sort_by(|(a, _), (b, _)| {
        (&a.ref_contig, a.left_breakpoint_end, a.right_breakpoint_start).cmp(&(
            &b.ref_contig,
            b.left_breakpoint_end,
            b.right_breakpoint_start,
        ))
    });

    let mut variant_records = Vec::new();
    let mut failed_clusters = 0;
    for (adjacency, evidence) in ordered_clusters {
        match assemble_variant(adjacency, evidence, reference, config) {
            Ok(record) => variant_records.push(record),
            Err(cluster_error) => {
                failed_clusters += 1;
                error!("Skipping cluster {}: {}", adjacency, cluster_error);
            }
        }
    }
    debug!("{} clusters failed variant assembly", failed_clusters);
    variant_records
}

fn main() {
    ///////////////////////////////////////////////////////////////////////////
    // Set up
    let args = set_up();
    let start_time = SystemTime::now();

    ///////////////////////////////////////////////////////////////////////////
    // Get evidence data
    let regions_by_contig = read_alignment_regions(&args.alignments_path);
    let contig_sequences = read_contig_sequences(&args.contigs_path);
    let contigs = assemble_contig_inputs(regions_by_contig, contig_sequences);

    ///////////////////////////////////////////////////////////////////////////
    // Group chimeric-alignment evidence into consensus breakpoint clusters
    let clusters = group_evidence(&contigs, &BaselineNormalizer);

    ///////////////////////////////////////////////////////////////////////////
    // Classify, annotate, and assemble one variant per cluster
    let reference = match FastaReferenceAccessor::new(&args.reference_path) {
        Ok(reference) => reference,
        Err(io_error) => {
            error!(
                "Failed to open reference {}: {}",
                args.reference_path.display(),
                io_error
            );
            std::process::exit(exitcode::NOINPUT);
        }
    };
    let config = AggregationConfig {
        high_mapq_threshold: args.high_mapq_threshold,
    };
    let variant_records = call_variants(clusters, &reference, &config);
    info!("{} consensus variants called", variant_records.len());

    ///////////////////////////////////////////////////////////////////////////
    // Write results
    result_writer::write_results(
        variant_records,
        args.outdir.trim_end_matches('/').to_string(),
        args.prefix,
        args.write_unzipped,
    );
    log_time(start_time);
}
