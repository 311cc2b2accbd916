pub mod allele_builder;
pub mod attribute_aggregator;
pub mod breakpoint_normalizer;
pub mod cli;
pub mod containers;
pub mod errors;
pub mod evidence_aggregator;
pub mod evidence_grouper;
pub mod ingester;
pub mod result_writer;
pub mod type_classifier;
pub mod utils;
pub mod variant_assembler;
