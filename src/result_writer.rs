use bgzip::{BGZFWriter, Compression};
use std::path::PathBuf;

use crate::containers::VariantRecord;
use flate2::write::GzEncoder;
use log::{debug, error, info};
use std::fs::File;
use std::io::Write;
use std::io::{self, BufWriter};

/// Writes the consensus variant calls as a pretty JSON file plus a tabular
/// summary, into the given output directory. Records are ordered by
/// reference position so repeated runs produce identical files.
pub fn write_results(
    mut variant_records: Vec<VariantRecord>,
    outdir: String,
    prefix: String,
    write_unzipped: bool,
) {
    variant_records.sort_by(|a, b| {
        (&a.chrom, a.pos, a.end, &a.id).cmp(&(&b.chrom, b.pos, b.end, &b.id))
    });
    debug!("{} variant records to write", variant_records.len());

    let (table_path, json_path) =
        generate_output_paths(outdir.clone(), prefix.clone(), write_unzipped);
    let json_string = records_to_json(&variant_records);

    if let Err(error) = write_json(json_string, json_path.clone()) {
        error!("Error writing JSON result to outdir {}\n{}", outdir, error);
        std::process::exit(exitcode::IOERR);
    }

    if write_unzipped {
        if let Err(error) = write_unzipped_table(&variant_records, table_path.clone()) {
            error!("Error writing table result to outdir {}\n{}", outdir, error);
            std::process::exit(exitcode::IOERR);
        }
    } else if let Err(error) = write_gzipped_table(&variant_records, table_path.clone()) {
        error!("Error writing table result to outdir {}\n{}", outdir, error);
        std::process::exit(exitcode::IOERR);
    }
    info!("JSON written to {}", json_path,);
    info!("Table written to {}", table_path,);
}

/// Convert variant records into a pretty json String
fn records_to_json(variant_records: &Vec<VariantRecord>) -> String {
    match serde_json::to_string_pretty(variant_records) {
        Ok(json) => json,
        Err(_) => {
            error!("Failed to write variant records as JSON");
            std::process::exit(exitcode::IOERR);
        }
    }
}

/// Write the json file output
fn write_json(json_string: String, json_name: String) -> std::io::Result<()> {
    let json_outfile = PathBuf::from(json_name);
    let file_handle = File::create(&json_outfile)?;

    if json_outfile.extension().and_then(|ext| ext.to_str()) == Some("gz") {
        let mut gzip_filehandle = GzEncoder::new(file_handle, flate2::Compression::default());
        gzip_filehandle.write_all(json_string.as_bytes())?;
    } else {
        let mut writer = io::BufWriter::new(file_handle);
        writer.write_all(json_string.as_bytes())?;
        writer.flush()?
    }

    Ok(())
}

/// Given an already-validated directory path with a filename prefix,
/// generate the table and json filenames for output.
fn generate_output_paths(outdir: String, prefix: String, write_unzipped: bool) -> (String, String) {
    if write_unzipped {
        let table_filepath = format!("{}/{}.svs.tsv", outdir.clone(), prefix.clone());
        let json_filepath = format!("{}/{}.svs.json", outdir.clone(), prefix.clone());
        (table_filepath, json_filepath)
    } else {
        let table_filepath = format!("{}/{}.svs.tsv.gz", outdir.clone(), prefix.clone());
        let json_filepath = format!("{}/{}.svs.json.gz", outdir.clone(), prefix.clone());
        (table_filepath, json_filepath)
    }
}

fn table_header() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        "#svconsensus v{}\n#chrom\tpos\tend\tid\tref\talt\tsvtype\tsvlen\tattributes",
        version
    )
}

fn write_unzipped_table(
    variant_records: &[VariantRecord],
    table_name: String,
) -> std::io::Result<()> {
    let table_path = PathBuf::from(table_name);
    let mut table_file = File::create(table_path.clone())?;

    writeln!(table_file, "{}", table_header())?;
    for record in variant_records.iter() {
        writeln!(table_file, "{}", record)?;
    }

    Ok(())
}

fn write_gzipped_table(
    variant_records: &[VariantRecord],
    table_name: String,
) -> std::io::Result<()> {
    let table_path = PathBuf::from(table_name);
    let table_file = File::create(table_path.clone())?;

    // Wrap the file in a buffered writer
    let mut buf_writer = BufWriter::new(table_file);
    let mut writer = BGZFWriter::new(&mut buf_writer, Compression::default());

    writer.write_all(table_header().as_bytes())?;
    writer.write_all(b"\n")?;
    for record in variant_records.iter() {
        writer.write_all(record.to_string().as_bytes())?;
        writer.write_all(b"\n")?;
    }

    Ok(())
}
