use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use log::info;
use rand::{thread_rng, Rng};

use tx_generator::error::GenError;
use tx_generator::registry::{IdRegistry, DEFAULT_MAX_RETRIES};
use tx_generator::synthesizer::Synthesizer;
use tx_generator::writer::{HeaderStyle, RecordWriter};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Number of transaction records to generate
    #[clap(short, long, default_value_t = 5_000_000)]
    pub(crate) count: usize,
    /// The output file, replaced if it already exists
    #[clap(short, long, default_value = "myfile.csv")]
    pub(crate) output: PathBuf,
    /// Write the padded `tx ` and ` amount` header names and CRLF line endings
    /// of the historical fixtures
    #[clap(long)]
    pub(crate) legacy_header: bool,
    /// Id collisions to retry before giving up
    #[clap(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub(crate) max_retries: u32,
    /// Write records while they are generated instead of buffering the whole run
    #[clap(long)]
    pub(crate) stream: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let style = if cli.legacy_header {
        HeaderStyle::Legacy
    } else {
        HeaderStyle::Normalized
    };
    let registry = IdRegistry::with_max_retries(cli.max_retries);
    let mut synthesizer = Synthesizer::with_registry(thread_rng(), registry);

    info!(
        "Generating {} records into {}",
        cli.count,
        cli.output.display()
    );
    let start = Instant::now();
    let written = if cli.stream {
        generate_streaming(&mut synthesizer, cli.count, &cli.output, style)?
    } else {
        generate_buffered(&mut synthesizer, cli.count, &cli.output, style)?
    };

    let stats = synthesizer.stats();
    info!(
        "Wrote {} records ({} new ids, {} reused)",
        written, stats.minted, stats.reused
    );
    info!("Total took: {:.2?}", start.elapsed());

    Ok(())
}

fn generate_buffered<R: Rng>(
    synthesizer: &mut Synthesizer<R>,
    count: usize,
    output: &Path,
    style: HeaderStyle,
) -> Result<u64, GenError> {
    let mut writer = RecordWriter::create(output, style)?;

    let start = Instant::now();
    let records = synthesizer.generate(count)?;
    info!("Generating took: {:.2?}", start.elapsed());

    let start_writing = Instant::now();
    for record in &records {
        writer.write(record)?;
    }
    let written = writer.finish()?;
    info!("Writing took: {:.2?}", start_writing.elapsed());
    Ok(written)
}

fn generate_streaming<R: Rng>(
    synthesizer: &mut Synthesizer<R>,
    count: usize,
    output: &Path,
    style: HeaderStyle,
) -> Result<u64, GenError> {
    let mut writer = RecordWriter::create(output, style)?;
    for record in synthesizer.records(count) {
        writer.write(&record?)?;
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;

    use super::*;

    #[test]
    fn test_buffered_run_opens_output_before_generating() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing").join("fixture.csv");
        // this rng would exhaust the registry on the second record
        let mut synthesizer =
            Synthesizer::with_registry(StepRng::new(0, 0), IdRegistry::with_max_retries(0));

        let res = generate_buffered(&mut synthesizer, 10, &output, HeaderStyle::Normalized);
        assert!(matches!(res, Err(GenError::CsvError(_))));
        assert_eq!(synthesizer.stats().total(), 0);
    }

    #[test]
    fn test_buffered_run_writes_every_record() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("fixture.csv");
        let mut synthesizer = Synthesizer::new(thread_rng());

        let written =
            generate_buffered(&mut synthesizer, 250, &output, HeaderStyle::Legacy).unwrap();
        assert_eq!(written, 250);
        let data = std::fs::read_to_string(&output).unwrap();
        assert_eq!(data.lines().count(), 251);
    }
}
