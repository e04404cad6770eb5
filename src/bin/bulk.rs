use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use oca_scoring::{read_bulk, Error, NormTables};

/// Score recorded questionnaire runs from a CSV file.
///
/// Each row: label, age, gender, then one y/m/n answer per question in
/// master order.
#[derive(Parser)]
struct Args {
    /// CSV file of recorded sessions.
    path: PathBuf,
    /// Norm table CSV (gender,age_group,scale,raw,percentile). Uses the
    /// built-in reference tables when omitted.
    #[arg(long)]
    norms: Option<PathBuf>,
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Args::parse();

    let norms = match &args.norms {
        Some(path) => NormTables::from_csv_reader(BufReader::new(File::open(path)?))?,
        None => NormTables::reference(),
    };

    let reader = BufReader::new(File::open(&args.path)?);
    for row in read_bulk(reader) {
        match row {
            Ok((label, session)) => match session.result(&norms) {
                Some(result) => println!(
                    "id = {label}, raw = [{}], percentiles = [{}], maybe = {}",
                    result.raw_scores.summary_line(),
                    result.percentiles.summary_line(),
                    result.maybe_count,
                ),
                None => eprintln!(
                    "id = {label}: incomplete ({}/{} answers), skipped",
                    session.answered_count(),
                    oca_scoring::TOTAL_QUESTIONS,
                ),
            },
            Err(e) => eprintln!("skipping row: {e}"),
        }
    }
    Ok(())
}
