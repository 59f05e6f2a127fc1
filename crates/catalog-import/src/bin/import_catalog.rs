use catalog_import::{
    import::import_catalog,
    records::{read_offerings_file, read_units_file},
};
use clap::Parser;
use std::{path::PathBuf, process::ExitCode};

#[derive(Debug, Parser)]
#[command(name = "import_catalog")]
#[command(about = "Load units and offerings into the database named by DATABASE_URL")]
struct Args {
    /// Units CSV: code, name, credit_points and optional requisite columns
    units: PathBuf,

    /// Offerings CSV: unit_code, year, semester and the enrollment window
    offerings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args.units, args.offerings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    units_path: PathBuf,
    offerings_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let units = read_units_file(&units_path)?;
    let offerings = match offerings_path {
        Some(path) => read_offerings_file(&path)?,
        None => Vec::new(),
    };

    let db = database::db::create_connection().await?;
    let report = import_catalog(&db, &units, &offerings).await?;

    for reason in &report.skipped {
        println!("skipped: {reason}");
    }
    println!(
        "{} units created, {} existing, {} prerequisites, {} anti-requisites, {} offerings",
        report.units_created,
        report.units_existing,
        report.prerequisites_linked,
        report.anti_requisites_linked,
        report.offerings_created
    );
    Ok(())
}
