use anyhow::{Context, Result, anyhow};
use cash_kiosk::engine::{Catalog, CommandRecord, OutcomeRecord, TransactionMachine};
use csv::Trim;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::{Path, PathBuf};
use std::{env, fs::File, io::Write};

fn main() -> Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Warn).env().init()?;

    log::debug!("Application started");

    let (commands_path, catalog_path) = get_args()?;
    log::debug!("Extracted filepaths from args: {commands_path:?} {catalog_path:?}");

    let catalog = match catalog_path {
        Some(path) => load_catalog(&path)?,
        None => Catalog::standard(),
    };
    log::debug!("Catalog loaded with {} items", catalog.len());

    let mut machine = TransactionMachine::new(catalog);

    log::debug!("Command processing: Starting");
    let file = File::open(&commands_path)
        .with_context(|| format!("cannot open command file {}", commands_path.display()))?;
    run_commands(&mut machine, file, std::io::stdout())?;
    log::debug!("Command processing: Done");

    log::debug!("Application finished");

    Ok(())
}

fn get_args() -> Result<(PathBuf, Option<PathBuf>)> {
    let mut args = env::args_os().skip(1);
    let commands = args
        .next()
        .ok_or_else(|| anyhow!("expected a command file argument, but got none"))?;
    let catalog = args.next().map(PathBuf::from);

    Ok((PathBuf::from(commands), catalog))
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    let file = File::open(path)
        .with_context(|| format!("cannot open catalog file {}", path.display()))?;
    Catalog::from_reader(file).with_context(|| format!("invalid catalog {}", path.display()))
}

fn run_commands<R: std::io::Read, W: Write>(
    machine: &mut TransactionMachine,
    input: R,
    output: W,
) -> Result<()> {
    let mut rdr = csv::ReaderBuilder::new().trim(Trim::All).from_reader(input);
    let mut wtr = csv::Writer::from_writer(output);

    let mut step = 0;
    for result in rdr.deserialize::<CommandRecord>() {
        log::debug!("Deserialising record into CommandRecord: {result:?}");
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Error deserializing record: {e}");
                continue;
            }
        };
        step += 1;

        let outcome = match record.to_operation() {
            Ok(op) => machine.apply(op),
            Err(rejection) => {
                log::warn!("Command {step} rejected before dispatch: {rejection}");
                rejection.into()
            }
        };

        let row = OutcomeRecord::new(
            step,
            record.command.as_str(),
            &outcome,
            machine.state(),
            machine.balance(),
        );
        log::debug!("Serialising outcome: {row:?}");
        wtr.serialize(row)?;
    }

    log::debug!("Outcome serialisation done -> Flushing");
    wtr.flush()?;

    Ok(())
}
