//! browscap stats command

use browscap::{
    CatalogIndex, RawCatalog,
    catalog::DEFAULT_VERSION_SECTION,
    error::{BoxError, ErrorContext as _},
};
use clap::Args;
use std::{
    io::{self, Write},
    path::PathBuf,
};

#[derive(Debug, Args)]
/// print statistics of a browscap catalog
pub struct CliCommandStats {
    #[arg(long, short = 'i')]
    /// path to the browscap.ini catalog
    ini: PathBuf,
}

/// run the browscap stats command
pub fn run(cfg: CliCommandStats) -> Result<(), BoxError> {
    let catalog = browscap::ini::load_path(&cfg.ini)?;
    let index = CatalogIndex::build(&catalog)?;

    let mut out = io::stdout().lock();
    write_stats(&mut out, &catalog, &index).context("write catalog stats")?;
    Ok(())
}

fn write_stats(out: &mut impl Write, catalog: &RawCatalog, index: &CatalogIndex) -> io::Result<()> {
    let version = catalog
        .get(DEFAULT_VERSION_SECTION)
        .and_then(|entry| entry.attribute("Version"))
        .unwrap_or("unknown");

    writeln!(out, "version: {version}")?;
    writeln!(out, "entries: {}", catalog.len())?;
    writeln!(out, "leaf entries: {}", index.len())?;
    out.flush()
}
