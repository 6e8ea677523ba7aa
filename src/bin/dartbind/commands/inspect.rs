//! `dartbind inspect` command

use anyhow::Result;

use super::resolve_config;
use crate::cli::InspectArgs;
use dartbind::ops::generate::GenerateOptions;
use dartbind::ops::inspect::{format_reports, inspect};

pub fn execute(args: InspectArgs) -> Result<()> {
    let config = resolve_config(&args.source)?;
    let opts = GenerateOptions::from_config(&config);

    let reports = inspect(&opts)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print!("{}", format_reports(&reports));
    }

    Ok(())
}
