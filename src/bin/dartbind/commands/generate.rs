//! `dartbind generate` command

use std::io::Write;

use anyhow::Result;

use super::resolve_config;
use crate::cli::GenerateArgs;
use dartbind::ops::format::{DartFormat, Passthrough, SourceFormatter};
use dartbind::ops::generate::{generate, GenerateOptions};

pub fn execute(args: GenerateArgs) -> Result<()> {
    let mut config = resolve_config(&args.source)?;

    if args.output.is_some() {
        config.generate.output = args.output;
    }
    if args.class_name.is_some() {
        config.generate.class_name = args.class_name;
    }
    if args.config_field.is_some() {
        config.generate.config_field = args.config_field;
    }
    if args.bootstrap.is_some() {
        config.generate.bootstrap = args.bootstrap;
    }
    if args.no_format {
        config.format.enabled = Some(false);
    }
    if args.formatter.is_some() {
        config.format.command = args.formatter;
    }

    let formatter: Box<dyn SourceFormatter> = if config.format_enabled() {
        Box::new(DartFormat::new(config.formatter()))
    } else {
        Box::new(Passthrough)
    };

    let opts = GenerateOptions::from_config(&config);
    let dart = generate(&opts, formatter.as_ref())?;

    if opts.output.is_none() {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(dart.as_bytes())?;
        stdout.flush()?;
    }

    Ok(())
}
