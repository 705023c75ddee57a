use std::path::PathBuf;

use clap::{CommandFactory, Parser as ClapParser, error::ErrorKind};
use colored::Colorize;

use minic::frontend::{SourceFile, SourceFileOrigin};

#[derive(Debug, ClapParser)]
#[command(version, about, long_about = None)]
pub struct Args {
    source_files: Vec<PathBuf>,
}

fn main() {
    let args = Args::parse();

    if args.source_files.is_empty() {
        Args::command()
            .error(ErrorKind::MissingRequiredArgument, "Missing source files!")
            .exit();
    }

    for source_file in &args.source_files {
        if !source_file.exists() {
            Args::command()
                .error(
                    ErrorKind::InvalidValue,
                    format!("Source file '{}' does not exist!", source_file.display()),
                )
                .exit()
        }

        if !source_file.is_file() {
            Args::command()
                .error(
                    ErrorKind::InvalidValue,
                    format!("Input path '{}' is not a file!", source_file.display()),
                )
                .exit()
        }
    }

    /* Read in source files */

    let source_files = args
        .source_files
        .into_iter()
        .map(|path| {
            let contents = match std::fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(error) => Args::command()
                    .error(
                        ErrorKind::Io,
                        format!("Failed to read '{}': {error}", path.display()),
                    )
                    .exit(),
            };

            SourceFile {
                contents,
                origin: SourceFileOrigin::File(path),
            }
        })
        .collect::<Vec<_>>();

    for source_file in &source_files {
        let output = minic::compile(&source_file.contents);

        let sections = [
            ("Tokens", &output.reports.tokens),
            ("Symbol Table", &output.reports.symbols),
            ("Parse", &output.reports.parse),
            ("Semantic Analysis", &output.reports.semantic),
            ("Intermediate Representation", &output.reports.ir),
            ("Optimization", &output.reports.optimized),
        ];

        for (title, report) in sections {
            println!(
                "{}",
                format!("==== {title} ({}) ====", source_file.origin)
                    .cyan()
                    .bold()
            );
            println!("{report}");
            println!();
        }
    }
}
