extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate regex;
extern crate term_grid;

pub mod assembler;

use clap::{Arg, ArgMatches, App};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use std::convert::TryFrom;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn main() {
    let args = process_arguments();
    initialize_logging(args.occurrences_of("verbose"));

    debug!("Arguments:\n\tVerbosity: {}\n\tCapacity: {}\n\tOutfile: {}\n\tInfile: {}",
        match args.occurrences_of("verbose") {
            0 => log::LevelFilter::Error.to_string(),
            1 => log::LevelFilter::Warn.to_string(),
            2 => log::LevelFilter::Info.to_string(),
            3 | _ => log::LevelFilter::Debug.to_string(),
        },
        args.value_of("capacity").unwrap_or("default"),
        args.value_of("output").unwrap_or("None"),
        args.value_of("INPUT").unwrap()
    );

    let capacity = match args.value_of("capacity") {
        None => assembler::DEFAULT_CAPACITY,
        Some(s) => match s.parse::<usize>() {
            Ok(words) => words,
            Err(err) => {
                error!("fatal: invalid memory capacity `{}`: {}", s, err);
                std::process::exit(1);
            },
        },
    };

    let ifile = args.value_of("INPUT").unwrap();
    // Read the specified input file.
    let ipath = Path::new(ifile);

    let source = match std::fs::read_to_string(&ipath) {
        Err(err) => {
            error!("fatal: unable to read input file `{}`: {}", ipath.display(), err);
            std::process::exit(1);
        },
        Ok(source) => source,
    };

    let result = assembler::assemble_with_capacity(&source, capacity);

    if args.is_present("print-debug") {
        let mut grid = Grid::new(GridOptions {
            filling:     Filling::Spaces(1),
            direction:   Direction::LeftToRight,
        });

        for ins in result.instructions.iter() {
            let words: Vec<String> = result.words(ins).iter()
                .map(|w| format!("{:03}", w))
                .collect();
            grid.add(Cell::from(format!("{:03}:", ins.offset)));
            grid.add(Cell::from(format!("{}", ins)));
            grid.add(Cell::from("=>".to_string()));
            grid.add(Cell::from(words.join(" ")));
        }

        println!("{}", grid.fit_into_columns(4));
    }

    if let Some(err) = result.error {
        error!("fatal: assembly of `{}` failed: {}", ipath.display(), err);
        std::process::exit(1);
    }

    let bytes = match serialize(&result.code[..result.len()]) {
        Ok(bytes) => bytes,
        Err((address, word)) => {
            error!("fatal: word {} at address {} does not fit in 16 bits", word, address);
            std::process::exit(1);
        },
    };

    let opath = if let Some(filename) = args.value_of("output") {
        Path::new(filename)
    } else {
        match ipath.file_stem() {
            Some(stem) => Path::new(stem),
            None => {
                error!("fatal: cannot derive an output name from `{}`, use -o", ipath.display());
                std::process::exit(1);
            },
        }
    };

    let mut ofile = match File::create(&opath) {
        Err(err) => {
            error!("fatal: unable to open output file `{}`: {}", opath.display(), err);
            std::process::exit(1);
        },
        Ok(file) => file,
    };

    if let Err(err) = ofile.write_all(&bytes) {
        error!("fatal: unable to write to output file `{}`: {}", opath.display(), err);
        std::process::exit(1);
    }
    info!("Wrote {} word(s) to `{}`.", result.len(), opath.display());
}

/// Encodes each word as a big-endian 16-bit signed integer.
/// Fails with the address and value of the first word that does not fit.
fn serialize(code: &[i32]) -> Result<Vec<u8>, (usize, i32)> {
    let mut bytes = Vec::with_capacity(code.len() * 2);
    for (address, word) in code.iter().enumerate() {
        match i16::try_from(*word) {
            Ok(w) => bytes.extend_from_slice(&w.to_be_bytes()),
            Err(_) => return Err((address, *word)),
        }
    }
    Ok(bytes)
}

fn process_arguments() -> ArgMatches<'static> {
    App::new(option_env!("CARGO_PKG_NAME").unwrap())
        .version(option_env!("CARGO_PKG_VERSION").unwrap())
        .author(option_env!("CARGO_PKG_AUTHORS").unwrap())
        .about(option_env!("CARGO_PKG_DESCRIPTION").unwrap())
        .arg(Arg::with_name("INPUT")
            .help("Sets the LMSM source file to assemble")
            .required(true)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("output")
            .short("o")
            .takes_value(true)
            .value_name("FILE")
            .help("Sets the output file (defaults to the input file name without its extension)"))
        .arg(Arg::with_name("capacity")
            .short("c")
            .long("capacity")
            .takes_value(true)
            .value_name("WORDS")
            .help("Sets the number of words of machine memory (default 200)"))
        .arg(Arg::with_name("print-debug")
            .short("d")
            .alias("show")
            .alias("s")
            .takes_value(false)
            .help("Prints each instruction alongside its machine words to STDOUT"))
        .get_matches()
}

fn initialize_logging(verbosity: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(match verbosity {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 | _ => log::LevelFilter::Debug,
        })
        .chain(std::io::stdout())
        .apply().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize() {
        assert_eq!(serialize(&[]), Ok(vec![]));
        assert_eq!(serialize(&[901, -999, 0]), Ok(vec![0x03, 0x85, 0xFC, 0x19, 0x00, 0x00]));
    }

    #[test]
    fn test_serialize_too_wide() {
        let far_branch = 600 + i32::from(i16::MAX);
        assert_eq!(serialize(&[901, far_branch, 902]), Err((1, far_branch)));
        assert_eq!(serialize(&[i32::from(i16::MIN) - 1]), Err((0, -32769)));
    }
}
