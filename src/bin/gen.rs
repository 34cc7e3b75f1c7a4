//! sats2range-gen: CLI tool for building and inspecting S2 range files.

use clap::{ArgAction, Parser, Subcommand};
use sats2range::range::{merge_cells, FileFormat, SatS2RangeFileReader, SatS2RangeFileWriter};
use sats2range::{cell_id, CellIdFormat, CellListParser};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sats2range-gen")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Build and inspect S2 cell range files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a range file from a list of S2 cells
    Create {
        /// Input cell list (plain text or gzip)
        #[arg(long)]
        input_file: PathBuf,

        /// S2 level of the cells in the file
        #[arg(long)]
        s2_level: u8,

        /// Whether membership in a range means "allowed"
        #[arg(long, action = ArgAction::Set, default_value_t = true)]
        is_allowed_list: bool,

        /// Bytes per entry value (0 disables values)
        #[arg(long, default_value_t = 0)]
        entry_value_byte_size: u8,

        /// Version number stored in the file header
        #[arg(long, default_value_t = 0)]
        version_number: u32,

        /// JSON file format, overriding the preset for the level
        #[arg(long)]
        format_file: Option<PathBuf>,

        /// How cell IDs are written in the input
        #[arg(long, default_value = "decimal")]
        cell_format: CellIdFormat,

        /// Output range file
        #[arg(long)]
        output_file: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Look up the range containing a cell
    Lookup {
        /// Range file
        #[arg(short, long)]
        file: PathBuf,

        /// Cell ID to look up
        cell: String,

        /// How the cell ID is written
        #[arg(long, default_value = "decimal")]
        cell_format: CellIdFormat,
    },

    /// Print the file format as JSON
    Info {
        /// Range file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Print every range in the file
    Dump {
        /// Range file
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Create {
            input_file,
            s2_level,
            is_allowed_list,
            entry_value_byte_size,
            version_number,
            format_file,
            cell_format,
            output_file,
            verbose,
        } => load_format(
            format_file.as_deref(),
            s2_level,
            is_allowed_list,
            entry_value_byte_size,
            version_number,
        )
        .and_then(|format| create_file(&input_file, format, cell_format, &output_file, verbose)),
        Commands::Lookup {
            file,
            cell,
            cell_format,
        } => lookup(&file, &cell, cell_format),
        Commands::Info { file } => info(&file),
        Commands::Dump { file } => dump(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_format(
    format_file: Option<&Path>,
    s2_level: u8,
    is_allowed_list: bool,
    entry_value_byte_size: u8,
    version_number: u32,
) -> Result<FileFormat, Box<dyn std::error::Error>> {
    let Some(path) = format_file else {
        return Ok(FileFormat::for_level(
            s2_level,
            is_allowed_list,
            entry_value_byte_size,
            version_number,
        )?);
    };

    let format: FileFormat = serde_json::from_str(&fs::read_to_string(path)?)?;
    if format.s2_level() != s2_level {
        return Err(format!(
            "format file {:?} is for level {}, not {}",
            path,
            format.s2_level(),
            s2_level
        )
        .into());
    }
    Ok(format)
}

fn create_file(
    input: &Path,
    format: FileFormat,
    cell_format: CellIdFormat,
    output: &Path,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if verbose {
        println!("Reading input file: {:?}", input);
    }
    let cells = CellListParser::parse_file(input, cell_format)?;
    let cell_count = cells.len();
    let ranges = merge_cells(&format, cells)?;

    if verbose {
        println!("Parsed {} cells into {} ranges", cell_count, ranges.len());
        println!("Writing output file: {:?}", output);
    }

    let mut writer = SatS2RangeFileWriter::open(output, format)?;
    writer.create_sorted_suffix_blocks(ranges)?;
    writer.close()?;

    println!("Successfully created {:?} -> {:?}", input, output);
    Ok(())
}

fn lookup(file: &Path, cell: &str, cell_format: CellIdFormat) -> Result<(), Box<dyn std::error::Error>> {
    let reader = SatS2RangeFileReader::open(file)?;
    let id = cell_format.parse_cell_id(cell)?;

    match reader.find_entry_by_cell_id(id)? {
        Some(range) => println!("{} ({}): {}", cell, cell_id::describe(id), range),
        None => println!("{} ({}): not found", cell, cell_id::describe(id)),
    }
    reader.close();
    Ok(())
}

fn info(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let reader = SatS2RangeFileReader::open(file)?;
    let summary = serde_json::json!({
        "format": reader.file_format(),
        "suffix_tables": reader.suffix_table_count(),
        "max_range_length": reader.file_format().max_range_length(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    reader.close();
    Ok(())
}

fn dump(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let reader = SatS2RangeFileReader::open(file)?;
    let mut count = 0usize;
    for range in reader.iter_ranges() {
        println!("{}", range?);
        count += 1;
    }
    println!("{} ranges", count);
    reader.close();
    Ok(())
}
