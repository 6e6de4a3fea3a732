use anyhow::{Context, Result, bail, format_err};
use biffchart::{
    ChartNode, ChartSettings, ChartTree, ChildLayout, NodeId, RecordIter, format_hexdump,
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use dialoguer::Confirm;
use indoc::indoc;
use log::{Level, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::exit;

/// Exit code when `--check-round-trip` finds a difference.
const ROUND_TRIP_MISMATCH: i32 = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum OutputFormat {
    Tree,
    Json,
    Records,
    Ooxml,
}

struct ChartDump {
    input: PathBuf,
    settings: ChartSettings,
    output_format: OutputFormat,
    output: Box<dyn Write>,
    check_round_trip: bool,
    hexdump: bool,
    verbosity_level: Option<Level>,
}

impl ChartDump {
    fn from_cli_matches(matches: &ArgMatches) -> Result<Self> {
        let input = PathBuf::from(
            matches
                .get_one::<String>("INPUT")
                .ok_or_else(|| format_err!("missing INPUT"))?,
        );

        let output_format = match matches.get_one::<String>("output-format").map(String::as_str) {
            Some("json") => OutputFormat::Json,
            Some("records") => OutputFormat::Records,
            Some("ooxml") => OutputFormat::Ooxml,
            _ => OutputFormat::Tree,
        };

        let verbosity_level = match matches.get_count("verbose") {
            0 => None,
            1 => Some(Level::Info),
            2 => Some(Level::Debug),
            3 => Some(Level::Trace),
            _ => {
                eprintln!("using more than -vvv does not affect verbosity level");
                Some(Level::Trace)
            }
        };

        let mut settings = ChartSettings::new();
        if let Some(depth) = matches.get_one::<usize>("max-depth") {
            settings = settings.max_depth(*depth);
        }

        let output: Box<dyn Write> = match matches.get_one::<String>("output-target") {
            Some(path) => Box::new(
                Self::create_output_file(path, !matches.get_flag("no-confirm-overwrite"))
                    .with_context(|| format!("An error occurred while creating output file at `{path}`"))?,
            ),
            None => Box::new(io::stdout()),
        };

        Ok(ChartDump {
            input,
            settings,
            output_format,
            output,
            check_round_trip: matches.get_flag("check-round-trip"),
            hexdump: matches.get_flag("hexdump"),
            verbosity_level,
        })
    }

    /// Main entry point for `ChartDump`
    fn run(&mut self) -> Result<()> {
        self.try_to_initialize_logging();

        let data = fs::read(&self.input)
            .with_context(|| format!("Failed to open file {}", self.input.display()))?;
        info!("read {} bytes from {}", data.len(), self.input.display());

        if self.output_format == OutputFormat::Records {
            self.dump_records(&data)?;
        }

        let tree = ChartTree::from_bytes(&data, self.settings.clone())
            .with_context(|| format!("Failed to assemble chart records of {}", self.input.display()))?;

        match self.output_format {
            OutputFormat::Tree => {
                for root in tree.roots() {
                    self.dump_tree(&tree, *root, 0)?;
                }
            }
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&tree.to_json()?)?;
                writeln!(self.output, "{json}")?;
            }
            OutputFormat::Ooxml => {
                writeln!(self.output, "{}", biffchart::ooxml::write_plot_area(&tree)?)?;
            }
            OutputFormat::Records => {}
        }
        self.output.flush()?;

        if self.check_round_trip {
            let encoded = tree.to_bytes().context("Failed to re-encode the chart tree")?;
            if encoded != data {
                let at = encoded
                    .iter()
                    .zip(&data)
                    .position(|(a, b)| a != b)
                    .unwrap_or(encoded.len().min(data.len()));
                eprintln!(
                    "round trip mismatch at byte {} ({} bytes in, {} bytes out)",
                    at,
                    data.len(),
                    encoded.len()
                );
                exit(ROUND_TRIP_MISMATCH);
            }
            eprintln!("round trip OK ({} bytes)", data.len());
        }
        Ok(())
    }

    fn dump_records(&mut self, data: &[u8]) -> Result<()> {
        for record in RecordIter::new(data) {
            let record = record?;
            let name = biffchart::registry::lookup(record.opcode).map_or("Unknown", |d| d.name);
            writeln!(
                self.output,
                "{:08x} 0x{:04X} {:<20} {:>5}",
                record.offset,
                record.opcode,
                name,
                record.payload.len()
            )?;
            if self.hexdump && !record.payload.is_empty() {
                let offset = usize::try_from(record.payload_offset())?;
                writeln!(self.output, "{}", format_hexdump(record.payload, offset))?;
            }
        }
        Ok(())
    }

    fn dump_tree(&mut self, tree: &ChartTree, id: NodeId, depth: usize) -> Result<()> {
        let node: &ChartNode = tree.node(id)?;
        let fields = serde_json::to_value(&node.record)?;
        let fields = fields.get("fields").map(|f| f.to_string()).unwrap_or_default();
        let marker = match node.layout {
            ChildLayout::Bare => " [bare]",
            _ => "",
        };
        writeln!(
            self.output,
            "{:indent$}{} (0x{:04X}){} {}",
            "",
            node.record.name(),
            node.record.opcode(),
            marker,
            fields,
            indent = depth * 2
        )?;
        if !node.trailing.is_empty() {
            writeln!(
                self.output,
                "{:indent$}  + {} trailing bytes",
                "",
                node.trailing.len(),
                indent = depth * 2
            )?;
        }
        for child in tree.children(id) {
            self.dump_tree(tree, child, depth + 1)?;
        }
        Ok(())
    }

    /// If `prompt` is passed, will display a confirmation prompt before overwriting files.
    fn create_output_file(path: impl AsRef<Path>, prompt: bool) -> Result<File> {
        let p = path.as_ref();

        if p.is_dir() {
            bail!(
                "There is a directory at {}, refusing to overwrite",
                p.display()
            );
        }

        if p.exists() {
            if prompt {
                match Confirm::new()
                    .with_prompt(format!(
                        "Are you sure you want to override output file at {}",
                        p.display()
                    ))
                    .default(false)
                    .interact()
                {
                    Ok(true) => Ok(File::create(p)?),
                    Ok(false) => bail!("Cancelled"),
                    Err(e) => bail!(
                        "Failed to write confirmation prompt to term caused by\n{}",
                        e
                    ),
                }
            } else {
                Ok(File::create(p)?)
            }
        } else {
            // Ok to assume p is not an existing directory
            match p.parent() {
                Some(parent) => {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        fs::create_dir_all(parent)?;
                    }
                    Ok(File::create(p)?)
                }
                None => bail!("Output file cannot be root."),
            }
        }
    }

    fn try_to_initialize_logging(&self) {
        if let Some(level) = self.verbosity_level {
            if let Err(e) = TermLogger::init(
                level.to_level_filter(),
                Config::default(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            ) {
                eprintln!("Failed to initialize logging: {:?}", e);
            }
        }
    }
}

fn command() -> Command {
    Command::new("chart_dump")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Utility to inspect BIFF8 chart record streams")
        .arg(
            Arg::new("INPUT")
                .required(true)
                .help("A file holding a raw chart sub-stream (records from the chart BOF to EOF)."),
        )
        .arg(
            Arg::new("output-format")
                .short('o')
                .long("format")
                .value_parser(["tree", "json", "records", "ooxml"])
                .default_value("tree")
                .help("Sets the output format")
                .long_help(indoc!(r#"
                    Sets the output format:
                        "tree"    - an indented outline of the assembled records and their fields.
                        "json"    - the assembled tree as JSON.
                        "records" - the flat list of records as they appear in the stream.
                        "ooxml"   - DrawingML fragments for the chart groups and axes.
                "#)),
        )
        .arg(
            Arg::new("output-target")
                .long("output")
                .short('f')
                .action(ArgAction::Set)
                .help(indoc!("Writes output to the file specified instead of stdout, errors will still be printed to stderr.
                       Will ask for confirmation before overwriting files, to allow overwriting, pass `--no-confirm-overwrite`
                       Will create parent directories if needed.")),
        )
        .arg(
            Arg::new("no-confirm-overwrite")
                .long("no-confirm-overwrite")
                .action(ArgAction::SetTrue)
                .help("When set, will not ask for confirmation before overwriting files, useful for automation"),
        )
        .arg(
            Arg::new("check-round-trip")
                .long("check-round-trip")
                .action(ArgAction::SetTrue)
                .help("Re-encodes the assembled tree and exits with status 2 if the bytes differ from the input."),
        )
        .arg(
            Arg::new("hexdump")
                .long("hexdump")
                .action(ArgAction::SetTrue)
                .help("With `-o records`, prints a hexdump of every payload."),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .value_parser(clap::value_parser!(usize))
                .help("Maximum BEGIN/END nesting accepted before the input is rejected as corrupt."),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help(indoc!("Sets debug prints level for the application:
                    -v   - info
                    -vv  - debug
                    -vvv - trace
                    NOTE: trace output is only available in debug builds, as it is extremely verbose.")),
        )
}

fn main() -> Result<()> {
    let matches = command().get_matches();
    let mut app = ChartDump::from_cli_matches(&matches)?;
    app.run()
}
