//! geojson-svg CLI
//!
//! Usage:
//!   geojson-svg [OPTIONS] [FILE]
//!
//! Options:
//!   -o, --output <FILE>     Write the SVG here instead of stdout
//!   -s, --styles <FILE>     Style table (TOML format)
//!   -f, --fonts <FILE>      Font metric table (TOML or JSON)
//!   -t, --type <PROPERTY>   Feature property selecting styles, text boxes and symbols
//!   -e, --extent <BBOX>     Fixed viewBox as min_x,min_y,max_x,max_y
//!   -p, --padding <N>       Padding around the computed viewBox
//!   --pretty                One definition/element per line
//!   --standalone            Prepend an XML declaration
//!   -h, --help              Print help
//!
//! Log output goes to stderr and is controlled by `RUST_LOG`.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use geojson_svg::{ConfigError, FontTable, GeoJson, Renderer, StyleTable, SvgConfig};

#[derive(Parser)]
#[command(name = "geojson-svg")]
#[command(about = "Render GeoJSON features as SVG")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Output file (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Style table file (TOML format)
    #[arg(short, long)]
    styles: Option<PathBuf>,

    /// Font metric table file (TOML or JSON format)
    #[arg(short, long)]
    fonts: Option<PathBuf>,

    /// Feature property holding the feature type
    #[arg(short = 't', long = "type")]
    type_property: Option<String>,

    /// Fixed viewBox extent: min_x,min_y,max_x,max_y
    #[arg(short, long, value_parser = parse_extent, allow_hyphen_values = true)]
    extent: Option<[f64; 4]>,

    /// Padding around the computed viewBox
    #[arg(short, long, default_value_t = 0.0)]
    padding: f64,

    /// Put every definition and element on its own line
    #[arg(long)]
    pretty: bool,

    /// Prepend an XML declaration
    #[arg(long)]
    standalone: bool,
}

fn parse_extent(value: &str) -> Result<[f64; 4], String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in extent: {}", e))?;
    parts
        .try_into()
        .map_err(|parts: Vec<f64>| format!("extent needs 4 numbers, found {}", parts.len()))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // If no input file and stdin is a terminal (interactive), there is nothing to read
    if cli.input.is_none() && io::stdin().is_terminal() {
        eprintln!("Reading GeoJSON from stdin; pass a FILE or pipe input. See --help.");
    }

    let renderer = match build_renderer(&cli) {
        Ok(renderer) => renderer,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Read input
    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let input: GeoJson = match source.parse() {
        Ok(input) => input,
        Err(e) => {
            eprint!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    };

    let svg = renderer.render(input);
    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, svg) {
                eprintln!("Error writing file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
            debug!(path = %path.display(), "wrote svg");
        }
        None => println!("{}", svg),
    }
}

fn build_renderer(cli: &Cli) -> Result<Renderer, ConfigError> {
    let mut renderer = Renderer::new().with_svg_config(
        SvgConfig::new()
            .with_viewbox_padding(cli.padding)
            .with_pretty_print(cli.pretty)
            .with_standalone(cli.standalone),
    );

    if let Some(path) = &cli.styles {
        debug!(path = %path.display(), "loading style table");
        renderer = renderer.with_styles(StyleTable::from_file(path)?);
    }
    if let Some(path) = &cli.fonts {
        debug!(path = %path.display(), "loading font table");
        renderer = renderer.with_fonts(FontTable::from_file(path)?);
    }
    if let Some(property) = &cli.type_property {
        renderer = renderer.with_type(property.as_str());
    }
    if let Some(extent) = cli.extent {
        renderer = renderer.with_extent(extent)?;
    }

    Ok(renderer)
}
