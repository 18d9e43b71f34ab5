use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use glyph_atlas::config::resolve_positionals;
use glyph_atlas::{AtlasBuilder, AtlasConfig, AtlasError, AtlasOutput, Font, TtfOutlines, metrics, writer};

/// Pack printable ASCII (32..=126) of a font into a 512×512 grayscale atlas.
#[derive(Parser, Debug)]
#[command(
    name = "glyph-atlas",
    after_help = "Metrics (JSON) are printed to stdout."
)]
struct Cli {
    /// Path to a TrueType/OpenType font
    #[arg(value_name = "FONT")]
    font: Option<PathBuf>,

    /// Font size in pixels (default: 32.0), then the output image filename
    /// (default: atlas.png)
    #[arg(value_name = "SIZE|OUTPUT", trailing_var_arg = true, allow_hyphen_values = true)]
    rest: Vec<String>,
}

fn run(cli: Cli) -> Result<(), AtlasError> {
    let font_path = cli
        .font
        .ok_or_else(|| AtlasError::Usage("missing font path".to_string()))?;
    let (pixel_size, output) = resolve_positionals(&cli.rest);
    let config = AtlasConfig::default().with_pixel_size(pixel_size);

    // The font bytes are released as soon as every glyph is rasterized.
    let AtlasOutput { atlas, glyphs, pixel_size } = {
        let font = Font::open(&font_path)?;
        let outlines = TtfOutlines::new(&font)?;
        AtlasBuilder::new(config).build(&outlines)?
    };

    writer::write(&atlas, &output)?;

    let json = metrics::export(&glyphs, &output.to_string_lossy(), atlas.width(), atlas.height(), pixel_size);
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(json.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| AtlasError::encode("<stdout>", e))
}

/// `-h`/`--help` wins wherever it appears, even after positionals that
/// otherwise swallow leading-hyphen values.
fn wants_help<S: AsRef<std::ffi::OsStr>>(args: &[S]) -> bool {
    args.iter().skip(1).any(|a| matches!(a.as_ref().to_str(), Some("-h" | "--help")))
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));

    let args: Vec<_> = std::env::args_os().collect();
    if wants_help(&args) {
        print!("{}", Cli::command().render_help());
        return ExitCode::SUCCESS;
    }

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ AtlasError::Usage(_)) => {
            eprintln!("error: {e}\n\n{}", Cli::command().render_help());
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
