// ============================================================================
// Lomo CLI — argument parsing and the single top-level error dispatch
// ============================================================================
//
// Usage examples:
//   lomo photo.jpg                                  (interactive window)
//   lomo photo.jpg --color 6 --vignette 40          (start from other params)
//   lomo photo.jpg --headless -o out.jpg -q 90      (render once, save, exit)
//
// Every failure funnels through `report`, which logs it, prints it and turns
// it into a non-zero exit code.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;

use crate::config::{
    COLOR_SLIDER_MAX, DEFAULT_COLOR_SLIDER, DEFAULT_OUTPUT, DEFAULT_QUALITY, DEFAULT_VIGNETTE,
    LomoConfig, VIGNETTE_SLIDER_MAX,
};
use crate::controller::{Outcome, ParameterController};
use crate::error::{LomoError, Result};
use crate::io::load_image;
use crate::{logger, viewer};

/// Lomography filter: tone curve + vignette with live sliders.
///
/// Press `s` in the window to save the result and quit, `q` to quit.
#[derive(Parser, Debug)]
#[command(name = "lomo", version)]
pub struct CliArgs {
    /// Image to filter (any format the `image` crate can decode).
    pub image: PathBuf,

    /// Where the save key writes the result. `.jpg` uses --quality.
    #[arg(short, long, default_value = DEFAULT_OUTPUT, value_name = "FILE")]
    pub output: PathBuf,

    /// JPEG quality (1–100).
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_QUALITY,
        value_name = "1-100",
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub quality: u8,

    /// Initial color slider position; the curve steepness is this / 100.
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_COLOR_SLIDER,
        value_name = "0-20",
        value_parser = clap::value_parser!(i32).range(0..=COLOR_SLIDER_MAX as i64)
    )]
    pub color: i32,

    /// Initial vignette radius in percent.
    #[arg(
        long,
        default_value_t = DEFAULT_VIGNETTE,
        value_name = "0-100",
        value_parser = clap::value_parser!(i32).range(0..=VIGNETTE_SLIDER_MAX as i64)
    )]
    pub vignette: i32,

    /// Render once with the initial parameters, save, and exit without a window.
    #[arg(long)]
    pub headless: bool,

    /// Log debug detail (every parameter change) to the session log.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse `argv`, run the session and map the result to an exit code.
pub fn run_from<I, T>(argv: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match CliArgs::try_parse_from(argv) {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => return report(&LomoError::Argument(e.render().to_string())),
    };

    logger::init(args.verbose);
    log::info!("input {}", args.image.display());

    match run(&args) {
        Ok(Outcome::Saved(path)) => {
            println!("Result saved as {}", path.display());
            ExitCode::SUCCESS
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

/// Load the image and run either the interactive window or a single
/// headless render.
pub fn run(args: &CliArgs) -> Result<Outcome> {
    let config = LomoConfig::from(args);
    let source = load_image(&args.image)?;
    let controller = ParameterController::new(source, &config);

    if config.headless {
        controller.save()?;
        return Ok(Outcome::Saved(controller.output_path().to_path_buf()));
    }
    viewer::run(controller)
}

fn report(e: &LomoError) -> ExitCode {
    match e {
        // clap already renders usage and an "error:" prefix
        LomoError::Argument(msg) => eprint!("{}", msg),
        _ => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
        }
    }
    ExitCode::FAILURE
}
