use anyhow::anyhow;
use clap::Parser;
use pv_sizer::core::irradiance::NIGERIA_STATES_GHI;
use pv_sizer::output::FileOutput;
use pv_sizer::errors::PvSizingError;
use pv_sizer::{run_project, ProjectFlags};
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser, Default, Debug)]
#[clap(author, version, about, long_about = None)]
struct PvSizerArgs {
    #[arg(required_unless_present = "list_locations")]
    input_file: Option<String>,
    #[clap(
        long,
        default_value_t = false,
        help = "Also output the monthly generation of the sized array"
    )]
    detailed_output: bool,
    #[clap(
        long,
        default_value_t = false,
        help = "Also output the whole design as JSON"
    )]
    summary_json: bool,
    #[clap(
        long,
        default_value_t = false,
        help = "Print the locations with known irradiance and exit"
    )]
    list_locations: bool,
    #[arg(long, short, default_value_t = false, help = "Log at debug level")]
    verbose: bool,
    #[clap(long, default_value_t = false, help = "Whether to log out spans")]
    log_spans: bool,
}

fn main() -> anyhow::Result<()> {
    let args = PvSizerArgs::parse();

    // set up basic tracing
    let tracing_subscriber = {
        let level = if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };
        let mut builder = tracing_subscriber::fmt::fmt().with_max_level(level);

        if args.log_spans {
            builder = builder.with_span_events(FmtSpan::CLOSE);
        }

        builder.finish()
    };
    tracing::subscriber::set_global_default(tracing_subscriber)
        .expect("setting tracing subscriber failed");

    if args.list_locations {
        for location in NIGERIA_STATES_GHI.locations() {
            println!("{location}");
        }
        return Ok(());
    }

    let input_file = args
        .input_file
        .as_deref()
        .ok_or_else(|| anyhow!("An input file is required"))?;
    let input_path = Path::new(input_file);
    let input_file_stem = input_path.with_extension("");
    let input_file_name = input_file_stem
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("Could not derive an output name from '{input_file}'"))?;

    let output_path = PathBuf::from(format!("{}__results", input_file_stem.display()));
    fs::create_dir_all(&output_path)?;
    let file_output = FileOutput::new(output_path.clone(), format!("{input_file_name}__{{}}.{{}}"));

    let design = match run_project(
        BufReader::new(File::open(input_path)?),
        &file_output,
        &(&args).into(),
    ) {
        Ok(design) => design,
        Err(PvSizingError::IncompleteDesign { design, source }) => {
            warn!(
                "Only partial results for {} written to {}",
                design.location,
                output_path.display()
            );
            return Err(source.into());
        }
        Err(error) => return Err(error.into()),
    };

    info!(
        "{} panels needed at {}, results written to {}",
        design.panel_count,
        design.location,
        output_path.display()
    );
    if let Ok(battery_bank) = &design.battery_bank {
        info!("{} battery modules needed", battery_bank.module_count);
    }
    debug!("design: {design:?}");

    Ok(())
}

impl From<&PvSizerArgs> for ProjectFlags {
    fn from(args: &PvSizerArgs) -> Self {
        let mut flags = ProjectFlags::empty();
        if args.detailed_output {
            flags.insert(ProjectFlags::DETAILED_OUTPUT);
        }
        if args.summary_json {
            flags.insert(ProjectFlags::SUMMARY_JSON);
        }

        flags
    }
}
