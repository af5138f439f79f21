use analyze_speedup::analysis::{generate_grouped_plot, generate_single_plot, RatioChain};
use analyze_speedup::config::PlotConfig;
use analyze_speedup::discovery::FileOrder;
use analyze_speedup::Result;
use argh::FromArgs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Speed-up ratio charts for load-balanced benchmark results
#[derive(FromArgs, Debug)]
struct Args {
    /// JSON file overriding the default plot configuration
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// log filter, e.g. "analyze_speedup=debug" (default: $RUST_LOG or info)
    #[argh(option)]
    log: Option<String>,

    #[argh(subcommand)]
    command: Option<Command>,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Command {
    Grouped(GroupedArgs),
    Single(SingleArgs),
}

/// Compare speed-up ratios across processor counts (the default)
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "grouped")]
struct GroupedArgs {
    /// directory containing the case directories (default: .)
    #[argh(option, short = 'r', default = "PathBuf::from(\".\")")]
    root: PathBuf,

    /// case directory to include; repeat for several (default: core_20 ... core_320)
    #[argh(option)]
    case: Vec<String>,

    /// image to write (default: Sr.png)
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// how model maxima are folded: sequential or first-over-last
    #[argh(option)]
    ratio: Option<RatioChain>,

    /// result file order: numeric or listing
    #[argh(option)]
    order: Option<FileOrder>,
}

/// Show speed-up ratios of a single result directory
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "single")]
struct SingleArgs {
    /// directory containing the result files (default: .)
    #[argh(option, short = 'd', default = "PathBuf::from(\".\")")]
    dir: PathBuf,

    /// also save the chart to this image
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// how model maxima are folded: sequential or first-over-last
    #[argh(option)]
    ratio: Option<RatioChain>,

    /// result file order: numeric or listing
    #[argh(option)]
    order: Option<FileOrder>,
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(filter) => EnvFilter::new(filter),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("analyze_speedup=info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn apply_overrides(config: &mut PlotConfig, ratio: Option<RatioChain>, order: Option<FileOrder>) {
    if let Some(ratio) = ratio {
        config.settings.ratio_chain = ratio;
    }
    if let Some(order) = order {
        config.settings.file_order = order;
    }
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    init_logging(args.log.as_deref());

    let mut config = match &args.config {
        Some(path) => PlotConfig::from_json_file(path)?,
        None => PlotConfig::default(),
    };

    // No subcommand runs the grouped chart with its defaults
    let command = args.command.unwrap_or_else(|| {
        Command::Grouped(GroupedArgs {
            root: PathBuf::from("."),
            case: Vec::new(),
            output: None,
            ratio: None,
            order: None,
        })
    });

    match command {
        Command::Grouped(grouped) => {
            apply_overrides(&mut config, grouped.ratio, grouped.order);
            if !grouped.case.is_empty() {
                config.cases = grouped.case;
            }
            if let Some(output) = grouped.output {
                config.output = output;
            }

            generate_grouped_plot(&grouped.root, &config)?;
        }
        Command::Single(single) => {
            apply_overrides(&mut config, single.ratio, single.order);
            generate_single_plot(&single.dir, &config, single.output.as_deref())?;
        }
    }

    Ok(())
}
