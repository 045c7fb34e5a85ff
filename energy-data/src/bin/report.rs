use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use energy_core::calculations::record_sums;
use energy_core::format::{display_value, fixed2};
use energy_core::pipeline::{
    ExportTable, SortKey, SortOrder, YearRange, energy_table, filter_by_range, partition, project,
    regional_table, sort_records,
};
use energy_core::{EnergySource, PipelineConfig, Region};
use energy_data::{load_records, load_regional, logging, write_csv, write_csv_file};
use tracing::info;

/// Reports over saved energy dashboard payloads.
///
/// Input files are backend response bodies saved to disk: the
/// `/api/predictions/{source}/` body for `chart` and `export`, and the
/// `/api/peertopeer/records` array for `regional`.
#[derive(Parser, Debug)]
#[command(name = "energy-report")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Append log output to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Pipeline configuration (TOML); built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print chart points and the historical trend line
    Chart(SeriesArgs),

    /// Write the records table as CSV
    Export {
        #[command(flatten)]
        series: SeriesArgs,

        #[arg(long, value_enum, default_value_t = SortArg::Year)]
        sort: SortArg,

        #[arg(long, value_enum, default_value_t = OrderArg::Asc)]
        order: OrderArg,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print recomputed regional totals per year
    Regional {
        /// Saved regional records body
        #[arg(short, long)]
        file: PathBuf,

        /// Also write the regional table as CSV
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct SeriesArgs {
    /// Energy source (geothermal, hydropower, biomass, solar, wind)
    #[arg(short, long)]
    source: String,

    /// Saved predictions body
    #[arg(short, long)]
    file: PathBuf,

    /// First year, inclusive
    #[arg(long, default_value = "2015")]
    start: String,

    /// Last year, inclusive
    #[arg(long, default_value = "2030")]
    end: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortArg {
    Year,
    Value,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Year => SortKey::Year,
            SortArg::Value => SortKey::Value,
        }
    }
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

struct Series {
    source: EnergySource,
    range: YearRange,
    records: Vec<energy_core::EnergyRecord>,
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn load_series(
    args: &SeriesArgs,
    config: &PipelineConfig,
) -> Result<Series> {
    let source = EnergySource::parse(&args.source)
        .ok_or_else(|| anyhow!("unknown energy source '{}'", args.source))?;
    let range = YearRange::parse(&args.start, &args.end)
        .ok_or_else(|| anyhow!("start and end must be whole years"))?;
    let records = load_records(&args.file, &config.aliases_for(source))
        .with_context(|| format!("Failed to load predictions: {}", args.file.display()))?;

    let split = partition(&records);
    info!(
        %source,
        historical = split.historical.len(),
        predicted = split.predicted.len(),
        "loaded series"
    );
    Ok(Series {
        source,
        range,
        records,
    })
}

fn emit(
    table: &ExportTable,
    out: Option<&Path>,
) -> Result<()> {
    match out {
        Some(path) => {
            write_csv_file(table, path)
                .with_context(|| format!("Failed to write: {}", path.display()))?;
            println!("Wrote {} rows to {}", table.rows.len(), path.display());
        }
        None => write_csv(table, io::stdout().lock()).context("Failed to write to stdout")?,
    }
    Ok(())
}

fn chart(series: Series) {
    let projection = project(&series.records, series.range);

    println!("{} ({}-{})", series.source, series.range.start, series.range.end);
    for point in &projection.points {
        let kind = if point.is_predicted { "predicted" } else { "historical" };
        println!("  {}  {:>12}  {kind}", point.year, display_value(point.value));
    }

    match projection.fit {
        Some(fit) => {
            println!("Trend: slope {} per year, intercept {}", fixed2(fit.slope), fixed2(fit.intercept));
            for point in &projection.trend {
                println!("  {}  {:>12}", point.year, fixed2(point.value));
            }
        }
        None => println!("Trend: not enough historical data"),
    }
}

fn regional(
    file: &Path,
    out: Option<&Path>,
    config: &PipelineConfig,
) -> Result<()> {
    let mut records = load_regional(file, &config.regional)
        .with_context(|| format!("Failed to load regional records: {}", file.display()))?;
    records.sort_by_key(|r| r.year);

    for record in &records {
        let sums = record_sums(record);
        println!("{}", record.year);
        for region in Region::ALL {
            if let Some(s) = sums.regions.get(&region) {
                println!(
                    "  {:<12} renewable {:>12}  total {:>12}",
                    region.name(),
                    fixed2(s.renewable),
                    fixed2(s.total)
                );
            }
        }
        println!("  {:<12} {:>31}", "Visayas", fixed2(sums.grand_total));
        println!("  {:<12} {:>31}", "Consumption", display_value(record.consumption));
    }

    if let Some(path) = out {
        emit(&regional_table(&records), Some(path))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_file.as_deref())?;
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Chart(args) => chart(load_series(&args, &config)?),
        Command::Export {
            series,
            sort,
            order,
            out,
        } => {
            let series = load_series(&series, &config)?;
            let visible = filter_by_range(&series.records, series.range.start, series.range.end);
            let sorted = sort_records(&visible, sort.into(), order.into());
            emit(&energy_table(&sorted, series.source), out.as_deref())?;
        }
        Command::Regional { file, out } => regional(&file, out.as_deref(), &config)?,
    }

    Ok(())
}
