use std::path::PathBuf;

use clap::Parser;
use log::{error, LevelFilter};
use rwi_channel::{ChannelConfig, DEFAULT_ANTENNA_COUNT};
use rwi_cli::{
    inspect, load_channel_config, parse_freq_hz, CliError, CliResult, InspectConfig, OutputFormat,
};
use rwi_core::ParserConfig;
use rwi_types::{AngleUnit, DIRECT_PATH_LABEL};

#[derive(Parser, Debug)]
#[command(
    name = "rwi-inspect",
    version = env!("CARGO_PKG_VERSION"),
    about = "Inspect Wireless InSite .p2m files and synthesize beamformed channels",
    long_about = None,
)]
struct Cli {
    /// Путь к .p2m файлу (тип записи берётся из имени)
    file: PathBuf,
    /// Показать только этот приёмник
    #[arg(short, long)]
    receiver: Option<u32>,
    /// Синтезировать эффективный канал для каждого приёмника
    #[arg(short, long)]
    channel: bool,
    /// Антенн по каждой оси решётки
    #[arg(short, long, default_value_t = DEFAULT_ANTENNA_COUNT)]
    antennas: usize,
    /// Несущая частота (60GHz, 28000MHz, 6e10)
    #[arg(short, long, default_value = "60GHz")]
    freq: String,
    /// JSON с параметрами решётки (вместо --antennas и --freq)
    #[arg(long)]
    channel_config: Option<PathBuf>,
    /// Число азимутальных секторов для распределения мощности по лучам
    #[arg(long)]
    beams: Option<usize>,
    /// Углы в файле заданы в градусах
    #[arg(long)]
    degrees: bool,
    /// Метка прямого луча
    #[arg(long, default_value = DIRECT_PATH_LABEL)]
    los_label: String,
    /// Вывод в JSON
    #[arg(long)]
    json: bool,
    /// Тихий режим (только ошибки)
    #[arg(short, long)]
    quiet: bool,
    /// Подробный лог (debug)
    #[arg(short, long)]
    verbose: bool,
}

fn build_config(cli: &Cli) -> CliResult<InspectConfig> {
    let angle_unit = if cli.degrees {
        AngleUnit::Degrees
    } else {
        AngleUnit::Radians
    };

    let channel = match &cli.channel_config {
        Some(path) => Some(load_channel_config(path)?),
        None if cli.channel => {
            let frequency_hz =
                parse_freq_hz(&cli.freq).map_err(|e| CliError::argument("--freq", e))?;
            let config = ChannelConfig::new(cli.antennas, frequency_hz);
            config.validate()?;
            Some(config)
        }
        None => None,
    };

    let mut config = InspectConfig::new(cli.file.clone());
    config.receiver = cli.receiver;
    config.parser = ParserConfig { angle_unit };
    config.direct_path_label = cli.los_label.clone();
    config.channel = channel;
    config.beams = cli.beams;
    config.output = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    Ok(config)
}

fn run(cli: &Cli) -> CliResult<()> {
    let config = build_config(cli)?;
    let report = inspect(&config)?;

    match config.output {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp_secs()
        .init();

    if let Err(e) = run(&cli) {
        error!("{e}");
        std::process::exit(1);
    }
}
