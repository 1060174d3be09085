use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use rwi_channel::ChannelConfig;
use rwi_core::ParserConfig;
use rwi_types::DIRECT_PATH_LABEL;

use crate::CliResult;

/// Формат вывода отчёта.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Человекочитаемые таблицы
    #[default]
    Text,
    /// Один JSON-документ
    Json,
}

/// Полная конфигурация запуска `rwi-inspect`.
#[derive(Debug, Clone)]
pub struct InspectConfig {
    /// Путь к .p2m файлу
    pub path: PathBuf,
    /// Только этот приёмник (None = все)
    pub receiver: Option<u32>,
    /// Настройки парсера
    pub parser: ParserConfig,
    /// Метка прямого луча для признака LOS
    pub direct_path_label: String,
    /// Параметры решётки; None = канал не синтезируется
    pub channel: Option<ChannelConfig>,
    /// Число азимутальных секторов для распределения мощности
    pub beams: Option<usize>,
    pub output: OutputFormat,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl InspectConfig {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            receiver: None,
            parser: ParserConfig::default(),
            direct_path_label: DIRECT_PATH_LABEL.to_string(),
            channel: None,
            beams: None,
            output: OutputFormat::Text,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для OutputFormat
////////////////////////////////////////////////////////////////////////////////

impl std::fmt::Display for OutputFormat {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: '{s}'. Use: text, json")),
        }
    }
}

/// Парсит строку частоты в герцы.
///
/// Поддерживает суффиксы `GHz`, `MHz`, `kHz`, `Hz` (регистронезависимо) и
/// экспоненциальную запись без суффикса.
///
/// # Примеры
/// ```
/// use rwi_cli::config::parse_freq_hz;
/// assert_eq!(parse_freq_hz("60GHz").unwrap(), 60.0e9);
/// assert_eq!(parse_freq_hz("28e9").unwrap(), 28.0e9);
/// assert_eq!(parse_freq_hz("2400 MHz").unwrap(), 2.4e9);
/// ```
pub fn parse_freq_hz(s: &str) -> Result<f64, String> {
    let s = s.trim();
    let lower = s.to_lowercase();

    let (num_str, mult) = if let Some(v) = lower.strip_suffix("ghz") {
        (v.trim(), 1.0e9)
    } else if let Some(v) = lower.strip_suffix("mhz") {
        (v.trim(), 1.0e6)
    } else if let Some(v) = lower.strip_suffix("khz") {
        (v.trim(), 1.0e3)
    } else if let Some(v) = lower.strip_suffix("hz") {
        (v.trim(), 1.0)
    } else {
        (lower.as_str(), 1.0)
    };

    let n: f64 = num_str
        .parse()
        .map_err(|e| format!("Invalid frequency value '{num_str}': {e}"))?;

    let hz = n * mult;
    if !(hz.is_finite() && hz > 0.0) {
        return Err(format!("Frequency must be positive, got '{s}'"));
    }

    Ok(hz)
}

/// Читает [`ChannelConfig`] из JSON-файла; отсутствующие поля берутся по
/// умолчанию.
pub fn load_channel_config<P: AsRef<Path>>(path: P) -> CliResult<ChannelConfig> {
    let file = File::open(path)?;
    let config: ChannelConfig = serde_json::from_reader(BufReader::new(file))?;

    config.validate()?;

    Ok(config)
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
