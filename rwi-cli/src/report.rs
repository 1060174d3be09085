//! Сбор отчёта по .p2m файлу и его текстовое представление.

use std::fmt;

use log::{debug, info};
use ndarray::Array2;
use num_complex::Complex64;
use rwi_channel::{effective_gain_db, BeamClusterer, ChannelConfig, ChannelSynthesizer};
use rwi_core::{parse_file, DoaParser, P2mFile, PathsParser, PositionsParser};
use rwi_types::{AnglePair, PositionsFrame, RayPath, ReceiverPaths, RecordKind, RunMetadata};
use serde::Serialize;

use crate::{CliResult, InspectConfig};

/// Отчёт по одному файлу.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub metadata: RunMetadata,
    pub receiver_count: usize,
    pub absent_receivers: Vec<u32>,
    pub body: ReportBody,
}

/// Содержимое, зависящее от типа записи.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReportBody {
    Paths { receivers: Vec<ReceiverReport> },
    Positions { frames: Vec<FrameReport> },
    Doa {
        max_paths: usize,
        receivers: Vec<DoaSummary>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiverReport {
    pub index: u32,
    /// None = до приёмника не дошёл ни один луч
    pub link: Option<LinkReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    pub received_power: f64,
    pub arrival_time: f64,
    pub delay_spread: f64,
    pub paths_number: usize,
    pub has_los: bool,
    pub rays: Vec<RayRow>,
    pub channel: Option<ChannelReport>,
    /// Линейная мощность по азимутальным секторам прихода
    pub beam_power: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RayRow {
    pub index: u32,
    pub interactions: String,
    pub los: bool,
    /// Длина ломаной через точки взаимодействий, м
    pub length: f64,
    pub gain_db: f64,
    pub arrival_time: f64,
    pub departure: AnglePair,
    pub arrival: AnglePair,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelReport {
    /// Антенн по каждой оси решётки
    pub antenna_count: usize,
    /// Сторона матрицы канала, `antenna_count²`
    pub array_size: usize,
    pub frequency_hz: f64,
    /// `10·log10(Σ|h|²)`
    pub gain_db: f64,
    pub peak: BeamPair,
    /// `|h|` эффективного канала, строка = луч передатчика
    pub magnitude: Vec<Vec<f64>>,
}

/// Пара лучей (передатчик, приёмник) с наибольшим `|h|`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeamPair {
    pub transmit: usize,
    pub receive: usize,
    pub magnitude: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub step: u32,
    pub frame: Option<PositionsFrame>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoaSummary {
    pub index: u32,
    pub paths: Option<usize>,
}

////////////////////////////////////////////////////////////////////////////////
// Сбор отчёта
////////////////////////////////////////////////////////////////////////////////

/// Разбирает файл и строит отчёт; тип записи берётся из имени файла.
pub fn inspect(config: &InspectConfig) -> CliResult<FileReport> {
    let metadata = RunMetadata::from_path(&config.path)?;

    info!("Inspecting {} ({} records)", config.path.display(), metadata.kind);

    match metadata.kind {
        RecordKind::Paths => inspect_paths(config),
        RecordKind::Positions => inspect_positions(config),
        RecordKind::Doa => inspect_doa(config),
    }
}

fn inspect_paths(config: &InspectConfig) -> CliResult<FileReport> {
    let parser = PathsParser::new(config.parser.clone());
    let trace = parse_file(&parser, &config.path)?;

    let synthesizer = config.channel.map(ChannelSynthesizer::new).transpose()?;
    let clusterer = config.beams.map(BeamClusterer::new).transpose()?;
    let label = config.direct_path_label.as_str();

    let mut receivers = Vec::new();
    for index in selected(&trace, config.receiver)? {
        let link = match trace.present(index)? {
            Some(rx) => Some(link_report(
                rx,
                label,
                synthesizer.as_ref(),
                clusterer.as_ref(),
            )?),
            None => None,
        };
        receivers.push(ReceiverReport { index, link });
    }

    Ok(file_report(&trace, ReportBody::Paths { receivers }))
}

fn inspect_positions(config: &InspectConfig) -> CliResult<FileReport> {
    let trace = parse_file(&PositionsParser, &config.path)?;

    let mut frames = Vec::new();
    for step in selected(&trace, config.receiver)? {
        frames.push(FrameReport {
            step,
            frame: trace.frame(step)?.cloned(),
        });
    }

    Ok(file_report(&trace, ReportBody::Positions { frames }))
}

fn inspect_doa(config: &InspectConfig) -> CliResult<FileReport> {
    let trace = parse_file(&DoaParser, &config.path)?;

    let mut receivers = Vec::new();
    for index in selected(&trace, config.receiver)? {
        receivers.push(DoaSummary {
            index,
            paths: trace.present(index)?.map(|rx| rx.paths_number()),
        });
    }

    let max_paths = trace.max_paths();
    Ok(file_report(&trace, ReportBody::Doa {
        max_paths,
        receivers,
    }))
}

/// Индексы для отчёта: один запрошенный (должен быть в файле) или все.
fn selected<T>(
    trace: &P2mFile<T>,
    only: Option<u32>,
) -> CliResult<Vec<u32>> {
    match only {
        Some(index) => {
            trace.receiver(index)?;
            Ok(vec![index])
        }
        None => Ok(trace.receiver_indices()),
    }
}

fn file_report<T>(
    trace: &P2mFile<T>,
    body: ReportBody,
) -> FileReport {
    FileReport {
        file: trace.metadata.file_name(),
        metadata: trace.metadata.clone(),
        receiver_count: trace.receiver_count(),
        absent_receivers: trace.absent_receivers(),
        body,
    }
}

fn link_report(
    rx: &ReceiverPaths,
    direct_path_label: &str,
    synthesizer: Option<&ChannelSynthesizer>,
    clusterer: Option<&BeamClusterer>,
) -> CliResult<LinkReport> {
    let rays: Vec<RayRow> = rx
        .rays
        .iter()
        .map(|ray| RayRow::new(ray, direct_path_label))
        .collect();

    let channel = match synthesizer {
        Some(synth) => {
            let matrix = synth.receiver_channel(rx)?;
            debug!("receiver {}: channel {:?}", rx.index, matrix.dim());
            Some(ChannelReport::new(synth.config(), &matrix))
        }
        None => None,
    };

    Ok(LinkReport {
        received_power: rx.received_power,
        arrival_time: rx.arrival_time,
        delay_spread: rx.delay_spread,
        paths_number: rx.paths_number(),
        has_los: rays.iter().any(|r| r.los),
        rays,
        channel,
        beam_power: clusterer.map(|c| c.beam_power(rx)),
    })
}

impl RayRow {
    fn new(
        ray: &RayPath,
        direct_path_label: &str,
    ) -> Self {
        Self {
            index: ray.index,
            interactions: ray.interactions.clone(),
            los: ray.is_los_with(direct_path_label),
            length: ray.length(),
            gain_db: ray.gain_db,
            arrival_time: ray.arrival_time,
            departure: ray.departure,
            arrival: ray.arrival,
        }
    }
}

impl ChannelReport {
    pub fn new(
        config: &ChannelConfig,
        matrix: &Array2<Complex64>,
    ) -> Self {
        let magnitude: Vec<Vec<f64>> = matrix
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|h| h.norm()).collect())
            .collect();

        Self {
            antenna_count: config.antenna_count,
            array_size: config.array_size(),
            frequency_hz: config.frequency_hz,
            gain_db: effective_gain_db(matrix),
            peak: peak_beam_pair(matrix),
            magnitude,
        }
    }
}

/// Элемент с наибольшим модулем; для пустой матрицы `(0, 0, 0.0)`.
pub fn peak_beam_pair(matrix: &Array2<Complex64>) -> BeamPair {
    let mut best = BeamPair {
        transmit: 0,
        receive: 0,
        magnitude: 0.0,
    };

    for ((transmit, receive), h) in matrix.indexed_iter() {
        let magnitude = h.norm();
        if magnitude > best.magnitude {
            best = BeamPair {
                transmit,
                receive,
                magnitude,
            };
        }
    }

    best
}

////////////////////////////////////////////////////////////////////////////////
// Текстовый вывод
////////////////////////////////////////////////////////////////////////////////

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

impl fmt::Display for FileReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let m = &self.metadata;

        writeln!(f, "{RULE}")?;
        writeln!(f, "  File          : {}", self.file)?;
        writeln!(f, "  Project       : {}", m.project)?;
        writeln!(f, "  Record kind   : {}", m.kind)?;
        writeln!(
            f,
            "  Transmitter   : {} (set {})",
            m.transmitter, m.transmitter_set
        )?;
        writeln!(f, "  Receiver set  : {}", m.receiver_set)?;
        writeln!(
            f,
            "  Receivers     : {} ({} without link)",
            self.receiver_count,
            self.absent_receivers.len()
        )?;
        writeln!(f, "{RULE}")?;

        match &self.body {
            ReportBody::Paths { receivers } => {
                for rx in receivers {
                    write_receiver(f, rx)?;
                }
            }
            ReportBody::Positions { frames } => {
                for frame in frames {
                    write_frame(f, frame)?;
                }
            }
            ReportBody::Doa {
                max_paths,
                receivers,
            } => {
                writeln!(f, "max paths per receiver: {max_paths}")?;
                for rx in receivers {
                    match rx.paths {
                        Some(n) => writeln!(f, "receiver {}: {n} paths", rx.index)?,
                        None => writeln!(f, "receiver {}: no link", rx.index)?,
                    }
                }
            }
        }

        Ok(())
    }
}

fn write_receiver(
    f: &mut fmt::Formatter<'_>,
    rx: &ReceiverReport,
) -> fmt::Result {
    let Some(link) = &rx.link else {
        return writeln!(f, "receiver {}: no link", rx.index);
    };

    writeln!(
        f,
        "receiver {}: power {:.3} dB, toa {:.4e} s, spread {:.4e} s, {} paths{}",
        rx.index,
        link.received_power,
        link.arrival_time,
        link.delay_spread,
        link.paths_number,
        if link.has_los { ", LOS" } else { "" }
    )?;
    writeln!(
        f,
        "  {:>4} {:<20} {:>10} {:>12} {:>9} {:>8} {:>8} {:>8} {:>8}",
        "#", "interactions", "gain_dB", "toa_s", "length_m", "dep_el", "dep_az", "arr_el", "arr_az"
    )?;
    for ray in &link.rays {
        writeln!(
            f,
            "  {:>4} {:<20} {:>10.3} {:>12.4e} {:>9.3} {:>8.4} {:>8.4} {:>8.4} {:>8.4}",
            ray.index,
            ray.interactions,
            ray.gain_db,
            ray.arrival_time,
            ray.length,
            ray.departure.elevation,
            ray.departure.azimuth,
            ray.arrival.elevation,
            ray.arrival.azimuth
        )?;
    }

    if let Some(power) = &link.beam_power {
        let cells: Vec<String> = power.iter().map(|p| format!("{p:.3e}")).collect();
        writeln!(f, "  beam power: [{}]", cells.join(", "))?;
    }

    if let Some(ch) = &link.channel {
        writeln!(
            f,
            "  channel {0}x{0} ({1}x{1} array) @ {2:.3} GHz: total {3:.3} dB, peak |h| {4:.4e} at (tx {5}, rx {6})",
            ch.array_size,
            ch.antenna_count,
            ch.frequency_hz / 1e9,
            ch.gain_db,
            ch.peak.magnitude,
            ch.peak.transmit,
            ch.peak.receive
        )?;
        for row in &ch.magnitude {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:9.3e}")).collect();
            writeln!(f, "    {}", cells.join(" "))?;
        }
    }

    Ok(())
}

fn write_frame(
    f: &mut fmt::Formatter<'_>,
    report: &FrameReport,
) -> fmt::Result {
    let Some(frame) = &report.frame else {
        return writeln!(f, "step {}: no objects", report.step);
    };

    writeln!(
        f,
        "step {} (t = {}): {} objects",
        report.step,
        frame.timestamp,
        frame.object_count()
    )?;
    for obj in &frame.objects {
        writeln!(
            f,
            "  {:<16} {}  v={:.3} a={:.3}",
            obj.name, obj.position, obj.velocity, obj.acceleration
        )?;
    }

    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
