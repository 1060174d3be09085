use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{RwiError, RwiResult};

/// Расширение файлов результатов Wireless InSite.
pub const P2M_EXTENSION: &str = "p2m";

/// Тип записи, закодированный в имени файла.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Направления прихода (устаревший формат)
    Doa,
    /// Лучи с точками взаимодействия
    Paths,
    /// Положения объектов по шагам времени
    Positions,
}

/// Метаданные прогона, извлекаемые из имени файла.
///
/// Имя имеет вид `<project>.<type>.t<transmitter>_<transmitter_set>.r<receiver_set>.p2m`,
/// например `model.paths.t001_01.r002.p2m`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Имя проекта (может содержать точки)
    pub project: String,
    /// Тип записи
    pub kind: RecordKind,
    /// Номер передатчика
    pub transmitter: u64,
    /// Номер набора передатчиков
    pub transmitter_set: u64,
    /// Номер набора приёмников
    pub receiver_set: u64,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Doa => "doa",
            RecordKind::Paths => "paths",
            RecordKind::Positions => "positions",
        }
    }
}

impl RunMetadata {
    /// Разбирает метаданные из базового имени пути (каталоги игнорируются).
    pub fn from_path<P: AsRef<Path>>(path: P) -> RwiResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| RwiError::name_format(format!("{}", path.display())))?;

        Self::from_file_name(name)
    }

    /// Разбирает метаданные из базового имени файла.
    pub fn from_file_name(name: &str) -> RwiResult<Self> {
        let invalid = || RwiError::name_format(name);

        let stem = name
            .strip_suffix(P2M_EXTENSION)
            .and_then(|s| s.strip_suffix('.'))
            .ok_or_else(invalid)?;

        // Проект может содержать точки, поэтому режем справа
        let mut parts = stem.rsplitn(4, '.');
        let receiver_part = parts.next().ok_or_else(invalid)?;
        let transmitter_part = parts.next().ok_or_else(invalid)?;
        let kind_part = parts.next().ok_or_else(invalid)?;
        let project = parts.next().ok_or_else(invalid)?;

        let kind: RecordKind = kind_part.parse().map_err(|_| invalid())?;

        let (transmitter, transmitter_set) = transmitter_part
            .strip_prefix('t')
            .and_then(|s| s.split_once('_'))
            .ok_or_else(invalid)?;

        let receiver_set = receiver_part.strip_prefix('r').ok_or_else(invalid)?;

        Ok(RunMetadata {
            project: project.to_string(),
            kind,
            transmitter: parse_index(transmitter).ok_or_else(invalid)?,
            transmitter_set: parse_index(transmitter_set).ok_or_else(invalid)?,
            receiver_set: parse_index(receiver_set).ok_or_else(invalid)?,
        })
    }

    /// Восстанавливает каноническое имя файла (индексы без ведущих нулей).
    pub fn file_name(&self) -> String {
        format!(
            "{}.{}.t{}_{}.r{}.{P2M_EXTENSION}",
            self.project, self.kind, self.transmitter, self.transmitter_set, self.receiver_set
        )
    }
}

/// Беззнаковый индекс в пределах `u64`: только ASCII-цифры, хотя бы одна.
fn parse_index(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для RecordKind
////////////////////////////////////////////////////////////////////////////////

impl std::fmt::Display for RecordKind {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "doa" => Ok(RecordKind::Doa),
            "paths" => Ok(RecordKind::Paths),
            "positions" => Ok(RecordKind::Positions),
            _ => Err(format!(
                "Unknown record type: '{s}'. Use: doa, paths, positions"
            )),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
