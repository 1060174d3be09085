use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use log::{debug, info, warn};
use rwi_types::{Record, RecordKind, RunMetadata, RwiError, RwiResult};

use crate::LineCursor;

/// Чтение записи одного приёмника.
///
/// Единственная точка расширения парсера: новый тип записи реализует только
/// этот трейт, а заголовок, метаданные и курсор остаются общими.
pub trait RecordParser {
    /// Данные присутствующего приёмника
    type Item;

    /// Тип записи, который ожидается в имени файла
    const KIND: RecordKind;

    /// Читает запись приёмника, начиная с текущей позиции курсора.
    ///
    /// `ordinal` это порядковый номер записи в файле (с 1), для форматов без
    /// явного индекса приёмника. Возвращает индекс приёмника и запись.
    fn read_receiver<R: BufRead>(
        &self,
        ordinal: u32,
        cursor: &mut LineCursor<R>,
    ) -> RwiResult<(u32, Record<Self::Item>)>;
}

/// Полностью разобранный .p2m файл.
#[derive(Debug, Clone, PartialEq)]
pub struct P2mFile<T> {
    /// Метаданные из имени файла
    pub metadata: RunMetadata,
    /// Записи приёмников по индексу
    pub receivers: BTreeMap<u32, Record<T>>,
}

/// Разбирает файл целиком. Файл закрывается до возврата при любом исходе.
pub fn parse_file<P, Q>(
    parser: &P,
    path: Q,
) -> RwiResult<P2mFile<P::Item>>
where
    P: RecordParser,
    Q: AsRef<Path>,
{
    let path = path.as_ref();
    let metadata = RunMetadata::from_path(path)?;
    let file = File::open(path)?;

    parse_with_metadata(parser, metadata, file)
}

/// Разбирает произвольный источник; метаданные берутся из `name`.
pub fn parse_reader<P, R>(
    parser: &P,
    name: &str,
    inner: R,
) -> RwiResult<P2mFile<P::Item>>
where
    P: RecordParser,
    R: Read,
{
    let metadata = RunMetadata::from_file_name(name)?;

    parse_with_metadata(parser, metadata, inner)
}

fn parse_with_metadata<P, R>(
    parser: &P,
    metadata: RunMetadata,
    inner: R,
) -> RwiResult<P2mFile<P::Item>>
where
    P: RecordParser,
    R: Read,
{
    if metadata.kind != P::KIND {
        warn!(
            "{}: file name declares '{}' records, reading as '{}'",
            metadata.file_name(),
            metadata.kind,
            P::KIND
        );
    }

    let mut cursor = LineCursor::new(BufReader::new(inner));

    // Заголовок: количество приёмников
    let declared: u32 = cursor.next_value("receiver count")?;
    let mut receivers = BTreeMap::new();

    for ordinal in 1..=declared {
        let (index, record) = parser.read_receiver(ordinal, &mut cursor)?;

        debug!(
            "receiver {index}: {}",
            if record.is_absent() { "no link" } else { "parsed" }
        );

        if receivers.insert(index, record).is_some() {
            return Err(RwiError::format(
                cursor.line_no(),
                format!("duplicate receiver index {index}"),
            ));
        }
    }

    let parsed = P2mFile {
        metadata,
        receivers,
    };

    info!(
        "{}: {} receivers ({} without link)",
        parsed.metadata.file_name(),
        parsed.receiver_count(),
        parsed.absent_receivers().len()
    );

    Ok(parsed)
}

impl<T> P2mFile<T> {
    pub fn receiver_count(&self) -> usize {
        self.receivers.len()
    }

    /// Запись приёмника; неизвестный индекс является ошибкой.
    pub fn receiver(
        &self,
        index: u32,
    ) -> RwiResult<&Record<T>> {
        self.receivers
            .get(&index)
            .ok_or(RwiError::UnknownReceiver(index))
    }

    /// Данные приёмника или `None`, если связи нет.
    pub fn present(
        &self,
        index: u32,
    ) -> RwiResult<Option<&T>> {
        Ok(self.receiver(index)?.present())
    }

    /// Индексы приёмников в порядке возрастания.
    pub fn receiver_indices(&self) -> Vec<u32> {
        self.receivers.keys().copied().collect()
    }

    /// Индексы приёмников без связи.
    pub fn absent_receivers(&self) -> Vec<u32> {
        self.receivers
            .iter()
            .filter(|(_, r)| r.is_absent())
            .map(|(i, _)| *i)
            .collect()
    }

    /// Присутствующие приёмники в порядке индексов.
    pub fn iter_present(&self) -> impl Iterator<Item = (u32, &T)> {
        self.receivers
            .iter()
            .filter_map(|(i, r)| r.present().map(|v| (*i, v)))
    }
}
