//! Устаревший формат `*.doa.*.p2m`: только направления прихода.
//!
//! ```text
//! <receiver_index> <path_count>
//! <path_index> <d1> <d2> ...        # path_count раз
//! ```

use std::io::BufRead;

use ndarray::Array3;
use rwi_types::{DoaPath, DoaReceiver, Record, RecordKind, RwiError, RwiResult};

use crate::{LineCursor, P2mFile, RecordParser};

/// Разобранный файл направлений прихода.
pub type DoaTrace = P2mFile<DoaReceiver>;

/// Читатель записей типа `doa`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoaParser;

impl RecordParser for DoaParser {
    type Item = DoaReceiver;

    const KIND: RecordKind = RecordKind::Doa;

    fn read_receiver<R: BufRead>(
        &self,
        _ordinal: u32,
        cursor: &mut LineCursor<R>,
    ) -> RwiResult<(u32, Record<DoaReceiver>)> {
        let [index, n_paths] = cursor.next_array::<u32, 2>("receiver header")?;

        if n_paths == 0 {
            return Ok((index, Record::Absent));
        }

        let mut paths = Vec::with_capacity((n_paths as usize).min(1024));
        for expected in 1..=n_paths {
            let row: Vec<f64> = cursor.next_row("direction")?;

            let Some((&path_n, direction)) = row.split_first() else {
                return Err(RwiError::format(cursor.line_no(), "direction: empty line"));
            };

            let path_index = cursor.integral(path_n, "path index")?;
            if path_index != expected {
                return Err(RwiError::format(
                    cursor.line_no(),
                    format!("expected path {expected}, found {path_index}"),
                ));
            }
            if direction.is_empty() {
                return Err(RwiError::format(
                    cursor.line_no(),
                    "direction: no components after path index",
                ));
            }

            paths.push(DoaPath {
                index: path_index,
                direction: direction.to_vec(),
            });
        }

        Ok((index, Record::Present(DoaReceiver { index, paths })))
    }
}

impl P2mFile<DoaReceiver> {
    /// Наибольшее число лучей среди приёмников.
    pub fn max_paths(&self) -> usize {
        self.iter_present()
            .map(|(_, rx)| rx.paths_number())
            .max()
            .unwrap_or(0)
    }

    /// Направления в виде `receivers × max_paths × width` в порядке файла.
    ///
    /// Недостающие лучи и приёмники без связи заполнены нулями.
    pub fn direction_tensor(&self) -> Array3<f64> {
        let width = self
            .iter_present()
            .map(|(_, rx)| rx.direction_width())
            .max()
            .unwrap_or(0);

        let mut out = Array3::zeros((self.receiver_count(), self.max_paths(), width));

        for (r, record) in self.receivers.values().enumerate() {
            let Some(rx) = record.present() else {
                continue;
            };
            for (p, path) in rx.paths.iter().enumerate() {
                for (d, value) in path.direction.iter().enumerate() {
                    out[[r, p, d]] = *value;
                }
            }
        }

        out
    }
}
