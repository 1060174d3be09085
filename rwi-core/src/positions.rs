//! Разбор файлов `*.positions.*.p2m`: положения объектов по шагам времени.
//!
//! Индекса приёмника в записи нет, поэтому шаги нумеруются по порядку (с 1).

use std::io::BufRead;

use ndarray::{Array1, Array2};
use rwi_types::{ObjectState, Position, PositionsFrame, Record, RecordKind, RwiResult};

use crate::{LineCursor, P2mFile, RecordParser};

/// Разобранный файл положений.
pub type PositionsTrace = P2mFile<PositionsFrame>;

/// Читатель записей типа `positions`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionsParser;

impl RecordParser for PositionsParser {
    type Item = PositionsFrame;

    const KIND: RecordKind = RecordKind::Positions;

    fn read_receiver<R: BufRead>(
        &self,
        ordinal: u32,
        cursor: &mut LineCursor<R>,
    ) -> RwiResult<(u32, Record<PositionsFrame>)> {
        let timestamp: i64 = cursor.next_value("timestamp")?;
        let n_objects: u32 = cursor.next_value("object count")?;

        if n_objects == 0 {
            return Ok((ordinal, Record::Absent));
        }

        let mut objects = Vec::with_capacity((n_objects as usize).min(1024));
        for _ in 0..n_objects {
            let name = cursor.next_token_line()?;
            let [x, y, z, velocity, acceleration] = cursor.next_array::<f64, 5>("object state")?;

            objects.push(ObjectState {
                name,
                position: Position::new(x, y, z),
                velocity,
                acceleration,
            });
        }

        Ok((ordinal, Record::Present(PositionsFrame { timestamp, objects })))
    }
}

impl P2mFile<PositionsFrame> {
    /// Шаг времени по номеру (с 1); `None` если объектов на шаге нет.
    pub fn frame(
        &self,
        step: u32,
    ) -> RwiResult<Option<&PositionsFrame>> {
        self.present(step)
    }

    pub fn object_names(
        &self,
        step: u32,
    ) -> RwiResult<Option<Vec<String>>> {
        Ok(self
            .present(step)?
            .map(|f| f.objects.iter().map(|o| o.name.clone()).collect()))
    }

    /// Положения объектов: `objects × 3`.
    pub fn object_positions(
        &self,
        step: u32,
    ) -> RwiResult<Option<Array2<f64>>> {
        Ok(self.present(step)?.map(|f| {
            Array2::from_shape_fn((f.objects.len(), 3), |(i, j)| {
                f.objects[i].position.to_array()[j]
            })
        }))
    }

    pub fn velocities(
        &self,
        step: u32,
    ) -> RwiResult<Option<Array1<f64>>> {
        Ok(self
            .present(step)?
            .map(|f| f.objects.iter().map(|o| o.velocity).collect()))
    }
}
