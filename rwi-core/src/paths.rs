//! Разбор файлов `*.paths.*.p2m` и представления поверх них.
//!
//! Запись приёмника:
//!
//! ```text
//! <receiver_index> <path_count>
//! <received_power> <mean_arrival_time> <delay_spread>     # только при path_count > 0
//! # далее path_count раз:
//! <ray_index> <interaction_count> <gain_db> <arrival_time> <arr_elev> <arr_azim> <dep_elev> <dep_azim>
//! Tx-R-...-Rx
//! <x> <y> <z>                                              # interaction_count + 2 раз
//! ```

use std::io::BufRead;

use log::trace;
use ndarray::{Array1, Array2};
use rwi_types::{
    AnglePair, Position, RayPath, ReceiverPaths, Record, RecordKind, RwiError, RwiResult,
    DIRECT_PATH_LABEL,
};

use crate::{LineCursor, P2mFile, ParserConfig, RecordParser};

/// Число столбцов в канонической таблице лучей.
pub const RAY_TABLE_COLUMNS: usize = 6;

/// Разобранный файл лучей.
pub type PathsTrace = P2mFile<ReceiverPaths>;

/// Читатель записей типа `paths`.
#[derive(Debug, Clone, Default)]
pub struct PathsParser {
    config: ParserConfig,
}

impl PathsParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    fn read_ray<R: BufRead>(
        &self,
        expected_index: u32,
        cursor: &mut LineCursor<R>,
    ) -> RwiResult<RayPath> {
        let [ray_n, n_interactions, gain_db, arrival_time, arr_elev, arr_azim, dep_elev, dep_azim] =
            cursor.next_array::<f64, 8>("ray")?;

        let index = cursor.integral(ray_n, "ray index")?;
        let interaction_count = cursor.integral(n_interactions, "interaction count")? as usize;

        if index != expected_index {
            return Err(RwiError::format(
                cursor.line_no(),
                format!("expected ray {expected_index}, found {index}"),
            ));
        }

        let interactions = cursor.next_token_line()?;

        let unit = self.config.angle_unit;
        let arrival = AnglePair::new(unit.to_radians(arr_elev), unit.to_radians(arr_azim));
        let departure = AnglePair::new(unit.to_radians(dep_elev), unit.to_radians(dep_azim));

        // Передатчик, точки взаимодействий, приёмник
        let n_points = interaction_count + 2;
        let mut positions = Vec::with_capacity(n_points.min(64));
        for _ in 0..n_points {
            let xyz: [f64; 3] = cursor.next_array("interaction position")?;
            positions.push(Position::from(xyz));
        }

        Ok(RayPath {
            index,
            interaction_count,
            gain_db,
            arrival_time,
            arrival,
            departure,
            interactions,
            positions,
        })
    }
}

impl RecordParser for PathsParser {
    type Item = ReceiverPaths;

    const KIND: RecordKind = RecordKind::Paths;

    fn read_receiver<R: BufRead>(
        &self,
        _ordinal: u32,
        cursor: &mut LineCursor<R>,
    ) -> RwiResult<(u32, Record<ReceiverPaths>)> {
        let [index, n_paths] = cursor.next_array::<u32, 2>("receiver header")?;

        if n_paths == 0 {
            return Ok((index, Record::Absent));
        }

        let [received_power, arrival_time, delay_spread] =
            cursor.next_array::<f64, 3>("receiver summary")?;

        let mut rays = Vec::with_capacity((n_paths as usize).min(1024));
        for ray_n in 1..=n_paths {
            rays.push(self.read_ray(ray_n, cursor)?);
        }

        trace!("receiver {index}: {n_paths} rays");

        Ok((
            index,
            Record::Present(ReceiverPaths {
                index,
                received_power,
                arrival_time,
                delay_spread,
                rays,
            }),
        ))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Представления
////////////////////////////////////////////////////////////////////////////////

/// Все методы возвращают `Ok(None)` для приёмника без связи и
/// `Err(UnknownReceiver)` для индекса, которого нет в файле.
impl P2mFile<ReceiverPaths> {
    fn with_receiver<U>(
        &self,
        index: u32,
        f: impl FnOnce(&ReceiverPaths) -> U,
    ) -> RwiResult<Option<U>> {
        Ok(self.present(index)?.map(f))
    }

    /// Суммарная принятая мощность, дБ.
    pub fn total_received_power(
        &self,
        receiver: u32,
    ) -> RwiResult<Option<f64>> {
        self.with_receiver(receiver, |rx| rx.received_power)
    }

    /// Среднее время прихода, с.
    pub fn mean_time_of_arrival(
        &self,
        receiver: u32,
    ) -> RwiResult<Option<f64>> {
        self.with_receiver(receiver, |rx| rx.arrival_time)
    }

    pub fn delay_spread(
        &self,
        receiver: u32,
    ) -> RwiResult<Option<f64>> {
        self.with_receiver(receiver, |rx| rx.delay_spread)
    }

    pub fn paths_number(
        &self,
        receiver: u32,
    ) -> RwiResult<Option<usize>> {
        self.with_receiver(receiver, ReceiverPaths::paths_number)
    }

    /// Время прихода каждого луча.
    pub fn arrival_times(
        &self,
        receiver: u32,
    ) -> RwiResult<Option<Array1<f64>>> {
        self.with_receiver(receiver, |rx| {
            rx.rays.iter().map(|r| r.arrival_time).collect()
        })
    }

    /// Метки взаимодействий каждого луча.
    pub fn interactions_list(
        &self,
        receiver: u32,
    ) -> RwiResult<Option<Vec<String>>> {
        self.with_receiver(receiver, |rx| {
            rx.rays.iter().map(|r| r.interactions.clone()).collect()
        })
    }

    /// Углы выхода: `paths × 2`, столбцы `[elevation, azimuth]`.
    pub fn departure_angles(
        &self,
        receiver: u32,
    ) -> RwiResult<Option<Array2<f64>>> {
        self.with_receiver(receiver, |rx| angle_matrix(rx, |r| r.departure))
    }

    /// Углы прихода: `paths × 2`, столбцы `[elevation, azimuth]`.
    pub fn arrival_angles(
        &self,
        receiver: u32,
    ) -> RwiResult<Option<Array2<f64>>> {
        self.with_receiver(receiver, |rx| angle_matrix(rx, |r| r.arrival))
    }

    /// Мощности лучей в дБ, как записаны в файле (без перевода в линейную
    /// шкалу).
    pub fn path_gains_db(
        &self,
        receiver: u32,
    ) -> RwiResult<Option<Array1<f64>>> {
        self.with_receiver(receiver, |rx| rx.rays.iter().map(|r| r.gain_db).collect())
    }

    /// Признак прямой видимости для каждого луча: метка равна `Tx-Rx`.
    ///
    /// Для файлов с другой меткой прямого луча нужен [`Self::is_los_with`].
    pub fn is_los(
        &self,
        receiver: u32,
    ) -> RwiResult<Option<Vec<bool>>> {
        self.is_los_with(receiver, DIRECT_PATH_LABEL)
    }

    /// Признак прямой видимости с другой меткой прямого луча.
    pub fn is_los_with(
        &self,
        receiver: u32,
        direct_path_label: &str,
    ) -> RwiResult<Option<Vec<bool>>> {
        self.with_receiver(receiver, |rx| {
            rx.rays
                .iter()
                .map(|r| r.is_los_with(direct_path_label))
                .collect()
        })
    }

    /// Каноническая таблица лучей `paths × 6`:
    /// `[gain_db, arrival_time, dep_elev, dep_azim, arr_elev, arr_azim]`.
    pub fn ray_table(
        &self,
        receiver: u32,
    ) -> RwiResult<Option<Array2<f64>>> {
        self.with_receiver(receiver, ray_table)
    }

    /// Точки взаимодействий луча, включая передатчик и приёмник.
    pub fn interaction_positions(
        &self,
        receiver: u32,
        ray: u32,
    ) -> RwiResult<Option<Vec<Position>>> {
        match self.present(receiver)? {
            None => Ok(None),
            Some(rx) => rx
                .ray(ray)
                .map(|r| Some(r.positions.clone()))
                .ok_or(RwiError::UnknownRay { receiver, ray }),
        }
    }

    /// То же в виде строки `x y z,x y z,...`.
    pub fn interaction_positions_string(
        &self,
        receiver: u32,
        ray: u32,
    ) -> RwiResult<Option<String>> {
        match self.present(receiver)? {
            None => Ok(None),
            Some(rx) => rx
                .ray(ray)
                .map(|r| Some(r.positions_string()))
                .ok_or(RwiError::UnknownRay { receiver, ray }),
        }
    }
}

fn angle_matrix(
    rx: &ReceiverPaths,
    pick: impl Fn(&RayPath) -> AnglePair,
) -> Array2<f64> {
    Array2::from_shape_fn((rx.rays.len(), 2), |(i, j)| {
        let a = pick(&rx.rays[i]);
        if j == 0 {
            a.elevation
        } else {
            a.azimuth
        }
    })
}

/// Таблица лучей приёмника в каноническом порядке столбцов.
pub fn ray_table(rx: &ReceiverPaths) -> Array2<f64> {
    Array2::from_shape_fn((rx.rays.len(), RAY_TABLE_COLUMNS), |(i, j)| {
        rx.rays[i].table_row()[j]
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rwi_types::AngleUnit;

    use super::*;
    use crate::parse_reader;

    const NAME: &str = "model.paths.t001_01.r002.p2m";

    const TWO_RECEIVERS: &str = "\
# Receiver Set:Rx
2
1 0
2 2
-85.5 2.1e-07 3.5e-09
1 0 -86.0 2.0e-07 1.5 0.25 1.6 -0.5
Tx-Rx
0 0 10
20 5 1.5
2 1 -95.25 2.3e-07 1.4 2.0 1.7 1.0
Tx-R-Rx
0 0 10
10 8 4
20 5 1.5
";

    fn parse(text: &str) -> RwiResult<PathsTrace> {
        parse_reader(&PathsParser::default(), NAME, Cursor::new(text))
    }

    #[test]
    fn test_two_receivers() {
        let trace = parse(TWO_RECEIVERS).unwrap();

        assert_eq!(trace.receiver_count(), 2);
        assert_eq!(trace.absent_receivers(), vec![1]);
        assert_eq!(trace.total_received_power(2).unwrap(), Some(-85.5));
        assert_eq!(trace.mean_time_of_arrival(2).unwrap(), Some(2.1e-7));
        assert_eq!(trace.delay_spread(2).unwrap(), Some(3.5e-9));
        assert_eq!(trace.paths_number(2).unwrap(), Some(2));

        let rx = trace.present(2).unwrap().unwrap();
        assert_eq!(rx.rays[0].positions.len(), 2);
        assert_eq!(rx.rays[1].positions.len(), 3);
        assert_eq!(rx.rays[1].positions[1], Position::new(10.0, 8.0, 4.0));
    }

    #[test]
    fn test_absent_receiver_accessors() {
        let trace = parse(TWO_RECEIVERS).unwrap();

        assert_eq!(trace.total_received_power(1).unwrap(), None);
        assert_eq!(trace.mean_time_of_arrival(1).unwrap(), None);
        assert_eq!(trace.arrival_times(1).unwrap(), None);
        assert_eq!(trace.interactions_list(1).unwrap(), None);
        assert_eq!(trace.departure_angles(1).unwrap(), None);
        assert_eq!(trace.arrival_angles(1).unwrap(), None);
        assert_eq!(trace.path_gains_db(1).unwrap(), None);
        assert_eq!(trace.is_los(1).unwrap(), None);
        assert_eq!(trace.ray_table(1).unwrap(), None);
        assert_eq!(trace.interaction_positions(1, 1).unwrap(), None);
        assert_eq!(trace.interaction_positions_string(1, 7).unwrap(), None);
    }

    #[test]
    fn test_angle_and_gain_views() {
        let trace = parse(TWO_RECEIVERS).unwrap();

        let dep = trace.departure_angles(2).unwrap().unwrap();
        assert_eq!(dep.dim(), (2, 2));
        assert_eq!(dep.row(0).to_vec(), vec![1.6, -0.5]);
        assert_eq!(dep.row(1).to_vec(), vec![1.7, 1.0]);

        let arr = trace.arrival_angles(2).unwrap().unwrap();
        assert_eq!(arr.row(1).to_vec(), vec![1.4, 2.0]);

        let gains = trace.path_gains_db(2).unwrap().unwrap();
        assert_eq!(gains.to_vec(), vec![-86.0, -95.25]);

        let times = trace.arrival_times(2).unwrap().unwrap();
        assert_eq!(times.to_vec(), vec![2.0e-7, 2.3e-7]);

        assert_eq!(
            trace.interactions_list(2).unwrap().unwrap(),
            vec!["Tx-Rx".to_string(), "Tx-R-Rx".to_string()]
        );
        assert_eq!(
            trace.is_los(2).unwrap().unwrap(),
            vec![true, false]
        );
        assert_eq!(
            trace.is_los_with(2, "Tx-R-Rx").unwrap().unwrap(),
            vec![false, true]
        );
    }

    #[test]
    fn test_ray_table_column_order() {
        let trace = parse(TWO_RECEIVERS).unwrap();
        let table = trace.ray_table(2).unwrap().unwrap();

        assert_eq!(table.dim(), (2, RAY_TABLE_COLUMNS));
        assert_eq!(
            table.row(1).to_vec(),
            vec![-95.25, 2.3e-7, 1.7, 1.0, 1.4, 2.0]
        );
    }

    #[test]
    fn test_interaction_positions_views() {
        let trace = parse(TWO_RECEIVERS).unwrap();

        let pts = trace.interaction_positions(2, 2).unwrap().unwrap();
        assert_eq!(pts.len(), 3);
        assert_eq!(
            trace.interaction_positions_string(2, 2).unwrap().unwrap(),
            "0 0 10,10 8 4,20 5 1.5"
        );
        assert!(matches!(
            trace.interaction_positions(2, 3),
            Err(RwiError::UnknownRay { receiver: 2, ray: 3 })
        ));
        assert!(matches!(
            trace.interaction_positions(9, 1),
            Err(RwiError::UnknownReceiver(9))
        ));
    }

    #[test]
    fn test_degrees_are_converted() {
        let text = "1\n1 1\n-80 1e-7 0\n1 0 -80 1e-7 90 180 45 -90\nTx-Rx\n0 0 0\n1 1 1\n";
        let parser = PathsParser::new(ParserConfig::default().with_angle_unit(AngleUnit::Degrees));
        let trace = parse_reader(&parser, NAME, Cursor::new(text)).unwrap();

        let arr = trace.arrival_angles(1).unwrap().unwrap();
        let dep = trace.departure_angles(1).unwrap().unwrap();
        let pi = std::f64::consts::PI;

        assert!((arr[[0, 0]] - pi / 2.0).abs() < 1e-12);
        assert!((arr[[0, 1]] - pi).abs() < 1e-12);
        assert!((dep[[0, 0]] - pi / 4.0).abs() < 1e-12);
        assert!((dep[[0, 1]] + pi / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_custom_direct_path_label() {
        let text = "1\n1 2\n-80 1e-7 0\n1 0 -80 1e-7 0 0 0 0\nLOS\n0 0 0\n1 1 1\n\
                    2 0 -90 1e-7 0 0 0 0\nTx-Rx\n0 0 0\n1 1 1\n";
        let trace = parse(text).unwrap();

        assert_eq!(trace.is_los_with(1, "LOS").unwrap(), Some(vec![true, false]));
        assert_eq!(trace.is_los(1).unwrap(), Some(vec![false, true]));
        assert!(matches!(
            trace.is_los_with(4, "LOS"),
            Err(RwiError::UnknownReceiver(4))
        ));
    }

    #[test]
    fn test_non_integral_ray_fields() {
        let text = "1\n1 1\n-80 1e-7 0\n1.5 0 -80 1e-7 0 0 0 0\nTx-Rx\n0 0 0\n1 1 1\n";
        assert!(matches!(parse(text), Err(RwiError::Format { line: 4, .. })));

        let text = "1\n1 1\n-80 1e-7 0\n1 0.5 -80 1e-7 0 0 0 0\nTx-Rx\n0 0 0\n1 1 1\n";
        assert!(matches!(parse(text), Err(RwiError::Format { line: 4, .. })));
    }

    #[test]
    fn test_integral_floats_accepted() {
        let text = "1\n1 1\n-80 1e-7 0\n1.0 0.0 -80 1e-7 0 0 0 0\nTx-Rx\n0 0 0\n1 1 1\n";
        let trace = parse(text).unwrap();
        assert_eq!(trace.paths_number(1).unwrap(), Some(1));
    }

    #[test]
    fn test_invalid_utf8_in_ray_line() {
        let bytes = b"1\n1 1\n-80 1e-7 0\n1 0 -8\xff0 1e-7 0 0 0 0\nTx-Rx\n0 0 0\n1 1 1\n";
        let err = parse_reader(&PathsParser::default(), NAME, Cursor::new(&bytes[..])).unwrap_err();

        assert!(matches!(err, RwiError::Format { line: 4, .. }));
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_ray_out_of_order() {
        let text = "1\n1 1\n-80 1e-7 0\n2 0 -80 1e-7 0 0 0 0\nTx-Rx\n0 0 0\n1 1 1\n";
        assert!(matches!(parse(text), Err(RwiError::Format { .. })));
    }

    #[test]
    fn test_truncated_inside_interactions() {
        let text = "1\n1 1\n-80 1e-7 0\n1 1 -80 1e-7 0 0 0 0\nTx-R-Rx\n0 0 0\n1 1 1\n";
        assert!(matches!(parse(text), Err(RwiError::Truncated { line: 7 })));
    }

    #[test]
    fn test_comments_between_rays() {
        let text = "\
1
# rx
3 1
  # summary follows
-80 1e-7 0
1 0 -80 1e-7 0 0 0 0
# tags
Tx-Rx
0 0 0
# end point
1 1 1
";
        let trace = parse(text).unwrap();
        assert_eq!(trace.receiver_indices(), vec![3]);
        assert_eq!(
            trace.interaction_positions_string(3, 1).unwrap().unwrap(),
            "0 0 0,1 1 1"
        );
    }
}
