use serde::{Deserialize, Serialize};

use crate::{AnglePair, Position};

/// Метка прямого луча (без отражений и дифракций).
pub const DIRECT_PATH_LABEL: &str = "Tx-Rx";

/// Разделитель меток взаимодействий в строке луча.
pub const INTERACTION_SEPARATOR: char = '-';

/// Один луч между передатчиком и приёмником.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RayPath {
    /// Номер луча внутри приёмника (с 1)
    pub index: u32,
    /// Число взаимодействий (отражений, дифракций, прохождений)
    pub interaction_count: usize,
    /// Принятая мощность луча, дБ
    pub gain_db: f64,
    /// Время прихода, с
    pub arrival_time: f64,
    /// Углы прихода, рад
    pub arrival: AnglePair,
    /// Углы выхода, рад
    pub departure: AnglePair,
    /// Метки взаимодействий через `-`, например `Tx-R-D-Rx`
    pub interactions: String,
    /// Точки взаимодействий вместе с передатчиком и приёмником
    /// (`interaction_count + 2` точки)
    pub positions: Vec<Position>,
}

/// Агрегированные данные приёмника, до которого дошёл хотя бы один луч.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverPaths {
    /// Номер приёмника (с 1)
    pub index: u32,
    /// Суммарная принятая мощность, дБ
    pub received_power: f64,
    /// Среднее время прихода, с
    pub arrival_time: f64,
    /// Разброс задержек, с
    pub delay_spread: f64,
    /// Лучи в порядке файла
    pub rays: Vec<RayPath>,
}

impl RayPath {
    /// Отдельные метки взаимодействий.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.interactions.split(INTERACTION_SEPARATOR)
    }

    /// Прямая видимость: метка совпадает с `label` целиком.
    pub fn is_los_with(
        &self,
        label: &str,
    ) -> bool {
        self.interactions == label
    }

    pub fn is_los(&self) -> bool {
        self.is_los_with(DIRECT_PATH_LABEL)
    }

    /// Строковое представление точек: `x y z,x y z,...`.
    pub fn positions_string(&self) -> String {
        self.positions
            .iter()
            .map(Position::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Геометрическая длина луча, м: сумма отрезков между соседними точками.
    pub fn length(&self) -> f64 {
        self.positions
            .windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum()
    }

    /// Строка луча в каноническом порядке
    /// `[gain_db, arrival_time, dep_elev, dep_azim, arr_elev, arr_azim]`.
    pub fn table_row(&self) -> [f64; 6] {
        [
            self.gain_db,
            self.arrival_time,
            self.departure.elevation,
            self.departure.azimuth,
            self.arrival.elevation,
            self.arrival.azimuth,
        ]
    }
}

impl ReceiverPaths {
    pub fn paths_number(&self) -> usize {
        self.rays.len()
    }

    /// Луч по номеру (с 1).
    pub fn ray(
        &self,
        index: u32,
    ) -> Option<&RayPath> {
        let i = usize::try_from(index).ok()?.checked_sub(1)?;
        self.rays.get(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray(interactions: &str) -> RayPath {
        RayPath {
            index: 1,
            interaction_count: interactions.split('-').count().saturating_sub(2),
            gain_db: -90.5,
            arrival_time: 1.5e-7,
            arrival: AnglePair::new(1.2, 0.3),
            departure: AnglePair::new(1.9, -2.1),
            interactions: interactions.to_string(),
            positions: vec![
                Position::new(0.0, 0.0, 10.0),
                Position::new(5.0, 2.5, 1.5),
            ],
        }
    }

    #[test]
    fn test_los_is_exact_label_match() {
        assert!(ray("Tx-Rx").is_los());
        assert!(!ray("Tx-R-Rx").is_los());
        assert!(!ray("Tx-Rx ").is_los());
        assert!(ray("LOS").is_los_with("LOS"));
    }

    #[test]
    fn test_tags_and_table_row() {
        let r = ray("Tx-R-D-Rx");
        assert_eq!(r.tags().collect::<Vec<_>>(), ["Tx", "R", "D", "Rx"]);
        assert_eq!(r.table_row(), [-90.5, 1.5e-7, 1.9, -2.1, 1.2, 0.3]);
    }

    #[test]
    fn test_positions_string() {
        assert_eq!(ray("Tx-Rx").positions_string(), "0 0 10,5 2.5 1.5");
    }

    #[test]
    fn test_length_follows_interactions() {
        let mut r = ray("Tx-R-Rx");
        r.positions = vec![
            Position::new(0.0, 0.0, 0.0),
            Position::new(3.0, 4.0, 0.0),
            Position::new(3.0, 4.0, 12.0),
        ];
        assert_eq!(r.length(), 17.0);

        r.positions.clear();
        assert_eq!(r.length(), 0.0);
    }

    #[test]
    fn test_ray_lookup_is_one_based() {
        let rx = ReceiverPaths {
            index: 4,
            received_power: -80.0,
            arrival_time: 1e-7,
            delay_spread: 2e-9,
            rays: vec![ray("Tx-Rx")],
        };

        assert_eq!(rx.paths_number(), 1);
        assert!(rx.ray(0).is_none());
        assert_eq!(rx.ray(1).map(|r| r.index), Some(1));
        assert!(rx.ray(2).is_none());
    }
}
