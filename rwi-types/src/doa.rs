use serde::{Deserialize, Serialize};

/// Направление прихода одного луча из устаревшего файла doa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoaPath {
    /// Номер луча (с 1)
    pub index: u32,
    /// Компоненты направления в порядке файла
    pub direction: Vec<f64>,
}

/// Все направления прихода для одного приёмника.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoaReceiver {
    pub index: u32,
    pub paths: Vec<DoaPath>,
}

impl DoaReceiver {
    pub fn paths_number(&self) -> usize {
        self.paths.len()
    }

    /// Наибольшая длина вектора направления среди лучей.
    pub fn direction_width(&self) -> usize {
        self.paths
            .iter()
            .map(|p| p.direction.len())
            .max()
            .unwrap_or(0)
    }
}
