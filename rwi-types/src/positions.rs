use serde::{Deserialize, Serialize};

use crate::Position;

/// Состояние одного объекта (транспортного средства) на шаге времени.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectState {
    /// Имя объекта
    pub name: String,
    /// Положение, м
    pub position: Position,
    /// Скорость, м/с
    pub velocity: f64,
    /// Ускорение, м/с²
    pub acceleration: f64,
}

/// Шаг времени из файла positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionsFrame {
    /// Метка времени шага
    pub timestamp: i64,
    /// Объекты в порядке файла
    pub objects: Vec<ObjectState>,
}

impl PositionsFrame {
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}
