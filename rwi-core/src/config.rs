use rwi_types::AngleUnit;
use serde::{Deserialize, Serialize};

/// Настройки разбора .p2m файлов.
///
/// Разобранные данные не зависят от метки прямого луча, её передают в
/// `is_los_with` при запросе.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// В каких единицах записаны углы лучей во входном файле. После разбора
    /// углы всегда хранятся в радианах.
    pub angle_unit: AngleUnit,
}

impl ParserConfig {
    pub fn with_angle_unit(
        mut self,
        unit: AngleUnit,
    ) -> Self {
        self.angle_unit = unit;
        self
    }
}
