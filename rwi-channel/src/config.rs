use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{ChannelError, ChannelResult};

/// Скорость света, м/с.
pub const SPEED_OF_LIGHT: f64 = 3.0e8;

/// Несущая по умолчанию: 60 ГГц.
pub const DEFAULT_FREQUENCY_HZ: f64 = 60.0e9;

/// Антенн по каждой оси по умолчанию (решётка 4×4).
pub const DEFAULT_ANTENNA_COUNT: usize = 4;

/// Параметры антенной решётки для синтеза канала.
///
/// Решётка квадратная планарная: `antenna_count × antenna_count` элементов с
/// шагом в половину длины волны.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Антенн по каждой оси
    pub antenna_count: usize,
    /// Несущая частота, Гц
    pub frequency_hz: f64,
}

impl ChannelConfig {
    pub fn new(
        antenna_count: usize,
        frequency_hz: f64,
    ) -> Self {
        Self {
            antenna_count,
            frequency_hz,
        }
    }

    pub fn validate(&self) -> ChannelResult<()> {
        if self.antenna_count == 0 {
            return Err(ChannelError::domain("antenna_count must be > 0"));
        }

        if !(self.frequency_hz.is_finite() && self.frequency_hz > 0.0) {
            return Err(ChannelError::domain(format!(
                "frequency must be > 0, got {}",
                self.frequency_hz
            )));
        }

        Ok(())
    }

    /// Число элементов решётки `N = antenna_count²`.
    pub fn array_size(&self) -> usize {
        self.antenna_count * self.antenna_count
    }

    /// Длина волны, м.
    pub fn wavelength(&self) -> f64 {
        SPEED_OF_LIGHT / self.frequency_hz
    }

    /// Волновое число `2π/λ`.
    pub fn wavenumber(&self) -> f64 {
        2.0 * PI / self.wavelength()
    }

    /// Шаг элементов, м (`λ/2`).
    pub fn element_spacing(&self) -> f64 {
        self.wavelength() / 2.0
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ANTENNA_COUNT, DEFAULT_FREQUENCY_HZ)
    }
}
