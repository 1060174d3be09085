use std::collections::BTreeMap;

use rwi_types::ReceiverPaths;
use serde::Serialize;

use crate::{path_gain_linear, ChannelError, ChannelResult};

/// Число секторов по умолчанию.
pub const DEFAULT_NUM_BEAMS: usize = 16;

/// Разбиение лучей на секторы по азимуту.
///
/// Окружность делится на `num_beams` равных секторов, угол места не
/// учитывается.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BeamClusterer {
    num_beams: usize,
}

impl BeamClusterer {
    pub fn new(num_beams: usize) -> ChannelResult<Self> {
        if num_beams == 0 {
            return Err(ChannelError::domain("num_beams must be > 0"));
        }

        Ok(Self { num_beams })
    }

    pub fn num_beams(&self) -> usize {
        self.num_beams
    }

    /// Ширина сектора, градусы.
    pub fn beam_width_deg(&self) -> f64 {
        360.0 / self.num_beams as f64
    }

    /// Номер сектора для азимута в градусах.
    ///
    /// Азимут приводится к `[0, 360)`, так что `-10°` попадает в последний
    /// сектор.
    pub fn beam_index(
        &self,
        azimuth_deg: f64,
    ) -> usize {
        let wrapped = azimuth_deg.rem_euclid(360.0);
        let index = (wrapped / self.beam_width_deg()).floor() as usize;

        // rem_euclid может вернуть ровно 360.0 для малых отрицательных углов
        index.min(self.num_beams - 1)
    }

    /// Номера лучей приёмника по секторам азимута прихода.
    pub fn cluster(
        &self,
        receiver: &ReceiverPaths,
    ) -> BTreeMap<usize, Vec<u32>> {
        let mut beams: BTreeMap<usize, Vec<u32>> = BTreeMap::new();

        for ray in &receiver.rays {
            beams
                .entry(self.beam_index(ray.arrival.azimuth.to_degrees()))
                .or_default()
                .push(ray.index);
        }

        beams
    }

    /// Линейная мощность, пришедшая в каждый сектор.
    pub fn beam_power(
        &self,
        receiver: &ReceiverPaths,
    ) -> Vec<f64> {
        let mut power = vec![0.0; self.num_beams];

        for ray in &receiver.rays {
            power[self.beam_index(ray.arrival.azimuth.to_degrees())] +=
                path_gain_linear(ray.gain_db);
        }

        power
    }
}

impl Default for BeamClusterer {
    fn default() -> Self {
        Self {
            num_beams: DEFAULT_NUM_BEAMS,
        }
    }
}
