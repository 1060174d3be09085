//! Синтез эффективного канала: накопление лучей и проекция на кодовые книги.

use log::trace;
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use num_complex::Complex64;
use rwi_types::{AnglePair, ReceiverPaths};

use crate::{steering_vector, ChannelConfig, ChannelError, ChannelResult, Codebook};

/// Столбцов в матрице углов: `[elevation, azimuth]`.
pub const ANGLE_COLUMNS: usize = 2;

/// Синтезатор канала для фиксированной решётки.
///
/// Кодовые книги передатчика и приёмника строятся один раз в конструкторе и
/// дальше только читаются, поэтому один синтезатор можно разделять между
/// потоками.
#[derive(Debug, Clone)]
pub struct ChannelSynthesizer {
    config: ChannelConfig,
    transmit: Codebook,
    receive: Codebook,
}

impl ChannelSynthesizer {
    pub fn new(config: ChannelConfig) -> ChannelResult<Self> {
        config.validate()?;

        let n = config.array_size();

        Ok(Self {
            config,
            transmit: Codebook::dft(n),
            receive: Codebook::dft(n),
        })
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn transmit_codebook(&self) -> &Codebook {
        &self.transmit
    }

    pub fn receive_codebook(&self) -> &Codebook {
        &self.receive
    }

    /// Сырая канальная матрица `H` размера `N × N`.
    ///
    /// Для каждого луча `H += 10^(g/10) · conj(a_dep)ᵀ · a_arr`. Углы в
    /// радианах, столбцы `[elevation, azimuth]`.
    pub fn raw_channel(
        &self,
        departure: ArrayView2<f64>,
        arrival: ArrayView2<f64>,
        gains_db: ArrayView1<f64>,
    ) -> ChannelResult<Array2<Complex64>> {
        check_inputs(departure, arrival, gains_db)?;

        let n = self.config.array_size();
        let mut h = Array2::<Complex64>::zeros((n, n));

        trace!("accumulating {} rays into {n}x{n} channel", gains_db.len());

        for ((dep, arr), &gain_db) in departure
            .axis_iter(Axis(0))
            .zip(arrival.axis_iter(Axis(0)))
            .zip(gains_db.iter())
        {
            let gain = Complex64::from(path_gain_linear(gain_db));
            let dep_vec = steering_vector(AnglePair::new(dep[0], dep[1]), &self.config);
            let arr_vec = steering_vector(AnglePair::new(arr[0], arr[1]), &self.config);

            accumulate_outer(&mut h, gain, &dep_vec, &arr_vec);
        }

        Ok(h)
    }

    /// Проекция `Wtᴴ · H · Wr`.
    pub fn project(
        &self,
        h: &Array2<Complex64>,
    ) -> ChannelResult<Array2<Complex64>> {
        let n = self.config.array_size();

        if h.nrows() != n {
            return Err(ChannelError::Shape {
                what: "channel matrix rows",
                expected: n,
                found: h.nrows(),
            });
        }
        if h.ncols() != n {
            return Err(ChannelError::Shape {
                what: "channel matrix columns",
                expected: n,
                found: h.ncols(),
            });
        }

        Ok(self
            .transmit
            .hermitian()
            .dot(h)
            .dot(self.receive.matrix()))
    }

    /// Эффективный канал по углам и усилениям лучей.
    pub fn effective_channel(
        &self,
        departure: ArrayView2<f64>,
        arrival: ArrayView2<f64>,
        gains_db: ArrayView1<f64>,
    ) -> ChannelResult<Array2<Complex64>> {
        let h = self.raw_channel(departure, arrival, gains_db)?;
        self.project(&h)
    }

    /// Эффективный канал приёмника из разобранного файла лучей.
    pub fn receiver_channel(
        &self,
        receiver: &ReceiverPaths,
    ) -> ChannelResult<Array2<Complex64>> {
        let (departure, arrival, gains) = ray_inputs(receiver);
        self.effective_channel(departure.view(), arrival.view(), gains.view())
    }
}

/// Эффективный канал одной линии связи. Кодовые книги строятся заново.
pub fn synthesize(
    departure: ArrayView2<f64>,
    arrival: ArrayView2<f64>,
    gains_db: ArrayView1<f64>,
    config: &ChannelConfig,
) -> ChannelResult<Array2<Complex64>> {
    ChannelSynthesizer::new(*config)?.effective_channel(departure, arrival, gains_db)
}

pub fn synthesize_receiver(
    receiver: &ReceiverPaths,
    config: &ChannelConfig,
) -> ChannelResult<Array2<Complex64>> {
    ChannelSynthesizer::new(*config)?.receiver_channel(receiver)
}

/// Суммарная мощность канала `Σ|h|²` в дБ; для нулевой матрицы `-inf`.
pub fn effective_gain_db(matrix: &Array2<Complex64>) -> f64 {
    let power: f64 = matrix.iter().map(|h| h.norm_sqr()).sum();
    10.0 * power.log10()
}

/// `10^(g/10)`
pub fn path_gain_linear(gain_db: f64) -> f64 {
    10f64.powf(gain_db / 10.0)
}

fn check_inputs(
    departure: ArrayView2<f64>,
    arrival: ArrayView2<f64>,
    gains_db: ArrayView1<f64>,
) -> ChannelResult<()> {
    let rays = gains_db.len();

    for (what, angles) in [("departure angles", departure.view()), ("arrival angles", arrival.view())] {
        if angles.ncols() != ANGLE_COLUMNS {
            return Err(ChannelError::Shape {
                what,
                expected: ANGLE_COLUMNS,
                found: angles.ncols(),
            });
        }
        if angles.nrows() != rays {
            return Err(ChannelError::Shape {
                what,
                expected: rays,
                found: angles.nrows(),
            });
        }
    }

    Ok(())
}

/// `h[r, c] += g · conj(dep[r]) · arr[c]`
fn accumulate_outer(
    h: &mut Array2<Complex64>,
    gain: Complex64,
    dep: &Array1<Complex64>,
    arr: &Array1<Complex64>,
) {
    for (mut row, d) in h.axis_iter_mut(Axis(0)).zip(dep.iter()) {
        row.scaled_add(gain * d.conj(), arr);
    }
}

/// Углы выхода, прихода и усиления из канонической таблицы лучей.
fn ray_inputs(receiver: &ReceiverPaths) -> (Array2<f64>, Array2<f64>, Array1<f64>) {
    let table = rwi_core::ray_table(receiver);

    (
        table.slice(s![.., 2..4]).to_owned(),
        table.slice(s![.., 4..6]).to_owned(),
        table.column(0).to_owned(),
    )
}
