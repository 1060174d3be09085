//! Синтез эффективного MIMO-канала по лучам трассировки.
//!
//! Для каждой пары углов выхода и прихода строятся векторы направленности
//! квадратной решётки, лучи суммируются в сырую матрицу `H` с весами
//! `10^(g/10)`, затем `H` проецируется на DFT-кодовые книги:
//! `Wtᴴ · H · Wr`.
//!
//! ```
//! use ndarray::array;
//! use rwi_channel::{synthesize, ChannelConfig};
//!
//! let departure = array![[0.3, 1.2]];
//! let arrival = array![[1.1, -0.4]];
//! let gains_db = array![-72.5];
//!
//! let channel = synthesize(
//!     departure.view(),
//!     arrival.view(),
//!     gains_db.view(),
//!     &ChannelConfig::default(),
//! )?;
//! assert_eq!(channel.dim(), (16, 16));
//! # Ok::<(), rwi_channel::ChannelError>(())
//! ```

pub mod beam;
pub mod codebook;
pub mod config;
pub mod error;
pub mod steering;
pub mod synth;

pub use beam::*;
pub use codebook::*;
pub use config::*;
pub use error::*;
pub use steering::*;
pub use synth::*;
