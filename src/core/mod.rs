pub mod band_scale;
pub mod dataset;
pub mod projection;
pub mod reconcile;
pub mod scale;
pub mod ticks;
pub mod types;

pub use band_scale::{BandPadding, BandScale};
pub use dataset::{Dataset, GroupedDataset, SeriesSnapshot, percentage, round1};
pub use projection::MercatorProjection;
pub use reconcile::{Reconciliation, reconcile};
pub use scale::{LinearScale, SqrtScale};
pub use ticks::{Ticks, nice_ticks};
pub use types::{BarSeries, Item, ItemKey, MapCountry, Record, Viewport};
