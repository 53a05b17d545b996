mod ids;
mod period;
mod raw;
mod regime;
mod series;
mod table;
mod weights;

pub use ids::{InstrumentId, Pair};
pub use period::{Period, PeriodAggregation};
pub use raw::{ExcludedInstrument, ExclusionReason, PriceColumn, RawPriceFrame, RawTimestamp};
pub use regime::{MomentumSeries, Regime, RegimeCounts, RegimeTable, Thresholds};
pub use series::{PriceSeries, ReturnSeries, ValueSeries};
pub use table::AlignedTable;
pub use weights::{RegimeWeights, WEIGHT_SUM_TOLERANCE, WeightPair, WeightSchedule};
