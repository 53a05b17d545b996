//! Seeded synthetic price histories
//!
//! Geometric random walks on a Monday-to-Friday calendar, used for the demo
//! command, tests and benchmarks. The same seed always yields the same
//! prices.

use jiff::civil::Date;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::analysis::RawFrames;
use crate::date_math;
use crate::error::ConfigError;
use crate::model::{Pair, RawPriceFrame};
use crate::summary::TRADING_DAYS_PER_YEAR;

/// Geometric random walk with annualized drift and volatility
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomWalk {
    pub start_price: f64,
    /// Expected annual log growth before the volatility correction
    pub drift: f64,
    /// Annualized standard deviation of log returns
    pub volatility: f64,
}

impl RandomWalk {
    /// Broad-market index proxy
    pub const BROAD_MARKET: Self = Self {
        start_price: 100.0,
        drift: 0.08,
        volatility: 0.16,
    };

    /// Higher-beta growth index proxy
    pub const GROWTH: Self = Self {
        start_price: 100.0,
        drift: 0.11,
        volatility: 0.24,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.start_price.is_finite() && self.start_price > 0.0) {
            return Err(ConfigError::InvalidSynthetic {
                parameter: "start price",
                value: self.start_price,
            });
        }
        if !self.drift.is_finite() {
            return Err(ConfigError::InvalidSynthetic {
                parameter: "drift",
                value: self.drift,
            });
        }
        if !(self.volatility.is_finite() && self.volatility >= 0.0) {
            return Err(ConfigError::InvalidSynthetic {
                parameter: "volatility",
                value: self.volatility,
            });
        }
        Ok(())
    }

    #[inline]
    fn step(&self, shock: f64) -> f64 {
        let dt = 1.0 / TRADING_DAYS_PER_YEAR;
        ((self.drift - 0.5 * self.volatility * self.volatility) * dt
            + self.volatility * dt.sqrt() * shock)
            .exp()
    }
}

/// `n` consecutive weekdays, starting at `start` if it is one
#[must_use]
pub fn business_days(start: Date, n: usize) -> Vec<Date> {
    let mut dates = Vec::with_capacity(n);
    let mut current = if date_math::is_weekend(start) {
        date_math::next_weekday(start)
    } else {
        start
    };
    for _ in 0..n {
        dates.push(current);
        current = date_math::next_weekday(current);
    }
    dates
}

/// Two correlated random walks on a shared weekday calendar.
///
/// Returns the dates and the benchmark and growth price paths.
pub fn correlated_pair(
    seed: u64,
    start: Date,
    days: usize,
    benchmark: &RandomWalk,
    growth: &RandomWalk,
    correlation: f64,
) -> Result<(Vec<Date>, Vec<f64>, Vec<f64>), ConfigError> {
    benchmark.validate()?;
    growth.validate()?;
    if !(-1.0..=1.0).contains(&correlation) {
        return Err(ConfigError::InvalidSynthetic {
            parameter: "correlation",
            value: correlation,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let idiosyncratic = (1.0 - correlation * correlation).sqrt();

    let dates = business_days(start, days);
    let mut a = Vec::with_capacity(days);
    let mut b = Vec::with_capacity(days);
    let (mut pa, mut pb) = (benchmark.start_price, growth.start_price);
    for _ in 0..days {
        a.push(pa);
        b.push(pb);
        let z1: f64 = rng.sample(StandardNormal);
        let z2: f64 = rng.sample(StandardNormal);
        pa *= benchmark.step(z1);
        pb *= growth.step(correlation * z1 + idiosyncratic * z2);
    }
    Ok((dates, a, b))
}

/// Raw frames for the default pair, ready for `analyze`
pub fn demo_frames(seed: u64, days: usize) -> Result<RawFrames, ConfigError> {
    let pair = Pair::default();
    let (dates, a, b) = correlated_pair(
        seed,
        jiff::civil::date(2010, 1, 4),
        days,
        &RandomWalk::BROAD_MARKET,
        &RandomWalk::GROWTH,
        0.85,
    )?;

    let mut frames = RawFrames::default();
    frames.insert(pair.benchmark, RawPriceFrame::from_closes(&dates, &a));
    frames.insert(pair.growth, RawPriceFrame::from_closes(&dates, &b));
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn test_business_days_skip_weekends() {
        // 2024-01-06 is a Saturday
        let days = business_days(date(2024, 1, 6), 6);
        assert_eq!(days[0], date(2024, 1, 8));
        assert_eq!(days[5], date(2024, 1, 15));
        assert!(days.iter().all(|d| !date_math::is_weekend(*d)));
    }

    #[test]
    fn test_same_seed_same_prices() {
        let run = |seed| {
            correlated_pair(
                seed,
                date(2020, 1, 1),
                50,
                &RandomWalk::BROAD_MARKET,
                &RandomWalk::GROWTH,
                0.9,
            )
            .unwrap()
        };
        assert_eq!(run(7), run(7));
        assert_ne!(run(7).1, run(8).1);
    }

    #[test]
    fn test_prices_stay_positive() {
        let (_, a, b) = correlated_pair(
            1,
            date(2020, 1, 1),
            2_000,
            &RandomWalk::BROAD_MARKET,
            &RandomWalk::GROWTH,
            0.5,
        )
        .unwrap();
        assert!(a.iter().chain(&b).all(|p| p.is_finite() && *p > 0.0));
        assert_eq!(a[0], 100.0);
    }

    #[test]
    fn test_invalid_parameters() {
        let bad = RandomWalk {
            volatility: -0.1,
            ..RandomWalk::BROAD_MARKET
        };
        assert!(bad.validate().is_err());
        assert!(
            correlated_pair(
                1,
                date(2020, 1, 1),
                10,
                &RandomWalk::BROAD_MARKET,
                &RandomWalk::GROWTH,
                1.5
            )
            .is_err()
        );
    }
}
