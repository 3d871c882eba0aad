//! Weather conditions rolled at the end of every day
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rng::RandomSource;

/// Weather conditions that drive the base customer count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Weather {
    Sunny,
    Cloudy,
    #[default]
    Rainy,
}

pub const WEATHER_ORDER: [Weather; 3] = [Weather::Sunny, Weather::Cloudy, Weather::Rainy];

impl Weather {
    /// Map a uniform draw in `[0, 1)` onto the three conditions with equal odds.
    #[must_use]
    pub fn from_unit(unit: f64) -> Self {
        let unit = if unit.is_finite() {
            unit.clamp(0.0, 0.999_999)
        } else {
            0.0
        };
        if unit < 1.0 / 3.0 {
            Self::Sunny
        } else if unit < 2.0 / 3.0 {
            Self::Cloudy
        } else {
            Self::Rainy
        }
    }

    /// Draw tomorrow's weather from the weather stream.
    pub fn roll<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        Self::from_unit(rng.weather_unit())
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::Cloudy => "Cloudy",
            Self::Rainy => "Rainy",
        }
    }

    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Sunny => "☀️",
            Self::Cloudy => "☁️",
            Self::Rainy => "🌧️",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
