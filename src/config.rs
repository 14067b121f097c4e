use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest accepted liquid or gas dispersion.
pub const MAX_DISPERSION: u32 = 64;

/// Horizontal scan direction policy within a row.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanOrder {
    /// Left-to-right on even ticks, right-to-left on odd ticks.
    #[default]
    Alternating,
    /// Independent coin flip per row.
    RandomPerRow,
}

/// Tuning knobs for element behaviours.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Furthest lateral distance a liquid slides in one tick.
    pub liquid_dispersion: u32,
    /// Furthest lateral distance a gas slides in one tick.
    pub gas_dispersion: u32,
    /// Percent chance a gas tries to rise straight up first.
    pub gas_rise_chance: u8,
    /// Percent chance a blocked gas tries to settle downwards.
    pub gas_settle_chance: u8,
    pub scan_order: ScanOrder,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            liquid_dispersion: 4,
            gas_dispersion: 4,
            gas_rise_chance: 60,
            gas_settle_chance: 10,
            scan_order: ScanOrder::Alternating,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("liquid_dispersion", self.liquid_dispersion),
            ("gas_dispersion", self.gas_dispersion),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroDispersion { field });
            }
            if value > MAX_DISPERSION {
                return Err(ConfigError::DispersionTooLarge {
                    field,
                    value,
                    max: MAX_DISPERSION,
                });
            }
        }
        for (field, value) in [
            ("gas_rise_chance", self.gas_rise_chance),
            ("gas_settle_chance", self.gas_settle_chance),
        ] {
            if value > 100 {
                return Err(ConfigError::ChanceOutOfRange { field, value });
            }
        }
        // Rise and settle share one roll: rise below, settle in the top band.
        if self.gas_rise_chance as u16 + self.gas_settle_chance as u16 > 100 {
            return Err(ConfigError::OverlappingGasChances {
                rise: self.gas_rise_chance,
                settle: self.gas_settle_chance,
            });
        }
        Ok(())
    }

    pub(crate) fn gas_settle_threshold(&self) -> u8 {
        100 - self.gas_settle_chance
    }
}
