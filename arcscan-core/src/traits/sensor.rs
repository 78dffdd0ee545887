//! Range sensor types
//!
//! The TOF driver reports distances as a signed millimetre value where `-1`
//! marks a failed reading. [`RangeReading`] lifts that sentinel into a type.

/// Sentinel distance reported for a failed reading
pub const FAILED_READING: i16 = -1;

/// Errors that can occur talking to the range sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed
    Bus,
    /// Device did not answer with the expected model id
    NotFound,
    /// Firmware did not finish booting in time
    BootTimeout,
    /// A measurement never became ready
    Timeout,
    /// Ranging could not be started
    StartFailed,
    /// Requested setting is not available in the current mode
    Unsupported,
}

/// Ranging distance mode
///
/// Short mode trades range (about 1.3 m) for better ambient light immunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DistanceMode {
    Short,
    /// Up to about 4 m in the dark, the power-on mode
    #[default]
    Long,
}

/// One polled distance reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangeReading {
    /// Distance in millimetres
    Distance(i16),
    /// The sensor returned the failure sentinel
    Failed,
}

impl RangeReading {
    /// Interpret a raw signed distance, mapping the sentinel to `Failed`
    pub fn from_raw(raw: i16) -> Self {
        if raw == FAILED_READING {
            RangeReading::Failed
        } else {
            RangeReading::Distance(raw)
        }
    }

    /// Distance in millimetres, if the reading succeeded
    pub fn distance_mm(self) -> Option<i16> {
        match self {
            RangeReading::Distance(d) => Some(d),
            RangeReading::Failed => None,
        }
    }

    /// True if the reading succeeded and lies within `[min, max]`
    pub fn within(self, min: u16, max: u16) -> bool {
        match self {
            RangeReading::Distance(d) if d >= 0 => {
                let d = d as u16;
                d >= min && d <= max
            }
            _ => false,
        }
    }
}

impl From<Result<u16, SensorError>> for RangeReading {
    fn from(result: Result<u16, SensorError>) -> Self {
        match result {
            Ok(mm) => RangeReading::Distance(mm.min(i16::MAX as u16) as i16),
            Err(_) => RangeReading::Failed,
        }
    }
}
