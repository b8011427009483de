//! Slot value validation
//!
//! Range checks live here, before anything reaches the player API or the
//! device resolver.

/// Highest device number the skill accepts
pub const MAX_DEVICE_NUMBER: u32 = 10;

/// Outcome of validating a numeric slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberSlot<T> {
    /// Slot missing or blank
    Missing,
    /// Slot present but not an integer
    NotANumber,
    /// Integer outside the accepted range
    OutOfRange,
    Valid(T),
}

/// Which volume intent a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeScale {
    /// 0 to 10, sent as tens of percent
    Level,
    /// 0 to 100 percent
    Percent,
}

impl VolumeScale {
    const fn max(self) -> i64 {
        match self {
            Self::Level => 10,
            Self::Percent => 100,
        }
    }

    const fn multiplier(self) -> u8 {
        match self {
            Self::Level => 10,
            Self::Percent => 1,
        }
    }

    /// "Try setting…" guidance for this scale
    #[must_use]
    pub const fn try_message(self) -> &'static str {
        match self {
            Self::Level => "Try setting a volume between 0 and 10",
            Self::Percent => "Try setting a volume percent between 0 and 100",
        }
    }

    /// Out-of-range guidance for this scale
    #[must_use]
    pub const fn range_message(self) -> &'static str {
        match self {
            Self::Level => "You can only set the volume between 0 and 10",
            Self::Percent => "You can only set the volume percent between 0 and 100",
        }
    }

    /// Parse a slot value into a volume percentage
    #[must_use]
    pub fn parse(self, value: Option<&str>) -> NumberSlot<u8> {
        match parse_integer(value) {
            NumberSlot::Valid(v) if (0..=self.max()).contains(&v) => {
                // Range checked above, so the cast cannot truncate
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let v = v as u8;
                NumberSlot::Valid(v * self.multiplier())
            }
            NumberSlot::Valid(_) => NumberSlot::OutOfRange,
            NumberSlot::Missing => NumberSlot::Missing,
            NumberSlot::NotANumber | NumberSlot::OutOfRange => NumberSlot::NotANumber,
        }
    }
}

/// Parse a spoken device number, accepting 0 through [`MAX_DEVICE_NUMBER`]
#[must_use]
pub fn parse_device_number(value: Option<&str>) -> NumberSlot<u32> {
    match parse_integer(value) {
        NumberSlot::Valid(v) => u32::try_from(v)
            .ok()
            .filter(|n| *n <= MAX_DEVICE_NUMBER)
            .map_or(NumberSlot::OutOfRange, NumberSlot::Valid),
        NumberSlot::Missing => NumberSlot::Missing,
        NumberSlot::NotANumber | NumberSlot::OutOfRange => NumberSlot::NotANumber,
    }
}

fn parse_integer(value: Option<&str>) -> NumberSlot<i64> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return NumberSlot::Missing;
    };

    if let Ok(v) = value.parse::<i64>() {
        return NumberSlot::Valid(v);
    }

    // Recognizers sometimes deliver whole numbers as "2.0"
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract().abs() < f64::EPSILON && v.abs() < 1e15 => {
            #[allow(clippy::cast_possible_truncation)]
            let v = v as i64;
            NumberSlot::Valid(v)
        }
        _ => NumberSlot::NotANumber,
    }
}
