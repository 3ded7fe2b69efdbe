//! PLA enumerations and automation scalars (MS-PLA 2.2.2, MS-OAUT 2.2.27)

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use pla_ndr::{ndr_enum, NdrDecode, NdrEncode, NdrEnum, NdrReader, NdrWriter, Result};

ndr_enum! {
    /// Running state of a data collector set
    pub enum DataCollectorSetStatus {
        /// Not running
        Stopped = 0,
        /// Running
        Running = 1,
        /// Compiling collected data
        Compiling = 2,
        /// Start or stop is in progress
        Pending = 3,
        /// State cannot be determined
        Undefined = 4,
    }
}

/// Subdirectory and file name decoration (AutoPathFormat)
///
/// A flag set; values outside the named flags are carried through as they
/// came off the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AutoPathFormat(pub u16);

impl AutoPathFormat {
    pub const NONE: Self = Self(0x0000);
    pub const PATTERN: Self = Self(0x0001);
    pub const COMPUTER: Self = Self(0x0002);
    pub const MONTH_DAY_HOUR: Self = Self(0x0100);
    pub const SERIAL_NUMBER: Self = Self(0x0200);
    pub const YEAR_DAY_OF_YEAR: Self = Self(0x0400);
    pub const YEAR_MONTH: Self = Self(0x0800);
    pub const YEAR_MONTH_DAY: Self = Self(0x1000);
    pub const YEAR_MONTH_DAY_HOUR: Self = Self(0x2000);
    pub const MONTH_DAY_HOUR_MINUTE: Self = Self(0x4000);

    const NAMES: [(Self, &'static str); 9] = [
        (Self::PATTERN, "Pattern"),
        (Self::COMPUTER, "Computer"),
        (Self::MONTH_DAY_HOUR, "MonthDayHour"),
        (Self::SERIAL_NUMBER, "SerialNumber"),
        (Self::YEAR_DAY_OF_YEAR, "YearDayOfYear"),
        (Self::YEAR_MONTH, "YearMonth"),
        (Self::YEAR_MONTH_DAY, "YearMonthDay"),
        (Self::YEAR_MONTH_DAY_HOUR, "YearMonthDayHour"),
        (Self::MONTH_DAY_HOUR_MINUTE, "MonthDayHourMinute"),
    ];

    /// Raw flag bits
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Whether every bit of `other` is set
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for AutoPathFormat {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for AutoPathFormat {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for AutoPathFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("AutoPathFormat(None)");
        }
        let mut rest = self.0;
        f.write_str("AutoPathFormat(")?;
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                rest &= !flag.0;
                first = false;
            }
        }
        if rest != 0 {
            if !first {
                f.write_str(" | ")?;
            }
            write!(f, "0x{rest:04x}")?;
        }
        f.write_str(")")
    }
}

impl NdrEnum for AutoPathFormat {
    fn to_wire(self) -> u16 {
        self.0
    }

    fn from_wire(value: u16) -> Result<Self> {
        Ok(Self(value))
    }
}

impl NdrEncode for AutoPathFormat {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        w.write_enum(*self);
        Ok(())
    }

    fn ndr_align() -> usize {
        2
    }
}

impl NdrDecode for AutoPathFormat {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        *self = r.read_enum()?;
        Ok(())
    }

    fn ndr_align() -> usize {
        2
    }
}

/// Automation boolean (VARIANT_BOOL)
///
/// `-1` is true and `0` is false. Any other value read from the wire is
/// kept and treated as true.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct VariantBool(pub i16);

impl VariantBool {
    pub const TRUE: Self = Self(-1);
    pub const FALSE: Self = Self(0);

    /// Whether the value is non-zero
    pub fn as_bool(self) -> bool {
        self.0 != 0
    }
}

impl From<bool> for VariantBool {
    fn from(value: bool) -> Self {
        if value {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }
}

impl From<VariantBool> for bool {
    fn from(value: VariantBool) -> Self {
        value.as_bool()
    }
}

impl NdrEncode for VariantBool {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        w.write_data(self.0);
        Ok(())
    }

    fn ndr_align() -> usize {
        2
    }
}

impl NdrDecode for VariantBool {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        self.0 = r.read_data()?;
        Ok(())
    }

    fn ndr_align() -> usize {
        2
    }
}
