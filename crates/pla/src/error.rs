//! PLA error types

use std::fmt;

use pla_ndr::NdrError;
use thiserror::Error;

/// Result type for PLA operations
pub type Result<T> = std::result::Result<T, PlaError>;

/// Errors surfaced by the IDataCollectorSet binding
#[derive(Error, Debug)]
pub enum PlaError {
    /// Marshalling or unmarshalling failed
    #[error("NDR error: {0}")]
    Ndr(#[from] NdrError),

    /// The server answered with a failure HRESULT
    #[error("call failed: {0}")]
    Status(Hresult),

    /// The transport could not deliver the call
    #[error("transport error: {0}")]
    Transport(String),

    /// No operation is bound to this opnum
    #[error("unknown operation number {0}")]
    UnknownOperation(u16),
}

impl PlaError {
    /// HRESULT carried by a `Status` error
    pub fn hresult(&self) -> Option<Hresult> {
        match self {
            PlaError::Status(h) => Some(*h),
            _ => None,
        }
    }
}

/// HRESULT codes used by DCOM and the PLA service
pub mod hresult {
    use super::Hresult;

    /// Operation successful
    pub const S_OK: Hresult = Hresult(0x0000_0000);
    /// Operation successful, returning false
    pub const S_FALSE: Hresult = Hresult(0x0000_0001);
    /// Not implemented
    pub const E_NOTIMPL: Hresult = Hresult(0x8000_4001);
    /// No such interface supported
    pub const E_NOINTERFACE: Hresult = Hresult(0x8000_4002);
    /// Invalid pointer
    pub const E_POINTER: Hresult = Hresult(0x8000_4003);
    /// Unspecified error
    pub const E_FAIL: Hresult = Hresult(0x8000_4005);
    /// Catastrophic failure
    pub const E_UNEXPECTED: Hresult = Hresult(0x8000_FFFF);
    /// Access denied
    pub const E_ACCESSDENIED: Hresult = Hresult(0x8007_0005);
    /// Out of memory
    pub const E_OUTOFMEMORY: Hresult = Hresult(0x8007_000E);
    /// Invalid argument
    pub const E_INVALIDARG: Hresult = Hresult(0x8007_0057);
    /// The data collector set was not found
    pub const PLA_E_DCS_NOT_FOUND: Hresult = Hresult(0x8030_0002);
    /// The data collector set or one of its dependencies is already in use
    pub const PLA_E_DCS_IN_USE: Hresult = Hresult(0x8030_00AA);
    /// The data collector set already exists
    pub const PLA_E_DCS_ALREADY_EXISTS: Hresult = Hresult(0x8030_00B7);
    /// Two properties of the set are in conflict
    pub const PLA_E_PROPERTY_CONFLICT: Hresult = Hresult(0x8030_0101);
    /// Only one instance of this data collector set may run
    pub const PLA_E_DCS_SINGLETON_REQUIRED: Hresult = Hresult(0x8030_0102);
    /// A user account is required to commit the properties
    pub const PLA_E_CREDENTIALS_REQUIRED: Hresult = Hresult(0x8030_0103);
    /// The data collector set is not running
    pub const PLA_E_DCS_NOT_RUNNING: Hresult = Hresult(0x8030_0104);
    /// The executable lives on a network share
    pub const PLA_E_NETWORK_EXE_NOT_VALID: Hresult = Hresult(0x8030_0106);
    /// The executable path does not exist
    pub const PLA_E_EXE_PATH_NOT_VALID: Hresult = Hresult(0x8030_0108);
    /// A full executable path is required
    pub const PLA_E_EXE_FULL_PATH_REQUIRED: Hresult = Hresult(0x8030_010E);
}

/// 32-bit COM status word
///
/// Travels as a signed long. Bit 31 set means failure.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hresult(pub u32);

impl Hresult {
    /// Build from the signed wire value
    pub const fn from_wire(value: i32) -> Self {
        Self(value as u32)
    }

    /// Signed wire value
    pub const fn to_wire(self) -> i32 {
        self.0 as i32
    }

    /// Whether the severity bit is set
    pub const fn is_failure(self) -> bool {
        self.0 & 0x8000_0000 != 0
    }

    /// Facility field (bits 16..28)
    pub const fn facility(self) -> u16 {
        ((self.0 >> 16) & 0x1FFF) as u16
    }

    /// Code field (low 16 bits)
    pub const fn code(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// Symbolic name and message for well-known codes
    pub fn describe(self) -> Option<(&'static str, &'static str)> {
        use hresult::*;

        let entry = match self {
            S_OK => ("S_OK", "the operation completed successfully"),
            S_FALSE => ("S_FALSE", "the operation completed and returned false"),
            E_NOTIMPL => ("E_NOTIMPL", "not implemented"),
            E_NOINTERFACE => ("E_NOINTERFACE", "no such interface supported"),
            E_POINTER => ("E_POINTER", "invalid pointer"),
            E_FAIL => ("E_FAIL", "unspecified error"),
            E_UNEXPECTED => ("E_UNEXPECTED", "catastrophic failure"),
            E_ACCESSDENIED => ("E_ACCESSDENIED", "access denied"),
            E_OUTOFMEMORY => ("E_OUTOFMEMORY", "out of memory"),
            E_INVALIDARG => ("E_INVALIDARG", "one or more arguments are invalid"),
            PLA_E_DCS_NOT_FOUND => ("PLA_E_DCS_NOT_FOUND", "data collector set was not found"),
            PLA_E_DCS_IN_USE => ("PLA_E_DCS_IN_USE", "data collector set or one of its dependencies is already in use"),
            PLA_E_DCS_ALREADY_EXISTS => ("PLA_E_DCS_ALREADY_EXISTS", "data collector set already exists"),
            PLA_E_PROPERTY_CONFLICT => ("PLA_E_PROPERTY_CONFLICT", "property value conflicts with another property"),
            PLA_E_DCS_SINGLETON_REQUIRED => (
                "PLA_E_DCS_SINGLETON_REQUIRED",
                "only one instance of this data collector set can run at a time",
            ),
            PLA_E_CREDENTIALS_REQUIRED => ("PLA_E_CREDENTIALS_REQUIRED", "a user account is required to commit the properties"),
            PLA_E_DCS_NOT_RUNNING => ("PLA_E_DCS_NOT_RUNNING", "data collector set is not running"),
            PLA_E_NETWORK_EXE_NOT_VALID => ("PLA_E_NETWORK_EXE_NOT_VALID", "executable on a network share is not allowed"),
            PLA_E_EXE_PATH_NOT_VALID => ("PLA_E_EXE_PATH_NOT_VALID", "executable path does not exist"),
            PLA_E_EXE_FULL_PATH_REQUIRED => ("PLA_E_EXE_FULL_PATH_REQUIRED", "a full path to the executable is required"),
            _ => return None,
        };
        Some(entry)
    }
}

impl From<i32> for Hresult {
    fn from(value: i32) -> Self {
        Self::from_wire(value)
    }
}

impl fmt::Debug for Hresult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.describe() {
            Some((name, _)) => write!(f, "HRESULT({name})"),
            None => write!(f, "HRESULT(0x{:08x})", self.0),
        }
    }
}

impl fmt::Display for Hresult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.describe() {
            Some((name, message)) => write!(f, "0x{:08x} {name}: {message}", self.0),
            None => write!(f, "0x{:08x}", self.0),
        }
    }
}
