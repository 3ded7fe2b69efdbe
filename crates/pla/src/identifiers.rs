//! DCOM identifiers used by the binding (MS-DCOM 2.2.18)

use std::fmt;

use pla_ndr::NdrUuid;

/// Generate a new random v4 UUID
pub fn generate_uuid() -> NdrUuid {
    NdrUuid::from_bytes(*uuid::Uuid::new_v4().as_bytes())
}

/// Interface Pointer Identifier (16 bytes)
///
/// Names one interface on one object inside an object exporter. Every
/// IDataCollectorSet call is addressed to an IPID.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ipid(pub NdrUuid);

impl Ipid {
    /// Create a new IPID from a UUID
    pub fn new(uuid: NdrUuid) -> Self {
        Self(uuid)
    }

    /// Generate a random IPID
    pub fn generate() -> Self {
        Self(generate_uuid())
    }

    /// Create a nil IPID
    pub fn nil() -> Self {
        Self(NdrUuid::NIL)
    }

    /// Check if this is the nil IPID
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Get the underlying UUID
    pub fn uuid(&self) -> &NdrUuid {
        &self.0
    }
}

impl fmt::Debug for Ipid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IPID({})", self.0)
    }
}

impl fmt::Display for Ipid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
