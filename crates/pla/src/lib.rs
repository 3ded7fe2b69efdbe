//! MS-PLA IDataCollectorSet DCOM binding
//!
//! Request and response frames for every IDataCollectorSet method, the ORPC
//! headers that wrap them, and a client and server built on top.
//!
//! # Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  DataCollectorSetClient       │  dispatch + Server trait    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Operation frames (ORPCTHIS/ORPCTHAT, params, HRESULT)      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  NDR codec (pla-ndr crate)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The transport below the stub (binding, authentication, PDU framing) is
//! supplied by the caller through [`Transport`].
//!
//! # Modules
//!
//! - [`datacollectorset`]: opnums and frame types for each method
//! - [`orpc`]: ORPCTHIS, ORPCTHAT and extension arrays
//! - [`types`]: PLA enumerations and automation scalars

pub mod datacollectorset;
pub mod orpc;
pub mod types;

mod client;
mod error;
mod identifiers;
mod operation;
mod server;

pub use client::{ClientConfig, DataCollectorSetClient, Transport};
pub use datacollectorset::*;
pub use error::{hresult, Hresult, PlaError, Result};
pub use identifiers::{generate_uuid, Ipid};
pub use operation::{
    marshal_request, marshal_request_with_hook, marshal_response, unmarshal_request, unmarshal_response,
    unmarshal_response_with_hook, Operation, OrpcRequest, ResponseStatus,
};
pub use orpc::{ComVersion, OrpcExtent, OrpcExtentArray, OrpcThat, OrpcThis};
pub use server::{dispatch, DataCollectorSetServer};
pub use types::{AutoPathFormat, DataCollectorSetStatus, VariantBool};

pub use pla_ndr::{Bstr, NdrContext};

/// DCOM version announced by default
pub const DCOM_VERSION: ComVersion = ComVersion::DCOM_5_7;

#[doc(hidden)]
pub mod __private {
    pub use pla_ndr::{NdrDecode, NdrEncode, NdrReader, NdrWriter, Result as NdrResult};

    use crate::orpc::{OrpcThat, OrpcThis, DEFAULT_ORPC_THAT, DEFAULT_ORPC_THIS};

    pub fn orpc_this_or_default(this: &Option<OrpcThis>) -> &OrpcThis {
        this.as_ref().unwrap_or(&DEFAULT_ORPC_THIS)
    }

    pub fn orpc_that_or_default(that: &Option<OrpcThat>) -> &OrpcThat {
        that.as_ref().unwrap_or(&DEFAULT_ORPC_THAT)
    }
}
