//! IDataCollectorSet wire protocol (MS-PLA 3.2.4.1)
//!
//! Opnums 0-6 belong to IUnknown and IDispatch and are not bound here. Every
//! `BSTR` parameter is a unique pointer to a [`Bstr`] body, so `None` and an
//! empty string stay distinct.

use pla_ndr::{Bstr, NdrUuid};

use crate::types::{AutoPathFormat, DataCollectorSetStatus, VariantBool};

/// IDataCollectorSet interface UUID
pub const IDATACOLLECTORSET_UUID: &str = "03837520-098b-11d8-9414-505054503030";

/// IDataCollectorSet interface UUID, parsed (interface version 0.0)
pub const IID_IDATACOLLECTORSET: NdrUuid = NdrUuid::from_bytes([
    0x03, 0x83, 0x75, 0x20, 0x09, 0x8b, 0x11, 0xd8, 0x94, 0x14, 0x50, 0x50, 0x54, 0x50, 0x30, 0x30,
]);

/// Operation numbers for IDataCollectorSet
pub mod opnum {
    /// Duration getter
    pub const GET_DURATION: u16 = 8;
    /// Duration setter
    pub const SET_DURATION: u16 = 9;
    /// Description getter
    pub const GET_DESCRIPTION: u16 = 10;
    /// Description setter
    pub const SET_DESCRIPTION: u16 = 11;
    /// Description getter, without resolving indirect strings
    pub const GET_DESCRIPTION_UNRESOLVED: u16 = 12;
    /// DisplayName getter
    pub const GET_DISPLAY_NAME: u16 = 13;
    /// DisplayName setter
    pub const SET_DISPLAY_NAME: u16 = 14;
    /// Name getter
    pub const GET_NAME: u16 = 20;
    /// RootPath getter
    pub const GET_ROOT_PATH: u16 = 22;
    /// RootPath setter
    pub const SET_ROOT_PATH: u16 = 23;
    /// Segment getter
    pub const GET_SEGMENT: u16 = 24;
    /// Segment setter
    pub const SET_SEGMENT: u16 = 25;
    /// SegmentMaxSize getter
    pub const GET_SEGMENT_MAX_SIZE: u16 = 28;
    /// SegmentMaxSize setter
    pub const SET_SEGMENT_MAX_SIZE: u16 = 29;
    /// Status getter
    pub const GET_STATUS: u16 = 33;
    /// SubdirectoryFormat getter
    pub const GET_SUBDIRECTORY_FORMAT: u16 = 36;
    /// SubdirectoryFormat setter
    pub const SET_SUBDIRECTORY_FORMAT: u16 = 37;
    /// SetCredentials
    pub const SET_CREDENTIALS: u16 = 58;
    /// Delete
    pub const DELETE: u16 = 61;
    /// Start
    pub const START: u16 = 62;
    /// Stop
    pub const STOP: u16 = 63;
    /// SetValue
    pub const SET_VALUE: u16 = 65;
    /// GetValue
    pub const GET_VALUE: u16 = 66;
}

crate::pla_operation! {
    /// Reads how long the set runs, in seconds
    GetDuration = opnum::GET_DURATION, "GetDuration";
    request GetDurationRequest {}
    response GetDurationResponse { seconds: u32 => val }
}

crate::pla_operation! {
    /// Sets how long the set runs, in seconds; zero means no limit
    SetDuration = opnum::SET_DURATION, "SetDuration";
    request SetDurationRequest { seconds: u32 => val }
    response SetDurationResponse {}
}

crate::pla_operation! {
    /// Reads the description
    GetDescription = opnum::GET_DESCRIPTION, "GetDescription";
    request GetDescriptionRequest {}
    response GetDescriptionResponse { description: Option<Bstr> => ptr }
}

crate::pla_operation! {
    /// Sets the description
    SetDescription = opnum::SET_DESCRIPTION, "SetDescription";
    request SetDescriptionRequest { description: Option<Bstr> => ptr }
    response SetDescriptionResponse {}
}

crate::pla_operation! {
    /// Reads the description as stored, indirect strings unresolved
    GetDescriptionUnresolved = opnum::GET_DESCRIPTION_UNRESOLVED, "GetDescriptionUnresolved";
    request GetDescriptionUnresolvedRequest {}
    response GetDescriptionUnresolvedResponse { description: Option<Bstr> => ptr }
}

crate::pla_operation! {
    /// Reads the display name
    GetDisplayName = opnum::GET_DISPLAY_NAME, "GetDisplayName";
    request GetDisplayNameRequest {}
    response GetDisplayNameResponse { display_name: Option<Bstr> => ptr }
}

crate::pla_operation! {
    /// Sets the display name
    SetDisplayName = opnum::SET_DISPLAY_NAME, "SetDisplayName";
    request SetDisplayNameRequest { display_name: Option<Bstr> => ptr }
    response SetDisplayNameResponse {}
}

crate::pla_operation! {
    /// Reads the set's name
    GetName = opnum::GET_NAME, "GetName";
    request GetNameRequest {}
    response GetNameResponse { name: Option<Bstr> => ptr }
}

crate::pla_operation! {
    /// Reads the base folder for collected data
    GetRootPath = opnum::GET_ROOT_PATH, "GetRootPath";
    request GetRootPathRequest {}
    response GetRootPathResponse { folder: Option<Bstr> => ptr }
}

crate::pla_operation! {
    /// Sets the base folder for collected data
    SetRootPath = opnum::SET_ROOT_PATH, "SetRootPath";
    request SetRootPathRequest { folder: Option<Bstr> => ptr }
    response SetRootPathResponse {}
}

crate::pla_operation! {
    /// Reads whether segmentation is enabled
    GetSegment = opnum::GET_SEGMENT, "GetSegment";
    request GetSegmentRequest {}
    response GetSegmentResponse { segment: VariantBool => val }
}

crate::pla_operation! {
    /// Enables or disables segmentation
    SetSegment = opnum::SET_SEGMENT, "SetSegment";
    request SetSegmentRequest { segment: VariantBool => val }
    response SetSegmentResponse {}
}

crate::pla_operation! {
    /// Reads the segment size limit
    GetSegmentMaxSize = opnum::GET_SEGMENT_MAX_SIZE, "GetSegmentMaxSize";
    request GetSegmentMaxSizeRequest {}
    response GetSegmentMaxSizeResponse { size: u32 => val }
}

crate::pla_operation! {
    /// Sets the segment size limit
    SetSegmentMaxSize = opnum::SET_SEGMENT_MAX_SIZE, "SetSegmentMaxSize";
    request SetSegmentMaxSizeRequest { size: u32 => val }
    response SetSegmentMaxSizeResponse {}
}

crate::pla_operation! {
    /// Reads the running state
    GetStatus = opnum::GET_STATUS, "GetStatus";
    request GetStatusRequest {}
    response GetStatusResponse { status: DataCollectorSetStatus => val }
}

crate::pla_operation! {
    /// Reads the subdirectory decoration flags
    GetSubdirectoryFormat = opnum::GET_SUBDIRECTORY_FORMAT, "GetSubdirectoryFormat";
    request GetSubdirectoryFormatRequest {}
    response GetSubdirectoryFormatResponse { format: AutoPathFormat => val }
}

crate::pla_operation! {
    /// Sets the subdirectory decoration flags
    SetSubdirectoryFormat = opnum::SET_SUBDIRECTORY_FORMAT, "SetSubdirectoryFormat";
    request SetSubdirectoryFormatRequest { format: AutoPathFormat => val }
    response SetSubdirectoryFormatResponse {}
}

crate::pla_operation! {
    /// Sets the account the set runs under
    SetCredentials = opnum::SET_CREDENTIALS, "SetCredentials";
    request SetCredentialsRequest {
        user: Option<Bstr> => ptr,
        password: Option<Bstr> => ptr,
    }
    response SetCredentialsResponse {}
}

crate::pla_operation! {
    /// Deletes the set
    Delete = opnum::DELETE, "Delete";
    request DeleteRequest {}
    response DeleteResponse {}
}

crate::pla_operation! {
    /// Starts collecting
    Start = opnum::START, "Start";
    request StartRequest { synchronous: VariantBool => val }
    response StartResponse {}
}

crate::pla_operation! {
    /// Stops collecting
    Stop = opnum::STOP, "Stop";
    request StopRequest { synchronous: VariantBool => val }
    response StopResponse {}
}

crate::pla_operation! {
    /// Stores a user-defined key/value pair
    SetValue = opnum::SET_VALUE, "SetValue";
    request SetValueRequest {
        key: Option<Bstr> => ptr,
        value: Option<Bstr> => ptr,
    }
    response SetValueResponse {}
}

crate::pla_operation! {
    /// Reads a user-defined value
    GetValue = opnum::GET_VALUE, "GetValue";
    request GetValueRequest { key: Option<Bstr> => ptr }
    response GetValueResponse { value: Option<Bstr> => ptr }
}
