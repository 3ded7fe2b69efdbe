//! IDataCollectorSet client
//!
//! Marshals requests, hands the stub to a [`Transport`] and unmarshals the
//! reply. The transport owns everything below the stub: binding, security
//! and PDU framing.

use async_trait::async_trait;
use pla_ndr::{Bstr, Bytes, NdrContext};
use tracing::{debug, warn};

use crate::datacollectorset::*;
use crate::error::{Hresult, PlaError, Result};
use crate::identifiers::Ipid;
use crate::operation::{marshal_request, unmarshal_response, Operation, OrpcRequest, ResponseStatus};
use crate::orpc::{ComVersion, OrpcThis};
use crate::DCOM_VERSION;
use crate::types::{AutoPathFormat, DataCollectorSetStatus, VariantBool};

/// Delivers request stubs and returns response stubs
#[async_trait]
pub trait Transport: Send + Sync {
    /// Invoke `opnum` on the interface identified by `ipid`
    async fn invoke(&self, ipid: &Ipid, opnum: u16, stub: Bytes) -> Result<Bytes>;
}

/// Failure status word at the end of a response stub, if there is one
fn trailing_status(reply: &Bytes, ctx: NdrContext) -> Option<Hresult> {
    let start = reply.len().checked_sub(4)?;
    let mut tail = &reply[start..];
    let status = Hresult::from_wire(ctx.get_i32(&mut tail));
    status.is_failure().then_some(status)
}

/// Configuration for the client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Byte order and decode limits
    pub context: NdrContext,
    /// COM version announced in ORPCTHIS
    pub com_version: ComVersion,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            context: NdrContext::new(),
            com_version: DCOM_VERSION,
        }
    }
}

/// Client for one IDataCollectorSet interface pointer
pub struct DataCollectorSetClient<T> {
    transport: T,
    ipid: Ipid,
    config: ClientConfig,
}

impl<T: Transport> DataCollectorSetClient<T> {
    /// Create a client with the default configuration
    pub fn new(transport: T, ipid: Ipid) -> Self {
        Self::with_config(transport, ipid, ClientConfig::default())
    }

    /// Create a client with an explicit configuration
    pub fn with_config(transport: T, ipid: Ipid, config: ClientConfig) -> Self {
        Self {
            transport,
            ipid,
            config,
        }
    }

    /// Interface pointer this client calls
    pub fn ipid(&self) -> Ipid {
        self.ipid
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Invoke one operation
    ///
    /// Fills in ORPCTHIS with a fresh causality ID when the request has none.
    /// A failure HRESULT is returned as [`PlaError::Status`].
    pub async fn call<O: Operation>(&self, mut request: O::Request) -> Result<O::Response> {
        let cid = request
            .orpc_this_mut()
            .get_or_insert_with(|| OrpcThis::new(self.config.com_version))
            .cid;
        debug!(operation = O::NAME, opnum = O::OPNUM, ipid = %self.ipid, %cid, "invoking");

        let stub = marshal_request::<O>(&request, self.config.context)?;
        let reply = self.transport.invoke(&self.ipid, O::OPNUM, stub).await?;
        let response = match unmarshal_response::<O>(reply.clone(), self.config.context) {
            Ok(response) => response,
            Err(e) => {
                // Servers may leave out-parameters uninitialised on failure
                if let Some(status) = trailing_status(&reply, self.config.context) {
                    warn!(operation = O::NAME, %status, error = %e, "call failed, reply body unreadable");
                    return Err(PlaError::Status(status));
                }
                return Err(e);
            }
        };

        let status = response.status();
        if status.is_failure() {
            warn!(operation = O::NAME, %status, "call failed");
            return Err(PlaError::Status(status));
        }
        debug!(operation = O::NAME, %status, "call completed");
        Ok(response)
    }

    /// Duration in seconds; zero means the set runs until stopped
    pub async fn get_duration(&self) -> Result<u32> {
        Ok(self.call::<GetDuration>(Default::default()).await?.seconds)
    }

    pub async fn set_duration(&self, seconds: u32) -> Result<()> {
        let request = SetDurationRequest {
            seconds,
            ..Default::default()
        };
        self.call::<SetDuration>(request).await.map(drop)
    }

    /// Description; `None` when the server returned a null BSTR
    pub async fn get_description(&self) -> Result<Option<String>> {
        let response = self.call::<GetDescription>(Default::default()).await?;
        Ok(response.description.map(Bstr::into_string))
    }

    pub async fn set_description(&self, description: Option<&str>) -> Result<()> {
        let request = SetDescriptionRequest {
            description: description.map(Bstr::from),
            ..Default::default()
        };
        self.call::<SetDescription>(request).await.map(drop)
    }

    pub async fn get_description_unresolved(&self) -> Result<Option<String>> {
        let response = self.call::<GetDescriptionUnresolved>(Default::default()).await?;
        Ok(response.description.map(Bstr::into_string))
    }

    pub async fn get_display_name(&self) -> Result<Option<String>> {
        let response = self.call::<GetDisplayName>(Default::default()).await?;
        Ok(response.display_name.map(Bstr::into_string))
    }

    pub async fn set_display_name(&self, display_name: Option<&str>) -> Result<()> {
        let request = SetDisplayNameRequest {
            display_name: display_name.map(Bstr::from),
            ..Default::default()
        };
        self.call::<SetDisplayName>(request).await.map(drop)
    }

    pub async fn get_name(&self) -> Result<Option<String>> {
        let response = self.call::<GetName>(Default::default()).await?;
        Ok(response.name.map(Bstr::into_string))
    }

    pub async fn get_root_path(&self) -> Result<Option<String>> {
        let response = self.call::<GetRootPath>(Default::default()).await?;
        Ok(response.folder.map(Bstr::into_string))
    }

    pub async fn set_root_path(&self, folder: Option<&str>) -> Result<()> {
        let request = SetRootPathRequest {
            folder: folder.map(Bstr::from),
            ..Default::default()
        };
        self.call::<SetRootPath>(request).await.map(drop)
    }

    pub async fn get_segment(&self) -> Result<bool> {
        Ok(self.call::<GetSegment>(Default::default()).await?.segment.as_bool())
    }

    pub async fn set_segment(&self, segment: bool) -> Result<()> {
        let request = SetSegmentRequest {
            segment: VariantBool::from(segment),
            ..Default::default()
        };
        self.call::<SetSegment>(request).await.map(drop)
    }

    /// Segment size limit in megabytes
    pub async fn get_segment_max_size(&self) -> Result<u32> {
        Ok(self.call::<GetSegmentMaxSize>(Default::default()).await?.size)
    }

    pub async fn set_segment_max_size(&self, size: u32) -> Result<()> {
        let request = SetSegmentMaxSizeRequest {
            size,
            ..Default::default()
        };
        self.call::<SetSegmentMaxSize>(request).await.map(drop)
    }

    pub async fn get_status(&self) -> Result<DataCollectorSetStatus> {
        Ok(self.call::<GetStatus>(Default::default()).await?.status)
    }

    pub async fn get_subdirectory_format(&self) -> Result<AutoPathFormat> {
        Ok(self.call::<GetSubdirectoryFormat>(Default::default()).await?.format)
    }

    pub async fn set_subdirectory_format(&self, format: AutoPathFormat) -> Result<()> {
        let request = SetSubdirectoryFormatRequest {
            format,
            ..Default::default()
        };
        self.call::<SetSubdirectoryFormat>(request).await.map(drop)
    }

    /// Set the account the set runs as; `None` for both clears it
    pub async fn set_credentials(&self, user: Option<&str>, password: Option<&str>) -> Result<()> {
        let request = SetCredentialsRequest {
            user: user.map(Bstr::from),
            password: password.map(Bstr::from),
            ..Default::default()
        };
        self.call::<SetCredentials>(request).await.map(drop)
    }

    pub async fn delete(&self) -> Result<()> {
        self.call::<Delete>(Default::default()).await.map(drop)
    }

    /// Start collecting; with `synchronous` the call returns once running
    pub async fn start(&self, synchronous: bool) -> Result<()> {
        let request = StartRequest {
            synchronous: VariantBool::from(synchronous),
            ..Default::default()
        };
        self.call::<Start>(request).await.map(drop)
    }

    pub async fn stop(&self, synchronous: bool) -> Result<()> {
        let request = StopRequest {
            synchronous: VariantBool::from(synchronous),
            ..Default::default()
        };
        self.call::<Stop>(request).await.map(drop)
    }

    pub async fn set_value(&self, key: &str, value: Option<&str>) -> Result<()> {
        let request = SetValueRequest {
            key: Some(Bstr::from(key)),
            value: value.map(Bstr::from),
            ..Default::default()
        };
        self.call::<SetValue>(request).await.map(drop)
    }

    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let request = GetValueRequest {
            key: Some(Bstr::from(key)),
            ..Default::default()
        };
        let response = self.call::<GetValue>(request).await?;
        Ok(response.value.map(Bstr::into_string))
    }
}
