//! IDataCollectorSet server-side dispatch
//!
//! [`dispatch`] turns a request stub into a response stub by calling the
//! matching [`DataCollectorSetServer`] method. Handlers report failure by
//! returning [`PlaError::Status`]; the HRESULT goes back in the response and
//! every out-parameter is left at its default.

use std::future::Future;

use async_trait::async_trait;
use pla_ndr::{Bstr, Bytes, NdrContext};
use tracing::{debug, trace, warn};

use crate::datacollectorset::*;
use crate::error::{hresult, PlaError, Result};
use crate::operation::{marshal_response, unmarshal_request, Operation, ResponseStatus};
use crate::types::{AutoPathFormat, DataCollectorSetStatus, VariantBool};

fn not_implemented<T>() -> Result<T> {
    Err(PlaError::Status(hresult::E_NOTIMPL))
}

/// Server-side implementation of IDataCollectorSet
///
/// Every method defaults to `E_NOTIMPL`.
#[async_trait]
pub trait DataCollectorSetServer: Send + Sync {
    async fn get_duration(&self) -> Result<u32> {
        not_implemented()
    }

    async fn set_duration(&self, _seconds: u32) -> Result<()> {
        not_implemented()
    }

    async fn get_description(&self) -> Result<Option<Bstr>> {
        not_implemented()
    }

    async fn set_description(&self, _description: Option<Bstr>) -> Result<()> {
        not_implemented()
    }

    async fn get_description_unresolved(&self) -> Result<Option<Bstr>> {
        not_implemented()
    }

    async fn get_display_name(&self) -> Result<Option<Bstr>> {
        not_implemented()
    }

    async fn set_display_name(&self, _display_name: Option<Bstr>) -> Result<()> {
        not_implemented()
    }

    async fn get_name(&self) -> Result<Option<Bstr>> {
        not_implemented()
    }

    async fn get_root_path(&self) -> Result<Option<Bstr>> {
        not_implemented()
    }

    async fn set_root_path(&self, _folder: Option<Bstr>) -> Result<()> {
        not_implemented()
    }

    async fn get_segment(&self) -> Result<VariantBool> {
        not_implemented()
    }

    async fn set_segment(&self, _segment: VariantBool) -> Result<()> {
        not_implemented()
    }

    async fn get_segment_max_size(&self) -> Result<u32> {
        not_implemented()
    }

    async fn set_segment_max_size(&self, _size: u32) -> Result<()> {
        not_implemented()
    }

    async fn get_status(&self) -> Result<DataCollectorSetStatus> {
        not_implemented()
    }

    async fn get_subdirectory_format(&self) -> Result<AutoPathFormat> {
        not_implemented()
    }

    async fn set_subdirectory_format(&self, _format: AutoPathFormat) -> Result<()> {
        not_implemented()
    }

    async fn set_credentials(&self, _user: Option<Bstr>, _password: Option<Bstr>) -> Result<()> {
        not_implemented()
    }

    async fn delete(&self) -> Result<()> {
        not_implemented()
    }

    async fn start(&self, _synchronous: VariantBool) -> Result<()> {
        not_implemented()
    }

    async fn stop(&self, _synchronous: VariantBool) -> Result<()> {
        not_implemented()
    }

    async fn set_value(&self, _key: Option<Bstr>, _value: Option<Bstr>) -> Result<()> {
        not_implemented()
    }

    async fn get_value(&self, _key: Option<Bstr>) -> Result<Option<Bstr>> {
        not_implemented()
    }
}

/// Decode, run the handler, encode
async fn handle<O, F, Fut>(stub: Bytes, ctx: NdrContext, handler: F) -> Result<Bytes>
where
    O: Operation,
    F: FnOnce(O::Request) -> Fut,
    Fut: Future<Output = Result<O::Response>>,
{
    let request = unmarshal_request::<O>(stub, ctx)?;
    trace!(operation = O::NAME, opnum = O::OPNUM, "dispatching");
    let response = match handler(request).await {
        Ok(response) => response,
        Err(PlaError::Status(status)) => {
            debug!(operation = O::NAME, %status, "handler returned failure status");
            O::Response::with_status(status)
        }
        Err(e) => return Err(e),
    };
    marshal_response::<O>(&response, ctx)
}

/// Dispatch one request stub to `server`
///
/// Returns the response stub. Unknown opnums fail with
/// [`PlaError::UnknownOperation`]; malformed stubs fail with the NDR error.
pub async fn dispatch<S>(server: &S, opnum: u16, stub: Bytes, ctx: NdrContext) -> Result<Bytes>
where
    S: DataCollectorSetServer + ?Sized,
{
    debug!(opnum, len = stub.len(), "dispatch");
    match opnum {
        opnum::GET_DURATION => {
            handle::<GetDuration, _, _>(stub, ctx, |_| async move {
                Ok(GetDurationResponse {
                    seconds: server.get_duration().await?,
                    ..Default::default()
                })
            })
            .await
        }
        opnum::SET_DURATION => {
            handle::<SetDuration, _, _>(stub, ctx, |req| async move {
                server.set_duration(req.seconds).await?;
                Ok(SetDurationResponse::default())
            })
            .await
        }
        opnum::GET_DESCRIPTION => {
            handle::<GetDescription, _, _>(stub, ctx, |_| async move {
                Ok(GetDescriptionResponse {
                    description: server.get_description().await?,
                    ..Default::default()
                })
            })
            .await
        }
        opnum::SET_DESCRIPTION => {
            handle::<SetDescription, _, _>(stub, ctx, |req| async move {
                server.set_description(req.description).await?;
                Ok(SetDescriptionResponse::default())
            })
            .await
        }
        opnum::GET_DESCRIPTION_UNRESOLVED => {
            handle::<GetDescriptionUnresolved, _, _>(stub, ctx, |_| async move {
                Ok(GetDescriptionUnresolvedResponse {
                    description: server.get_description_unresolved().await?,
                    ..Default::default()
                })
            })
            .await
        }
        opnum::GET_DISPLAY_NAME => {
            handle::<GetDisplayName, _, _>(stub, ctx, |_| async move {
                Ok(GetDisplayNameResponse {
                    display_name: server.get_display_name().await?,
                    ..Default::default()
                })
            })
            .await
        }
        opnum::SET_DISPLAY_NAME => {
            handle::<SetDisplayName, _, _>(stub, ctx, |req| async move {
                server.set_display_name(req.display_name).await?;
                Ok(SetDisplayNameResponse::default())
            })
            .await
        }
        opnum::GET_NAME => {
            handle::<GetName, _, _>(stub, ctx, |_| async move {
                Ok(GetNameResponse {
                    name: server.get_name().await?,
                    ..Default::default()
                })
            })
            .await
        }
        opnum::GET_ROOT_PATH => {
            handle::<GetRootPath, _, _>(stub, ctx, |_| async move {
                Ok(GetRootPathResponse {
                    folder: server.get_root_path().await?,
                    ..Default::default()
                })
            })
            .await
        }
        opnum::SET_ROOT_PATH => {
            handle::<SetRootPath, _, _>(stub, ctx, |req| async move {
                server.set_root_path(req.folder).await?;
                Ok(SetRootPathResponse::default())
            })
            .await
        }
        opnum::GET_SEGMENT => {
            handle::<GetSegment, _, _>(stub, ctx, |_| async move {
                Ok(GetSegmentResponse {
                    segment: server.get_segment().await?,
                    ..Default::default()
                })
            })
            .await
        }
        opnum::SET_SEGMENT => {
            handle::<SetSegment, _, _>(stub, ctx, |req| async move {
                server.set_segment(req.segment).await?;
                Ok(SetSegmentResponse::default())
            })
            .await
        }
        opnum::GET_SEGMENT_MAX_SIZE => {
            handle::<GetSegmentMaxSize, _, _>(stub, ctx, |_| async move {
                Ok(GetSegmentMaxSizeResponse {
                    size: server.get_segment_max_size().await?,
                    ..Default::default()
                })
            })
            .await
        }
        opnum::SET_SEGMENT_MAX_SIZE => {
            handle::<SetSegmentMaxSize, _, _>(stub, ctx, |req| async move {
                server.set_segment_max_size(req.size).await?;
                Ok(SetSegmentMaxSizeResponse::default())
            })
            .await
        }
        opnum::GET_STATUS => {
            handle::<GetStatus, _, _>(stub, ctx, |_| async move {
                Ok(GetStatusResponse {
                    status: server.get_status().await?,
                    ..Default::default()
                })
            })
            .await
        }
        opnum::GET_SUBDIRECTORY_FORMAT => {
            handle::<GetSubdirectoryFormat, _, _>(stub, ctx, |_| async move {
                Ok(GetSubdirectoryFormatResponse {
                    format: server.get_subdirectory_format().await?,
                    ..Default::default()
                })
            })
            .await
        }
        opnum::SET_SUBDIRECTORY_FORMAT => {
            handle::<SetSubdirectoryFormat, _, _>(stub, ctx, |req| async move {
                server.set_subdirectory_format(req.format).await?;
                Ok(SetSubdirectoryFormatResponse::default())
            })
            .await
        }
        opnum::SET_CREDENTIALS => {
            handle::<SetCredentials, _, _>(stub, ctx, |req| async move {
                server.set_credentials(req.user, req.password).await?;
                Ok(SetCredentialsResponse::default())
            })
            .await
        }
        opnum::DELETE => {
            handle::<Delete, _, _>(stub, ctx, |_| async move {
                server.delete().await?;
                Ok(DeleteResponse::default())
            })
            .await
        }
        opnum::START => {
            handle::<Start, _, _>(stub, ctx, |req| async move {
                server.start(req.synchronous).await?;
                Ok(StartResponse::default())
            })
            .await
        }
        opnum::STOP => {
            handle::<Stop, _, _>(stub, ctx, |req| async move {
                server.stop(req.synchronous).await?;
                Ok(StopResponse::default())
            })
            .await
        }
        opnum::SET_VALUE => {
            handle::<SetValue, _, _>(stub, ctx, |req| async move {
                server.set_value(req.key, req.value).await?;
                Ok(SetValueResponse::default())
            })
            .await
        }
        opnum::GET_VALUE => {
            handle::<GetValue, _, _>(stub, ctx, |req| async move {
                Ok(GetValueResponse {
                    value: server.get_value(req.key).await?,
                    ..Default::default()
                })
            })
            .await
        }
        other => {
            warn!(opnum = other, "no operation bound to opnum");
            Err(PlaError::UnknownOperation(other))
        }
    }
}
