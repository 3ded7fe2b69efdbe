//! Operation Tests - IDataCollectorSet end to end
//!
//! Every call goes client -> NDR stub -> dispatch -> mock server and back,
//! so both directions of every frame are exercised.

mod common;

use std::sync::Arc;

use bytes::Bytes;
use common::*;
use pla::{
    dispatch, hresult, marshal_request, opnum, unmarshal_response, AutoPathFormat, Bstr,
    DataCollectorSetClient, DataCollectorSetStatus, GetDescription, GetDescriptionRequest,
    GetValue, GetValueRequest, Ipid, NdrContext, Operation, OrpcThis, PlaError, ResponseStatus,
    SetDescription, SetDescriptionRequest,
};

#[tokio::test]
async fn test_duration_roundtrip() {
    init_logging();
    let (client, server) = loopback_client("System Performance");

    assert_eq!(client.get_duration().await.unwrap(), 0);
    client.set_duration(3600).await.unwrap();
    assert_eq!(client.get_duration().await.unwrap(), 3600);
    assert_eq!(server.state.lock().unwrap().duration, 3600);
}

#[tokio::test]
async fn test_description_null_and_empty_are_distinct() {
    init_logging();
    let (client, server) = loopback_client("Desc");

    assert_eq!(client.get_description().await.unwrap(), None);

    client.set_description(Some("")).await.unwrap();
    assert_eq!(server.state.lock().unwrap().description, Some(Bstr::default()));
    assert_eq!(client.get_description().await.unwrap(), Some(String::new()));

    client.set_description(None).await.unwrap();
    assert_eq!(server.state.lock().unwrap().description, None);
    assert_eq!(client.get_description_unresolved().await.unwrap(), None);
}

#[tokio::test]
async fn test_non_ascii_strings_survive() {
    init_logging();
    let (client, _server) = loopback_client("Unicode");

    let text = "Übersicht – ログ 📈";
    client.set_display_name(Some(text)).await.unwrap();
    assert_eq!(client.get_display_name().await.unwrap().as_deref(), Some(text));
}

#[tokio::test]
async fn test_name_and_display_name_fallback() {
    init_logging();
    let (client, _server) = loopback_client("Server Diagnostics");

    assert_eq!(client.get_name().await.unwrap().as_deref(), Some("Server Diagnostics"));
    assert_eq!(client.get_display_name().await.unwrap().as_deref(), Some("Server Diagnostics"));
}

#[tokio::test]
async fn test_root_path_validation() {
    init_logging();
    let (client, _server) = loopback_client("Paths");

    assert_eq!(
        client.get_root_path().await.unwrap().as_deref(),
        Some("C:\\PerfLogs\\Admin\\Paths")
    );
    client.set_root_path(Some("D:\\Logs")).await.unwrap();
    assert_eq!(client.get_root_path().await.unwrap().as_deref(), Some("D:\\Logs"));

    let err = client.set_root_path(Some("")).await.unwrap_err();
    assert_eq!(err.hresult(), Some(hresult::E_INVALIDARG));
    let err = client.set_root_path(None).await.unwrap_err();
    assert_eq!(err.hresult(), Some(hresult::E_INVALIDARG));
}

#[tokio::test]
async fn test_segment_settings() {
    init_logging();
    let (client, _server) = loopback_client("Segments");

    assert!(!client.get_segment().await.unwrap());
    client.set_segment(true).await.unwrap();
    assert!(client.get_segment().await.unwrap());

    client.set_segment_max_size(250).await.unwrap();
    assert_eq!(client.get_segment_max_size().await.unwrap(), 250);
}

#[tokio::test]
async fn test_subdirectory_format() {
    init_logging();
    let (client, _server) = loopback_client("Format");

    let format = client.get_subdirectory_format().await.unwrap();
    assert!(format.contains(AutoPathFormat::COMPUTER));

    let wanted = AutoPathFormat::PATTERN | AutoPathFormat::SERIAL_NUMBER;
    client.set_subdirectory_format(wanted).await.unwrap();
    assert_eq!(client.get_subdirectory_format().await.unwrap(), wanted);
}

#[tokio::test]
async fn test_start_stop_lifecycle() {
    init_logging();
    let (client, _server) = loopback_client("Lifecycle");

    assert_eq!(client.get_status().await.unwrap(), DataCollectorSetStatus::Stopped);
    client.start(true).await.unwrap();
    assert_eq!(client.get_status().await.unwrap(), DataCollectorSetStatus::Running);

    // Running sets refuse changes and a second start
    let err = client.start(false).await.unwrap_err();
    assert_eq!(err.hresult(), Some(hresult::PLA_E_DCS_IN_USE));
    let err = client.set_duration(60).await.unwrap_err();
    assert_eq!(err.hresult(), Some(hresult::PLA_E_DCS_IN_USE));
    let err = client.delete().await.unwrap_err();
    assert_eq!(err.hresult(), Some(hresult::PLA_E_DCS_IN_USE));

    client.stop(true).await.unwrap();
    assert_eq!(client.get_status().await.unwrap(), DataCollectorSetStatus::Stopped);
    let err = client.stop(true).await.unwrap_err();
    assert_eq!(err.hresult(), Some(hresult::PLA_E_DCS_NOT_RUNNING));
}

#[tokio::test]
async fn test_delete_then_calls_fail() {
    init_logging();
    let (client, _server) = loopback_client("Doomed");

    client.delete().await.unwrap();
    let err = client.get_duration().await.unwrap_err();
    assert_eq!(err.hresult(), Some(hresult::PLA_E_DCS_NOT_FOUND));
}

#[tokio::test]
async fn test_credentials() {
    init_logging();
    let (client, server) = loopback_client("Creds");

    client.set_credentials(Some("CONTOSO\\perf"), Some("hunter2")).await.unwrap();
    assert_eq!(server.state.lock().unwrap().user, Some(Bstr::from("CONTOSO\\perf")));

    client.set_credentials(None, None).await.unwrap();
    assert_eq!(server.state.lock().unwrap().user, None);

    let err = client.set_credentials(None, Some("orphan")).await.unwrap_err();
    assert_eq!(err.hresult(), Some(hresult::PLA_E_CREDENTIALS_REQUIRED));
}

#[tokio::test]
async fn test_key_values() {
    init_logging();
    let (client, _server) = loopback_client("Values");

    assert_eq!(client.get_value("missing").await.unwrap(), None);
    client.set_value("Owner", Some("ops")).await.unwrap();
    client.set_value("Empty", Some("")).await.unwrap();
    client.set_value("Null", None).await.unwrap();

    assert_eq!(client.get_value("Owner").await.unwrap().as_deref(), Some("ops"));
    assert_eq!(client.get_value("Empty").await.unwrap().as_deref(), Some(""));
    assert_eq!(client.get_value("Null").await.unwrap(), None);
}

#[tokio::test]
async fn test_null_key_is_rejected_by_server() {
    init_logging();
    let (client, _server) = loopback_client("Keys");

    let err = client.call::<GetValue>(GetValueRequest::default()).await.unwrap_err();
    assert_eq!(err.hresult(), Some(hresult::E_POINTER));
}

#[tokio::test]
async fn test_explicit_orpc_header_is_kept() {
    init_logging();
    let (client, _server) = loopback_client("Header");

    let cid = pla::generate_uuid();
    let request = SetDescriptionRequest {
        this: Some(OrpcThis::with_causality(pla::ComVersion::DCOM_5_6, cid)),
        description: Some(Bstr::from("explicit")),
    };
    client.call::<SetDescription>(request).await.unwrap();

    let response = client.call::<GetDescription>(GetDescriptionRequest::default()).await.unwrap();
    assert_eq!(response.description, Some(Bstr::from("explicit")));
    assert!(response.that.is_some());
    assert_eq!(response.status(), hresult::S_OK);
}

#[tokio::test]
async fn test_wrong_ipid_is_transport_error() {
    init_logging();
    let (client, server) = loopback_client("Elsewhere");

    let transport = LoopbackTransport::new(server, Ipid::generate());
    let stray = DataCollectorSetClient::new(transport, Ipid::generate());
    assert!(matches!(stray.get_duration().await, Err(PlaError::Transport(_))));
    assert_eq!(client.transport().call_count(), 0);
}

#[tokio::test]
async fn test_dispatch_rejects_unknown_opnum() {
    init_logging();
    let server = Arc::new(MockCollectorSet::new("Raw"));

    // IDispatch::Invoke is not part of the binding
    let result = dispatch(server.as_ref(), 6, Bytes::new(), NdrContext::new()).await;
    assert!(matches!(result, Err(PlaError::UnknownOperation(6))));
}

#[tokio::test]
async fn test_dispatch_raw_stub() {
    init_logging();
    let server = Arc::new(MockCollectorSet::new("Raw"));
    let ctx = NdrContext::new();

    let stub = marshal_request::<GetDescription>(&GetDescriptionRequest::default(), ctx).unwrap();
    let reply = dispatch(server.as_ref(), opnum::GET_DESCRIPTION, stub, ctx).await.unwrap();

    // ORPCTHAT (flags + null extensions), null BSTR pointer, HRESULT
    assert_eq!(reply.len(), 16);
    let response = unmarshal_response::<GetDescription>(reply, ctx).unwrap();
    assert_eq!(response.description, None);
    assert_eq!(response.return_value, 0);
    assert_eq!(GetDescription::OPNUM, opnum::GET_DESCRIPTION);
}
