//! Common test utilities for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use pla::{
    dispatch, hresult, AutoPathFormat, Bstr, DataCollectorSetClient, DataCollectorSetServer,
    DataCollectorSetStatus, Ipid, NdrContext, PlaError, Result, Transport, VariantBool,
};

/// Initialize logging for tests
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pla=debug".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

/// Mutable state behind the mock collector set
#[derive(Debug)]
pub struct CollectorState {
    pub name: String,
    pub duration: u32,
    pub description: Option<Bstr>,
    pub display_name: Option<Bstr>,
    pub root_path: Option<Bstr>,
    pub segment: VariantBool,
    pub segment_max_size: u32,
    pub status: DataCollectorSetStatus,
    pub subdirectory_format: AutoPathFormat,
    pub user: Option<Bstr>,
    pub values: HashMap<String, Option<Bstr>>,
    pub deleted: bool,
}

impl CollectorState {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            duration: 0,
            description: None,
            display_name: None,
            root_path: Some(Bstr::from(format!("C:\\PerfLogs\\Admin\\{name}"))),
            segment: VariantBool::FALSE,
            segment_max_size: 0,
            status: DataCollectorSetStatus::Stopped,
            subdirectory_format: AutoPathFormat::COMPUTER | AutoPathFormat::YEAR_MONTH_DAY,
            user: None,
            values: HashMap::new(),
            deleted: false,
        }
    }
}

/// In-process IDataCollectorSet implementation
pub struct MockCollectorSet {
    pub state: Mutex<CollectorState>,
}

impl MockCollectorSet {
    pub fn new(name: &str) -> Self {
        Self {
            state: Mutex::new(CollectorState::new(name)),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut CollectorState) -> Result<R>) -> Result<R> {
        let mut state = self.state.lock().unwrap();
        if state.deleted {
            return Err(PlaError::Status(hresult::PLA_E_DCS_NOT_FOUND));
        }
        f(&mut state)
    }

    fn ensure_stopped(state: &CollectorState) -> Result<()> {
        if state.status == DataCollectorSetStatus::Running {
            return Err(PlaError::Status(hresult::PLA_E_DCS_IN_USE));
        }
        Ok(())
    }
}

#[async_trait]
impl DataCollectorSetServer for MockCollectorSet {
    async fn get_duration(&self) -> Result<u32> {
        self.with_state(|s| Ok(s.duration))
    }

    async fn set_duration(&self, seconds: u32) -> Result<()> {
        self.with_state(|s| {
            Self::ensure_stopped(s)?;
            s.duration = seconds;
            Ok(())
        })
    }

    async fn get_description(&self) -> Result<Option<Bstr>> {
        self.with_state(|s| Ok(s.description.clone()))
    }

    async fn set_description(&self, description: Option<Bstr>) -> Result<()> {
        self.with_state(|s| {
            s.description = description;
            Ok(())
        })
    }

    async fn get_description_unresolved(&self) -> Result<Option<Bstr>> {
        self.with_state(|s| Ok(s.description.clone()))
    }

    async fn get_display_name(&self) -> Result<Option<Bstr>> {
        self.with_state(|s| Ok(s.display_name.clone().or_else(|| Some(Bstr::from(s.name.as_str())))))
    }

    async fn set_display_name(&self, display_name: Option<Bstr>) -> Result<()> {
        self.with_state(|s| {
            s.display_name = display_name;
            Ok(())
        })
    }

    async fn get_name(&self) -> Result<Option<Bstr>> {
        self.with_state(|s| Ok(Some(Bstr::from(s.name.as_str()))))
    }

    async fn get_root_path(&self) -> Result<Option<Bstr>> {
        self.with_state(|s| Ok(s.root_path.clone()))
    }

    async fn set_root_path(&self, folder: Option<Bstr>) -> Result<()> {
        self.with_state(|s| {
            Self::ensure_stopped(s)?;
            match folder {
                Some(folder) if !folder.as_str().is_empty() => {
                    s.root_path = Some(folder);
                    Ok(())
                }
                _ => Err(PlaError::Status(hresult::E_INVALIDARG)),
            }
        })
    }

    async fn get_segment(&self) -> Result<VariantBool> {
        self.with_state(|s| Ok(s.segment))
    }

    async fn set_segment(&self, segment: VariantBool) -> Result<()> {
        self.with_state(|s| {
            s.segment = segment;
            Ok(())
        })
    }

    async fn get_segment_max_size(&self) -> Result<u32> {
        self.with_state(|s| Ok(s.segment_max_size))
    }

    async fn set_segment_max_size(&self, size: u32) -> Result<()> {
        self.with_state(|s| {
            s.segment_max_size = size;
            Ok(())
        })
    }

    async fn get_status(&self) -> Result<DataCollectorSetStatus> {
        self.with_state(|s| Ok(s.status))
    }

    async fn get_subdirectory_format(&self) -> Result<AutoPathFormat> {
        self.with_state(|s| Ok(s.subdirectory_format))
    }

    async fn set_subdirectory_format(&self, format: AutoPathFormat) -> Result<()> {
        self.with_state(|s| {
            s.subdirectory_format = format;
            Ok(())
        })
    }

    async fn set_credentials(&self, user: Option<Bstr>, password: Option<Bstr>) -> Result<()> {
        self.with_state(|s| {
            if user.is_none() && password.is_some() {
                return Err(PlaError::Status(hresult::PLA_E_CREDENTIALS_REQUIRED));
            }
            s.user = user;
            Ok(())
        })
    }

    async fn delete(&self) -> Result<()> {
        self.with_state(|s| {
            Self::ensure_stopped(s)?;
            s.deleted = true;
            Ok(())
        })
    }

    async fn start(&self, _synchronous: VariantBool) -> Result<()> {
        self.with_state(|s| {
            Self::ensure_stopped(s)?;
            s.status = DataCollectorSetStatus::Running;
            Ok(())
        })
    }

    async fn stop(&self, _synchronous: VariantBool) -> Result<()> {
        self.with_state(|s| {
            if s.status != DataCollectorSetStatus::Running {
                return Err(PlaError::Status(hresult::PLA_E_DCS_NOT_RUNNING));
            }
            s.status = DataCollectorSetStatus::Stopped;
            Ok(())
        })
    }

    async fn set_value(&self, key: Option<Bstr>, value: Option<Bstr>) -> Result<()> {
        self.with_state(|s| {
            let key = key.ok_or(PlaError::Status(hresult::E_POINTER))?;
            s.values.insert(key.into_string(), value);
            Ok(())
        })
    }

    async fn get_value(&self, key: Option<Bstr>) -> Result<Option<Bstr>> {
        self.with_state(|s| {
            let key = key.ok_or(PlaError::Status(hresult::E_POINTER))?;
            Ok(s.values.get(key.as_str()).cloned().flatten())
        })
    }
}

/// Transport that hands stubs straight to an in-process server
pub struct LoopbackTransport<S> {
    pub server: Arc<S>,
    pub ipid: Ipid,
    pub ctx: NdrContext,
    pub calls: AtomicUsize,
}

impl<S> LoopbackTransport<S> {
    pub fn new(server: Arc<S>, ipid: Ipid) -> Self {
        Self {
            server,
            ipid,
            ctx: NdrContext::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: DataCollectorSetServer + 'static> Transport for LoopbackTransport<S> {
    async fn invoke(&self, ipid: &Ipid, opnum: u16, stub: Bytes) -> Result<Bytes> {
        if *ipid != self.ipid {
            return Err(PlaError::Transport(format!("unknown {ipid}")));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        dispatch(self.server.as_ref(), opnum, stub, self.ctx).await
    }
}

/// Client wired to a fresh mock set, plus the server for inspection
pub fn loopback_client(
    name: &str,
) -> (DataCollectorSetClient<LoopbackTransport<MockCollectorSet>>, Arc<MockCollectorSet>) {
    let server = Arc::new(MockCollectorSet::new(name));
    let ipid = Ipid::generate();
    let transport = LoopbackTransport::new(server.clone(), ipid);
    (DataCollectorSetClient::new(transport, ipid), server)
}
