//! The library underneath the document browser.
//!
//! A [Navigator] owns everything a file view needs to stay consistent with the server: the
//! company's folder index, which folder and document are selected, the documents currently
//! shown, uploads into the selected folder, and the preview panel's copy of the selected
//! document.
//!
//! - Most integrators will be interested in the functions attached to [Navigator]. They are
//!   grouped by concern in the [service] module.
//! - The [model] module contains the data structures and the wire contract with the server.
//! - The [io] module contains the http client.
//!
//! All state lives behind `Arc`s, a [Navigator] is cheap to clone and every clone sees the same
//! state. Views learn about changes through [Navigator::subscribe].

#[macro_use]
extern crate tracing;

pub mod io;
pub mod model;
pub mod service;

#[derive(Clone)]
pub struct Navigator {
    pub config: Config,
    pub backend: Arc<dyn Backend>,
    pub session: Arc<RwLock<Option<Session>>>,
    pub state: Arc<RwLock<NavState>>,
    pub events: EventSubs,
    /// Upload batches currently running.
    pub uploads: Arc<AtomicUsize>,
}

impl Navigator {
    /// Sets up logging, talks to the api at [Config::api_url] and picks up a cached session if a
    /// previous run left one behind.
    #[instrument(level = "info", skip_all, err(Debug))]
    pub async fn init(config: Config) -> NavResult<Self> {
        logging::init(&config)?;

        let nav = Self::with_backend(config, Arc::new(Network::default()));
        nav.restore_session().await?;

        Ok(nav)
    }

    /// A navigator with no session, backed by `backend`.
    pub fn with_backend(config: Config, backend: Arc<dyn Backend>) -> Self {
        Self {
            config,
            backend,
            session: Default::default(),
            state: Default::default(),
            events: EventSubs::default(),
            uploads: Default::default(),
        }
    }
}

pub fn get_code_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub static CORE_CODE_VERSION: &str = env!("CARGO_PKG_VERSION");

use io::network::Network;
pub use model::core_config::Config;
pub use model::errors::{NavErr, NavErrKind, NavResult};
use model::session::Session;
use service::backend::Backend;
use service::events::EventSubs;
use service::logging;
use service::state::NavState;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::sync::RwLock;
pub use uuid::Uuid;
