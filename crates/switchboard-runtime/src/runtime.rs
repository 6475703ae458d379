//! Bot runtime: wires configuration into a router and runs the event loop.
//!
//! ```rust,ignore
//! use switchboard_runtime::BotRuntime;
//!
//! let runtime = BotRuntime::load()?;
//! let bot_config = runtime.load_bot_config().await?;
//! let router = Arc::new(runtime.build_router(&bot_config, commands)?);
//!
//! // The platform client pushes messages into `tx`.
//! let (tx, rx) = tokio::sync::mpsc::channel(64);
//! runtime.run(router, session, rx).await;
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio::signal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::config::{BotConfig, ConfigLoader, SwitchboardConfig};
use crate::error::RuntimeResult;
use crate::logging;
use crate::logs::MuxLogger;
use switchboard_core::{BoxedSession, InboundMessage};
use switchboard_framework::{BoxedCommand, ErrorTexts, Options, Router};

/// A cloneable handle that stops a running event loop.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    token: CancellationToken,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown. Idempotent.
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once shutdown has been requested.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}

/// Owns the process configuration and runs a router against a session.
pub struct BotRuntime {
    config: SwitchboardConfig,
    logger: MuxLogger,
    shutdown: ShutdownHandle,
}

impl BotRuntime {
    /// Loads configuration from the default locations and initializes
    /// logging.
    pub fn load() -> RuntimeResult<Self> {
        let config = ConfigLoader::new().load()?;
        Ok(Self::from_config(&config))
    }

    /// Creates a runtime from already loaded configuration, initializing
    /// logging from it.
    pub fn from_config(config: &SwitchboardConfig) -> Self {
        let logging = config.effective_logging();
        logging::init_from_config(&logging);

        info!(
            log_level = %logging.level,
            log_format = ?logging.format,
            debug = config.debug,
            "Runtime initialized from configuration"
        );

        Self {
            config: config.clone(),
            logger: MuxLogger::new(config.debug),
            shutdown: ShutdownHandle::new(),
        }
    }

    pub fn config(&self) -> &SwitchboardConfig {
        &self.config
    }

    /// Returns the logger commands should report errors through.
    pub fn logger(&self) -> MuxLogger {
        self.logger
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Reads the bot configuration from `config_url` or the data directory.
    pub async fn load_bot_config(&self) -> RuntimeResult<BotConfig> {
        Ok(BotConfig::load(self.config.bot_config_source()).await?)
    }

    /// Builds and initializes a router for `bot`.
    pub fn build_router<I>(&self, bot: &BotConfig, commands: I) -> RuntimeResult<Router>
    where
        I: IntoIterator<Item = BoxedCommand>,
    {
        let mut router = Router::new(&self.config.prefix)?;

        router.use_boxed_middleware(self.logger.middleware());
        router.set_permissions(bot.permissions().clone());
        router.set_errors(ErrorTexts::default());
        router.register(commands);
        router.register_simple(bot.to_simple_commands());
        router.set_options(Options::default());
        router.initialize();

        if self.config.use_fuzzy {
            router.use_fuzzy();
        }

        Ok(router)
    }

    /// Serves `events` until the channel closes, the shutdown handle fires,
    /// or the process receives Ctrl+C or SIGTERM.
    pub async fn run(
        &self,
        router: Arc<Router>,
        session: BoxedSession,
        events: mpsc::Receiver<InboundMessage>,
    ) -> usize {
        let handle = self.shutdown.clone();
        let stop = async move {
            tokio::select! {
                _ = wait_for_shutdown() => {}
                _ = handle.cancelled() => info!("Shutdown requested"),
            }
        };

        info!("Switchboard is now running. Press Ctrl+C to stop.");
        serve(router, session, events, stop).await
    }
}

/// Feeds `events` to `router` one message at a time until the channel closes
/// or `shutdown` resolves, then waits for in-flight commands.
///
/// Returns the number of messages handled.
pub async fn serve<F>(
    router: Arc<Router>,
    session: BoxedSession,
    mut events: mpsc::Receiver<InboundMessage>,
    shutdown: F,
) -> usize
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut handled = 0;

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            event = events.recv() => {
                let Some(message) = event else {
                    debug!("Event channel closed");
                    break;
                };
                let outcome = router.handle(BoxedSession::clone(&session), message).await;
                trace!(?outcome, "Message handled");
                handled += 1;
            }
        }
    }

    router.shutdown().await;
    info!(handled, "Event loop stopped");
    handled
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
pub async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c() => {}
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                }
                return;
            }
            Err(e) => warn!(error = %e, "Failed to register SIGTERM handler"),
        }
    }

    ctrl_c().await;
}

async fn ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => error!(error = %e, "Failed to listen for Ctrl+C, shutting down"),
    }
}
