//! Command router for the Switchboard framework.
//!
//! This module provides the [`Router`], the single entry point the host
//! client feeds inbound messages into.
//!
//! # Lifecycle
//!
//! A router has a configuration phase and a dispatch phase:
//!
//! 1. Construct it with [`Router::new`], then register commands, set
//!    options, permissions and error texts, and add middleware. All of these
//!    take `&mut self`.
//! 2. Call [`Router::initialize`] once every command is registered.
//! 3. Share it (usually behind an `Arc`) and call [`Router::handle`] for each
//!    inbound message, one at a time.
//! 4. Call [`Router::shutdown`] to wait for in-flight handler and middleware
//!    tasks.
//!
//! ```rust,ignore
//! use switchboard_framework::{Router, SimpleCommand};
//!
//! let mut router = Router::new("!")?;
//! router.register([ping_command]);
//! router.register_simple([SimpleCommand::new("rules", "Be nice.", "Server rules")]);
//! router.use_fuzzy();
//! router.initialize();
//!
//! let router = Arc::new(router);
//! let outcome = router.handle(session, message).await;
//! ```

use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::future::Future;
use std::sync::Arc;

use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, debug_span, info, trace, warn};

use crate::command::{BoxedCommand, SimpleCommand};
use crate::context::DispatchContext;
use crate::error::{RouterError, RouterResult};
use crate::fuzzy::FuzzyIndex;
use crate::middleware::{Middleware, into_middleware};
use crate::options::{ErrorTexts, Options};
use crate::permission::CommandPermissions;
use crate::service::RouterService;
use switchboard_core::{BoxedSession, InboundMessage, MessageKind, Session};

/// The filter that rejected a message before routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Written by the bot itself.
    SelfAuthored,
    /// No text content.
    Empty,
    /// Not a default-kind message.
    NonDefault,
    /// Written by a bot account.
    Bot,
    /// Not posted inside a group.
    DirectMessage,
    /// Does not start with the prefix.
    MissingPrefix,
}

/// What the router did with a message.
///
/// Every branch other than [`Dispatched`](Self::Dispatched) is fully handled
/// by the time [`Router::handle`] returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Dropped by a filter; nothing was sent.
    Ignored(Filter),
    /// A simple command replied with its static content.
    Simple,
    /// The command was unknown; the listed candidates were suggested.
    Suggested(Vec<String>),
    /// The command was unknown; the not-found text was sent.
    NotFound,
    /// The caller exceeded the rate limit.
    RateLimited,
    /// The caller failed the permission check.
    Denied,
    /// The caller's roles could not be resolved.
    LookupFailed,
    /// Middleware and the handler were spawned.
    Dispatched,
}

/// Routes inbound messages to commands.
pub struct Router {
    prefix: char,
    commands: HashMap<String, BoxedCommand>,
    simple_commands: HashMap<String, SimpleCommand>,
    middleware: Vec<Middleware>,
    options: Options,
    permissions: HashMap<String, CommandPermissions>,
    errors: ErrorTexts,
    fuzzy: Option<FuzzyIndex>,
    tasks: TaskTracker,
}

impl Router {
    /// Creates a router for the given single-character prefix.
    pub fn new(prefix: &str) -> RouterResult<Self> {
        let mut chars = prefix.chars();
        let (Some(prefix), None) = (chars.next(), chars.next()) else {
            return Err(RouterError::InvalidPrefix {
                prefix: prefix.to_string(),
            });
        };

        Ok(Self {
            prefix,
            commands: HashMap::new(),
            simple_commands: HashMap::new(),
            middleware: Vec::new(),
            options: Options::default(),
            permissions: HashMap::new(),
            errors: ErrorTexts::default(),
            fuzzy: None,
            tasks: TaskTracker::new(),
        })
    }

    // ============================================================================
    // Configuration
    // ============================================================================

    /// Registers full commands under the names their settings declare.
    ///
    /// A later command with the same name replaces an earlier one. Commands
    /// with an empty name are skipped.
    pub fn register<I>(&mut self, commands: I)
    where
        I: IntoIterator<Item = BoxedCommand>,
    {
        for command in commands {
            let name = command.settings().name.to_lowercase();
            if name.is_empty() {
                warn!("Skipping command registered without a name");
                continue;
            }
            if self.commands.insert(name.clone(), command).is_some() {
                debug!(command = %name, "Replaced previously registered command");
            } else {
                debug!(command = %name, "Registered command");
            }
        }
    }

    /// Registers simple commands. A later command with the same name replaces
    /// an earlier one.
    pub fn register_simple<I>(&mut self, commands: I)
    where
        I: IntoIterator<Item = SimpleCommand>,
    {
        for command in commands {
            let name = command.name.to_lowercase();
            if name.is_empty() {
                warn!("Skipping simple command registered without a name");
                continue;
            }
            trace!(command = %name, "Registered simple command");
            self.simple_commands.insert(name, command);
        }
    }

    /// Removes every simple command.
    pub fn clear_simple(&mut self) {
        self.simple_commands.clear();
    }

    /// Replaces the message filters.
    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    /// Replaces the permission table. Command names are matched lowercased.
    pub fn set_permissions(&mut self, permissions: HashMap<String, CommandPermissions>) {
        self.permissions = permissions
            .into_iter()
            .map(|(name, perms)| (name.to_lowercase(), perms))
            .collect();
    }

    /// Replaces the user-facing error texts.
    pub fn set_errors(&mut self, errors: ErrorTexts) {
        self.errors = errors;
    }

    /// Adds a middleware function, called for every dispatch that passes the
    /// rate limiter.
    pub fn use_middleware<F, Fut>(&mut self, f: F)
    where
        F: Fn(Arc<DispatchContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.middleware.push(into_middleware(f));
    }

    /// Adds an already type-erased middleware.
    pub fn use_boxed_middleware(&mut self, middleware: Middleware) {
        self.middleware.push(middleware);
    }

    /// Enables fuzzy suggestions, indexing the full commands registered so far.
    pub fn use_fuzzy(&mut self) {
        let index = FuzzyIndex::new(self.commands.keys().cloned());
        debug!(names = index.names().len(), "Fuzzy matching enabled");
        self.fuzzy = Some(index);
    }

    /// Runs every registered command's one-time setup.
    ///
    /// Call after the last [`register`](Self::register) and before the first
    /// [`handle`](Self::handle).
    pub fn initialize(&self) {
        if self.commands.is_empty() {
            return;
        }

        for command in self.commands.values() {
            command.init(self);
        }

        info!(
            commands = self.commands.len(),
            simple_commands = self.simple_commands.len(),
            middleware = self.middleware.len(),
            "Router initialized"
        );
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    /// Returns the command prefix.
    pub fn prefix(&self) -> char {
        self.prefix
    }

    /// Iterates over the registered full commands.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &BoxedCommand)> {
        self.commands.iter().map(|(name, cmd)| (name.as_str(), cmd))
    }

    /// Looks up a full command by name.
    pub fn command(&self, name: &str) -> Option<&BoxedCommand> {
        self.commands.get(name)
    }

    /// Iterates over the registered simple commands.
    pub fn simple_commands(&self) -> impl Iterator<Item = &SimpleCommand> {
        self.simple_commands.values()
    }

    /// Looks up a simple command by name.
    pub fn simple_command(&self, name: &str) -> Option<&SimpleCommand> {
        self.simple_commands.get(name)
    }

    /// Returns the current message filters.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the current error texts.
    pub fn errors(&self) -> &ErrorTexts {
        &self.errors
    }

    /// Returns the permissions configured for `name`, if any.
    pub fn permissions(&self, name: &str) -> Option<&CommandPermissions> {
        self.permissions.get(name)
    }

    /// Returns `true` if fuzzy suggestions are enabled.
    pub fn fuzzy_enabled(&self) -> bool {
        self.fuzzy.is_some()
    }

    /// Returns the number of middleware and handler tasks still running.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Wraps the router in a tower [`Service`](tower::Service).
    pub fn into_service(self) -> RouterService {
        RouterService::new(Arc::new(self))
    }

    // ============================================================================
    // Dispatch
    // ============================================================================

    /// Routes one inbound message.
    ///
    /// Filtering, parsing, lookup and the rate-limit check complete before
    /// this returns, as do any replies the router sends itself. Middleware
    /// and the command handler are spawned and not awaited.
    pub async fn handle(&self, session: BoxedSession, message: InboundMessage) -> DispatchOutcome {
        if let Some(filter) = self.filter(session.as_ref(), &message) {
            trace!(?filter, message_id = %message.id, "Message filtered");
            return DispatchOutcome::Ignored(filter);
        }

        let mut tokens = message.content.split_whitespace();
        let command = tokens
            .next()
            .map(|first| first.strip_prefix(self.prefix).unwrap_or(first))
            .unwrap_or_default()
            .to_lowercase();
        let arguments: Vec<String> = tokens.map(str::to_string).collect();

        let span = debug_span!("dispatch", command = %command, author = %message.author_id);
        self.route(session, message, command, arguments)
            .instrument(span)
            .await
    }

    /// Waits for every in-flight middleware and handler task to finish.
    ///
    /// Messages handled after this call still spawn tasks, but they are no
    /// longer waited for.
    pub async fn shutdown(&self) {
        self.tasks.close();
        debug!(in_flight = self.tasks.len(), "Waiting for dispatched tasks");
        self.tasks.wait().await;
        info!("Router drained");
    }

    /// Waits for the tasks spawned so far, leaving the router usable.
    pub async fn wait_idle(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    fn filter(&self, session: &dyn Session, message: &InboundMessage) -> Option<Filter> {
        let opts = &self.options;

        if opts.ignore_self && message.author_id == session.self_id() {
            return Some(Filter::SelfAuthored);
        }
        if opts.ignore_empty && message.content.is_empty() {
            return Some(Filter::Empty);
        }
        if opts.ignore_non_default && message.kind != MessageKind::Default {
            return Some(Filter::NonDefault);
        }
        if opts.ignore_bots && message.author_bot {
            return Some(Filter::Bot);
        }
        if opts.ignore_dms && !message.in_guild() {
            return Some(Filter::DirectMessage);
        }
        if !message.content.starts_with(self.prefix) {
            return Some(Filter::MissingPrefix);
        }
        None
    }

    /// Runs the simple, lookup, rate-limit, middleware, permission and
    /// handler stages for a parsed command.
    ///
    /// Roles are resolved through the session only for guild messages. A
    /// direct message that reaches a command with a permission entry is
    /// checked with an empty role list, so only the user and channel
    /// whitelists can admit it.
    async fn route(
        &self,
        session: BoxedSession,
        message: InboundMessage,
        command: String,
        arguments: Vec<String>,
    ) -> DispatchOutcome {
        if let Some(simple) = self.simple_commands.get(&command) {
            debug!("Simple command matched");
            self.send(session.as_ref(), &message.channel_id, &simple.content)
                .await;
            return DispatchOutcome::Simple;
        }

        let Some(handler) = self.commands.get(&command) else {
            return self.not_found(session.as_ref(), &message, &command).await;
        };

        let author_id = message.author_id.clone();
        let channel_id = message.channel_id.clone();
        let guild_id = message.guild_id.clone();
        let ctx = Arc::new(DispatchContext::new(
            self.prefix,
            command.as_str(),
            arguments,
            BoxedSession::clone(&session),
            message,
        ));

        if !handler.settings().check_limit(&author_id) {
            debug!("Rate limit exceeded");
            self.send(session.as_ref(), &channel_id, &self.errors.rate_limited)
                .await;
            return DispatchOutcome::RateLimited;
        }

        for middleware in &self.middleware {
            self.tasks.spawn(middleware(Arc::clone(&ctx)));
        }

        if let Some(perms) = self.permissions.get(&command) {
            let roles = match guild_id.as_deref().filter(|g| !g.is_empty()) {
                Some(guild_id) => match session.member_roles(guild_id, &author_id).await {
                    Ok(roles) => roles,
                    Err(e) => {
                        warn!(error = %e, "Failed to resolve member roles");
                        self.send(session.as_ref(), &channel_id, &self.errors.lookup_failed)
                            .await;
                        return DispatchOutcome::LookupFailed;
                    }
                },
                None => Vec::new(),
            };

            if !perms.check(&author_id, &roles, &channel_id) {
                debug!("Permission denied");
                self.send(session.as_ref(), &channel_id, &self.errors.no_permission)
                    .await;
                return DispatchOutcome::Denied;
            }
        }

        debug!("Dispatching command");
        let handler = BoxedCommand::clone(handler);
        self.tasks.spawn(
            async move { handler.handle(ctx).await }.instrument(debug_span!("command", name = %command)),
        );

        DispatchOutcome::Dispatched
    }

    async fn not_found(
        &self,
        session: &dyn Session,
        message: &InboundMessage,
        command: &str,
    ) -> DispatchOutcome {
        if let Some(index) = &self.fuzzy
            && !command.is_empty()
        {
            let candidates = index.find(command);
            if !candidates.is_empty() {
                debug!(?candidates, "Unknown command, suggesting alternatives");
                let mut reply = format!("{} Did you mean:\n", self.errors.not_found);
                for name in &candidates {
                    let _ = writeln!(reply, "- `{}{}`", self.prefix, name);
                }
                self.send(session, &message.channel_id, &reply).await;
                return DispatchOutcome::Suggested(candidates);
            }
        }

        debug!("Unknown command");
        self.send(session, &message.channel_id, &self.errors.not_found)
            .await;
        DispatchOutcome::NotFound
    }

    async fn send(&self, session: &dyn Session, channel_id: &str, content: &str) {
        if let Err(e) = session.send_text(channel_id, content).await {
            warn!(channel = channel_id, error = %e, "Failed to send reply");
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("prefix", &self.prefix)
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .field(
                "simple_commands",
                &self.simple_commands.keys().collect::<Vec<_>>(),
            )
            .field("middleware_count", &self.middleware.len())
            .field("options", &self.options)
            .field("fuzzy", &self.fuzzy.is_some())
            .finish_non_exhaustive()
    }
}
