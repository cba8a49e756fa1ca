//! The connection manager.
//!
//! A [`Client`] owns one server connection at a time. `connect` acquires a
//! transport, sends the registration lines and spawns two tasks: the read
//! loop, which feeds every inbound line through the parser and dispatcher,
//! and the keepalive task, which probes a quiet link with PING. Both tasks
//! and [`Client::disconnect`] end the session through one teardown path,
//! so `connection_closed` is reported exactly once per session.
//!
//! All writes, including PONG replies and keepalive probes, go through a
//! single async mutex around the framed writer.

mod config;
mod handler;

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use futures_util::{SinkExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use tokio::io::{ReadHalf, WriteHalf};
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

pub use self::config::ClientConfig;
pub use self::handler::Handler;

use crate::channels::ChannelRegistry;
use crate::command::Command;
use crate::dispatch::{dispatch, Action};
use crate::error::{ClientError, ProtocolError, Result};
use crate::keepalive::Keepalive;
use crate::line::{DecodedLine, LineCodec};
use crate::message::Message;
use crate::state::{CloseReason, ConnectionState, SessionState};
use crate::transport::{BoxedStream, Connector, TcpConnector, TlsConnector};

type Reader = FramedRead<ReadHalf<BoxedStream>, LineCodec>;
type Writer = FramedWrite<WriteHalf<BoxedStream>, LineCodec>;

/// Handles of one live session.
struct Session {
    id: u64,
    /// Stops the read loop and the keepalive task.
    shutdown: CancellationToken,
    /// Cancelled once teardown has finished.
    done: CancellationToken,
}

struct Inner {
    config: ClientConfig,
    connector: Arc<dyn Connector>,
    handler: RwLock<Option<Weak<dyn Handler>>>,
    state: Mutex<ConnectionState>,
    session_state: SessionState,
    writer: tokio::sync::Mutex<Option<Writer>>,
    session: Mutex<Option<Session>>,
    /// Cancelled by `disconnect` while a connect is in progress.
    pending: Mutex<Option<CancellationToken>>,
    /// Completion token of the most recent session.
    done: Mutex<Option<CancellationToken>>,
    next_session: AtomicU64,
}

/// An IRC client connection.
///
/// Cloning is cheap and every clone drives the same connection.
///
/// ```no_run
/// # async fn run() -> slirc_client::error::Result<()> {
/// use slirc_client::{Client, ClientConfig};
///
/// let client = Client::new(ClientConfig {
///     server: "irc.example.org".into(),
///     nickname: "slirc".into(),
///     ..ClientConfig::default()
/// });
/// client.connect().await?;
/// client.join_channel("#rust").await?;
/// client.send_message("hello", "#rust").await?;
/// client.disconnect(Some("bye")).await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

impl Client {
    /// Create a disconnected client using TCP, or TLS if
    /// [`ClientConfig::use_tls`] is set.
    pub fn new(config: ClientConfig) -> Self {
        let connector: Arc<dyn Connector> = if config.use_tls {
            Arc::new(TlsConnector::new())
        } else {
            Arc::new(TcpConnector)
        };
        Self::with_connector(config, connector)
    }

    /// Create a disconnected client that opens its transport through
    /// `connector`.
    pub fn with_connector(config: ClientConfig, connector: Arc<dyn Connector>) -> Self {
        let session_state = SessionState::new(config.nickname.clone());
        Client {
            inner: Arc::new(Inner {
                config,
                connector,
                handler: RwLock::new(None),
                state: Mutex::new(ConnectionState::Disconnected),
                session_state,
                writer: tokio::sync::Mutex::new(None),
                session: Mutex::new(None),
                pending: Mutex::new(None),
                done: Mutex::new(None),
                next_session: AtomicU64::new(0),
            }),
        }
    }

    /// Register the notification consumer.
    ///
    /// Only a weak reference is kept; once `handler` is dropped,
    /// notifications stop.
    pub fn set_handler<H: Handler + 'static>(&self, handler: &Arc<H>) {
        let weak = Arc::downgrade(handler) as Weak<dyn Handler>;
        *self.inner.handler.write() = Some(weak);
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.lock()
    }

    /// Our nickname as last confirmed by the server.
    pub fn nickname(&self) -> String {
        self.inner.session_state.nickname()
    }

    /// Joined channels and their members.
    pub fn channels(&self) -> &ChannelRegistry {
        self.inner.session_state.channels()
    }

    /// Copy of the members of `channel`, or `None` if we are not in it.
    pub fn users_in_channel(&self, channel: &str) -> Option<HashSet<String>> {
        self.channels().snapshot(channel)
    }

    fn handler(&self) -> Option<Arc<dyn Handler>> {
        self.inner.handler.read().as_ref().and_then(Weak::upgrade)
    }

    fn notify(&self, f: impl FnOnce(&dyn Handler)) {
        if let Some(handler) = self.handler() {
            f(handler.as_ref());
        }
    }

    /// Open the transport and register.
    ///
    /// Returns once NICK and USER have been written; the server's welcome
    /// arrives later through the read loop. On failure the client stays
    /// [`ConnectionState::Disconnected`] and `connect_failed` is reported
    /// instead of `connection_closed`. A [`Client::disconnect`] issued before
    /// the handshake completes makes this fail with
    /// [`ClientError::ConnectAborted`].
    pub async fn connect(&self) -> Result<()> {
        let abort = CancellationToken::new();
        {
            let mut state = self.inner.state.lock();
            if *state != ConnectionState::Disconnected {
                return Err(ClientError::AlreadyConnected);
            }
            *state = ConnectionState::Connecting;
            *self.inner.pending.lock() = Some(abort.clone());
        }

        match self.establish(&abort).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(server = %self.inner.config.address(), error = %e, "connect failed");
                self.inner.pending.lock().take();
                *self.inner.writer.lock().await = None;
                *self.inner.state.lock() = ConnectionState::Disconnected;
                self.notify(|h| h.connect_failed(self, &e));
                Err(e)
            }
        }
    }

    async fn establish(&self, abort: &CancellationToken) -> Result<()> {
        let config = &self.inner.config;
        self.inner.session_state.reset(&config.nickname);
        let read_codec = LineCodec::with_max_len(&config.fallback_encoding, config.max_line_len)?;
        let write_codec = LineCodec::with_max_len(&config.fallback_encoding, config.max_line_len)?;

        let address = config.address();
        info!(server = %address, "connecting");
        let dialed = tokio::select! {
            _ = abort.cancelled() => return Err(ClientError::ConnectAborted),
            dialed = self.inner.connector.connect(&config.server, config.port) => dialed,
        };
        let stream = dialed.map_err(|source| ClientError::Connect {
            server: address.clone(),
            source,
        })?;
        self.notify(|h| h.socket_created(self));

        let (read_half, write_half) = tokio::io::split(stream);
        *self.inner.writer.lock().await = Some(FramedWrite::new(write_half, write_codec));

        self.write_line(&Command::NICK(config.nickname.clone()).to_string())
            .await?;
        let user = Command::USER(
            config.username.clone(),
            "0".to_owned(),
            config.realname.clone(),
        );
        self.write_line(&user.to_string()).await?;
        if abort.is_cancelled() {
            return Err(ClientError::ConnectAborted);
        }

        let id = self.inner.next_session.fetch_add(1, Ordering::Relaxed);
        let shutdown = CancellationToken::new();
        let done = CancellationToken::new();
        {
            let mut session = self.inner.session.lock();
            match self.inner.pending.lock().take() {
                Some(token) if !token.is_cancelled() => {}
                _ => return Err(ClientError::ConnectAborted),
            }
            *session = Some(Session {
                id,
                shutdown: shutdown.clone(),
                done: done.clone(),
            });
            *self.inner.state.lock() = ConnectionState::Connected;
        }
        *self.inner.done.lock() = Some(done);

        info!(server = %address, nickname = %config.nickname, "connection established");
        self.notify(|h| h.connection_established(self));

        let keepalive = Arc::new(Keepalive::new(config.ping_interval, config.ping_timeout));
        tokio::spawn(
            self.clone()
                .run_keepalive(Arc::clone(&keepalive), id, shutdown.clone()),
        );
        tokio::spawn(self.clone().read_loop(
            FramedRead::new(read_half, read_codec),
            keepalive,
            id,
            shutdown,
        ));
        Ok(())
    }

    /// End the session.
    ///
    /// With a `reason`, a QUIT is attempted first; failure to send it is
    /// ignored. A connect still in progress is aborted. Does nothing if no
    /// session is live.
    pub async fn disconnect(&self, reason: Option<&str>) {
        if let Some(abort) = self.inner.pending.lock().take() {
            debug!("aborting connect in progress");
            abort.cancel();
        }
        if let Some(reason) = reason {
            if self.state() == ConnectionState::Connected {
                let quit = Command::QUIT(Some(reason.to_owned()));
                if let Err(e) = self.send_command(&quit).await {
                    debug!(error = %e, "failed to send QUIT");
                }
            }
        }
        self.teardown(None, CloseReason::Requested).await;
    }

    /// Wait until the current session has been torn down. Returns at once
    /// if there is none.
    pub async fn closed(&self) {
        let done = self.inner.done.lock().clone();
        if let Some(done) = done {
            done.cancelled().await;
        }
    }

    /// Tear down session `expected`, or whichever session is live if
    /// `None`. Only the first caller for a session gets past the `take`.
    async fn teardown(&self, expected: Option<u64>, reason: CloseReason) {
        let session = {
            let mut slot = self.inner.session.lock();
            match slot.as_ref() {
                Some(s) if expected.map_or(true, |id| id == s.id) => slot.take(),
                _ => None,
            }
        };
        let Some(session) = session else {
            return;
        };

        session.shutdown.cancel();
        if let Some(mut writer) = self.inner.writer.lock().await.take() {
            if let Err(e) = writer.close().await {
                debug!(error = %e, "error closing transport");
            }
        }
        self.inner.session_state.reset(&self.inner.config.nickname);
        *self.inner.state.lock() = ConnectionState::Disconnected;

        match &reason {
            CloseReason::Requested => info!(%reason, "connection closed"),
            _ => warn!(%reason, "connection closed"),
        }
        self.notify(|h| h.connection_closed(self, &reason));
        session.done.cancel();
    }

    async fn read_loop(
        self,
        mut reader: Reader,
        keepalive: Arc<Keepalive>,
        id: u64,
        shutdown: CancellationToken,
    ) {
        let reason = loop {
            let next = tokio::select! {
                _ = shutdown.cancelled() => return,
                next = reader.next() => next,
            };
            match next {
                Some(Ok(line)) => {
                    keepalive.touch();
                    self.handle_line(line, id).await;
                }
                Some(Err(e)) => break CloseReason::ConnectionLost(e.to_string()),
                None => break CloseReason::ConnectionLost("end of stream".to_owned()),
            }
        };
        self.teardown(Some(id), reason).await;
    }

    async fn run_keepalive(
        self,
        keepalive: Arc<Keepalive>,
        id: u64,
        shutdown: CancellationToken,
    ) {
        let reason = tokio::select! {
            _ = shutdown.cancelled() => return,
            reason = self.probe(&keepalive) => reason,
        };
        self.teardown(Some(id), reason).await;
    }

    /// Send a PING after every quiet interval until one goes unanswered.
    async fn probe(&self, keepalive: &Keepalive) -> CloseReason {
        loop {
            let token = keepalive.idle().await;
            if let Err(e) = self.write_line(&Command::PING(token).to_string()).await {
                return CloseReason::ConnectionLost(e.to_string());
            }
            if !keepalive.await_reply().await {
                warn!(timeout = ?self.inner.config.ping_timeout, "no reply to PING");
                return CloseReason::PingTimeout;
            }
        }
    }

    /// Apply one inbound line of session `id`. Lines that arrive after the
    /// session was torn down are dropped without touching membership.
    async fn handle_line(&self, line: DecodedLine, id: u64) {
        trace!(line = %line.text, "received");
        if line.used_fallback {
            warn!(
                encoding = %self.inner.config.fallback_encoding,
                "line is not valid UTF-8, decoded with fallback encoding"
            );
        }
        self.notify(|h| h.line_received(self, &line));

        let msg = match Message::parse(&line.text) {
            Ok(msg) => msg,
            Err(cause) => {
                debug!(line = %line.text, error = %cause, "dropping malformed line");
                return;
            }
        };
        // Teardown takes the session under this lock before it clears
        // membership, so a line is either applied first or not at all.
        let action = {
            let session = self.inner.session.lock();
            if !session.as_ref().is_some_and(|s| s.id == id) {
                trace!(line = %line.text, "session ended, dropping line");
                return;
            }
            dispatch(&self.inner.session_state, &msg)
        };
        if let Err(e) = self.perform(action).await {
            debug!(error = %e, "failed to send reply");
        }
    }

    /// Parse `line` and apply it exactly as the read loop would: update
    /// membership, write any protocol reply and notify the handler.
    ///
    /// Fails with [`ProtocolError::InvalidMessage`] if `line` cannot be
    /// parsed, or with the write error if a reply could not be sent.
    pub async fn process_line(&self, line: &str) -> Result<()> {
        let msg = Message::parse(line).map_err(|cause| ProtocolError::InvalidMessage {
            string: line.to_owned(),
            cause,
        })?;

        self.perform(dispatch(&self.inner.session_state, &msg)).await
    }

    async fn perform(&self, action: Option<Action>) -> Result<()> {
        match action {
            Some(Action::Send(reply)) => self.write_line(&reply.to_string()).await,
            Some(Action::Notify(event)) => {
                if let Some(consumer) = self.handler() {
                    handler::deliver(consumer.as_ref(), self, &event);
                }
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Write one line under the write lock. Does not check the connection
    /// state, so it also serves the handshake.
    async fn write_line(&self, line: &str) -> Result<()> {
        {
            let mut writer = self.inner.writer.lock().await;
            let sink = writer.as_mut().ok_or(ClientError::NotConnected)?;
            sink.send(line.to_owned()).await?;
        }
        trace!(line, "sent");
        self.notify(|h| h.line_sent(self, line));
        Ok(())
    }

    /// Write a raw protocol line.
    ///
    /// Anything from the first CR or LF on is cut off. Fails with
    /// [`ClientError::NotConnected`] unless connected, in which case
    /// nothing is written.
    pub async fn send_line(&self, line: &str) -> Result<()> {
        if self.state() != ConnectionState::Connected {
            return Err(ClientError::NotConnected);
        }
        let line = LineCodec::sanitize(line);
        if line.len() > self.inner.config.max_line_len {
            return Err(ProtocolError::MessageTooLong {
                actual: line.len(),
                limit: self.inner.config.max_line_len,
            }
            .into());
        }
        if line.contains('\0') {
            return Err(ProtocolError::IllegalControlChar('\0').into());
        }
        self.write_line(line).await
    }

    pub async fn send_command(&self, command: &Command) -> Result<()> {
        self.send_line(&command.to_string()).await
    }

    /// `PRIVMSG <target> :<text>`
    pub async fn send_message(&self, text: &str, target: &str) -> Result<()> {
        self.send_command(&Command::PRIVMSG(target.to_owned(), text.to_owned()))
            .await
    }

    /// `NOTICE <target> :<text>`
    pub async fn send_notice(&self, text: &str, target: &str) -> Result<()> {
        self.send_command(&Command::NOTICE(target.to_owned(), text.to_owned()))
            .await
    }

    pub async fn join_channel(&self, channel: &str) -> Result<()> {
        self.send_command(&Command::JOIN(channel.to_owned())).await
    }

    pub async fn leave_channel(&self, channel: &str, reason: Option<&str>) -> Result<()> {
        self.send_command(&Command::PART(
            channel.to_owned(),
            reason.map(str::to_owned),
        ))
        .await
    }

    pub async fn kick_user(&self, user: &str, channel: &str, reason: Option<&str>) -> Result<()> {
        self.send_command(&Command::KICK(
            channel.to_owned(),
            user.to_owned(),
            reason.map(str::to_owned),
        ))
        .await
    }

    /// Request a new nickname. [`Client::nickname`] changes only once the
    /// server confirms it with a NICK of its own.
    pub async fn change_nickname_to(&self, nickname: &str) -> Result<()> {
        self.send_command(&Command::NICK(nickname.to_owned())).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("server", &self.inner.config.address())
            .field("state", &self.state())
            .field("nickname", &self.nickname())
            .finish_non_exhaustive()
    }
}
