//! Game controller: the randomized-pause round state machine.
//!
//! The controller owns the single live [`GameSession`], the attached
//! playback device handle, and two tokio tasks: the one-shot pause timer
//! and the position polling loop. Arming a timer always replaces and
//! aborts the previous one, so at most one pause is ever pending. A fired
//! pause is not cancellable.
//!
//! The device itself is externally owned; the host forwards its push
//! notifications through [`handle_player_event`](GameController::handle_player_event).

use crate::catalog::{CatalogClient, TrackHit};
use crate::error::{GameError, Result};
use crate::session::{draw_pause_delay_ms, validate_range, GamePhase, GameSession};
use bridge_traits::player::{PlaybackSnapshot, PlayerDevice, PlayerEvent};
use core_auth::AuthManager;
use core_runtime::{CoreConfig, CoreEvent, EventBus, GameEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

#[derive(Default)]
struct DeviceState {
    handle: Option<Arc<dyn PlayerDevice>>,
    device_id: Option<String>,
    last_snapshot: Option<PlaybackSnapshot>,
}

struct ControllerInner {
    config: CoreConfig,
    auth: Arc<AuthManager>,
    events: EventBus,
    catalog: CatalogClient,
    session: Mutex<GameSession>,
    device: RwLock<DeviceState>,
    pause_timer: Mutex<Option<JoinHandle<()>>>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

/// Controls game rounds over an externally-owned playback device.
///
/// # Examples
///
/// ```ignore
/// use core_game::GameController;
/// use core_runtime::{CoreConfig, EventBus};
/// use core_auth::AuthManager;
/// use std::sync::Arc;
///
/// # async fn example(config: CoreConfig, device: Arc<dyn bridge_traits::player::PlayerDevice>) {
/// let events = EventBus::default();
/// let auth = Arc::new(AuthManager::new(config.clone(), events.clone()));
/// let controller = GameController::new(config, auth, events);
///
/// controller.attach_device(device).await.ok();
/// controller.start_game(5, 15).await.ok();
/// # }
/// ```
pub struct GameController {
    inner: Arc<ControllerInner>,
}

impl GameController {
    /// Create a new controller.
    pub fn new(config: CoreConfig, auth: Arc<AuthManager>, events: EventBus) -> Self {
        let catalog = CatalogClient::new(config.clone(), Arc::clone(&auth));
        Self {
            inner: Arc::new(ControllerInner {
                config,
                auth,
                events,
                catalog,
                session: Mutex::new(GameSession::default()),
                device: RwLock::new(DeviceState::default()),
                pause_timer: Mutex::new(None),
                poll_task: Mutex::new(None),
            }),
        }
    }

    /// Attach and connect a playback device handle.
    ///
    /// The device id still arrives separately through
    /// [`PlayerEvent::Ready`] once the device is online.
    pub async fn attach_device(&self, device: Arc<dyn PlayerDevice>) -> Result<bool> {
        let connected = device.connect().await.map_err(|e| {
            warn!(error = %e, "Device connect failed");
            GameError::PlayerNotReady
        })?;
        self.inner.device.write().await.handle = Some(device);
        Ok(connected)
    }

    /// Start a new round.
    ///
    /// Requires an actively-playing track and a non-empty pause window.
    /// Restarts the track from position 0, then arms a pause timer for a
    /// fresh uniform draw from `[min_seconds, max_seconds)`. Arming
    /// replaces any previously pending timer.
    ///
    /// # Errors
    ///
    /// - [`GameError::PlayerNotReady`] without a device handle, or when a
    ///   transport command is rejected
    /// - [`GameError::NoActivePlayback`] unless a track is playing
    /// - [`GameError::InvalidRange`] when `min_seconds >= max_seconds`
    #[instrument(skip(self))]
    pub async fn start_game(&self, min_seconds: u64, max_seconds: u64) -> Result<()> {
        let device = self.player_handle().await.ok_or(GameError::PlayerNotReady)?;

        let playing = matches!(
            device.current_state().await,
            Ok(Some(ref snapshot)) if snapshot.is_playing()
        );
        if !playing {
            return Err(GameError::NoActivePlayback);
        }

        validate_range(min_seconds, max_seconds)?;

        device.seek(0).await.map_err(|e| {
            warn!(error = %e, "Seek rejected while starting round");
            GameError::PlayerNotReady
        })?;
        device.resume().await.map_err(|e| {
            warn!(error = %e, "Resume rejected while starting round");
            GameError::PlayerNotReady
        })?;

        let delay_ms = draw_pause_delay_ms(min_seconds, max_seconds);
        {
            let mut session = self.inner.session.lock().await;
            *session = GameSession {
                min_seconds,
                max_seconds,
                // Track restarts at 0, so the pause position equals the delay
                pause_at_ms: Some(delay_ms),
                is_active: true,
                phase: GamePhase::Armed,
            };
        }

        self.arm_pause_timer(delay_ms).await;

        info!(delay_ms, "Round started");
        self.inner
            .events
            .emit(CoreEvent::Game(GameEvent::Armed {
                pause_at_ms: delay_ms,
            }))
            .ok();
        Ok(())
    }

    /// Stop the current round.
    ///
    /// Idempotent from any state: aborts a pending timer if there is one,
    /// pauses the device if a handle is attached, and clears the session.
    /// Never fails.
    #[instrument(skip(self))]
    pub async fn stop_game(&self) {
        if let Some(handle) = self.inner.pause_timer.lock().await.take() {
            handle.abort();
        }

        if let Some(device) = self.player_handle().await {
            if let Err(e) = device.pause().await {
                debug!(error = %e, "Pause command failed while stopping");
            }
        }

        {
            let mut session = self.inner.session.lock().await;
            session.pause_at_ms = None;
            session.is_active = false;
            session.phase = GamePhase::Stopped;
        }

        info!("Round stopped");
        self.inner
            .events
            .emit(CoreEvent::Game(GameEvent::Stopped))
            .ok();
    }

    /// Resume playback and arm the next pause.
    ///
    /// Used after a game pause to keep the round going: the next pause
    /// position is the last known track position plus a fresh draw from
    /// the configured window. The position is best-effort; drift between
    /// the cached sample and the real transport is accepted.
    ///
    /// # Errors
    ///
    /// - [`GameError::PlayerNotReady`] without a device handle, or when
    ///   the resume command is rejected
    /// - [`GameError::InvalidRange`] when the stored window is empty
    #[instrument(skip(self))]
    pub async fn continue_game(&self) -> Result<()> {
        let device = self.player_handle().await.ok_or(GameError::PlayerNotReady)?;

        let (min_seconds, max_seconds) = {
            let session = self.inner.session.lock().await;
            (session.min_seconds, session.max_seconds)
        };
        validate_range(min_seconds, max_seconds)?;

        device.resume().await.map_err(|e| {
            warn!(error = %e, "Resume rejected while continuing round");
            GameError::PlayerNotReady
        })?;

        let position_ms = self.last_known_position(&device).await;
        let delay_ms = draw_pause_delay_ms(min_seconds, max_seconds);
        let pause_at_ms = position_ms + delay_ms;

        {
            let mut session = self.inner.session.lock().await;
            session.pause_at_ms = Some(pause_at_ms);
            session.is_active = true;
            session.phase = GamePhase::Armed;
        }

        self.arm_pause_timer(delay_ms).await;

        info!(position_ms, delay_ms, "Round continued");
        self.inner
            .events
            .emit(CoreEvent::Game(GameEvent::Armed { pause_at_ms }))
            .ok();
        Ok(())
    }

    /// Search the catalog for tracks matching `query`.
    pub async fn search_tracks(&self, query: &str) -> Result<Vec<TrackHit>> {
        self.inner.catalog.search_tracks(query).await
    }

    /// Start playback of `uri` on the ready device.
    ///
    /// # Errors
    ///
    /// - [`GameError::PlayerNotReady`] before the device reported ready
    /// - catalog errors from the underlying playback command call
    pub async fn play_track(&self, uri: &str) -> Result<()> {
        let device_id = self
            .inner
            .device
            .read()
            .await
            .device_id
            .clone()
            .ok_or(GameError::PlayerNotReady)?;

        self.inner.catalog.play_track(uri, &device_id).await?;

        self.inner
            .events
            .emit(CoreEvent::Game(GameEvent::TrackStarted {
                uri: uri.to_string(),
            }))
            .ok();
        Ok(())
    }

    /// Handle a push notification from the playback device.
    ///
    /// Device faults never propagate as errors from here: auth faults
    /// force a logout, account and initialization faults surface as user
    /// messages on the event bus.
    pub async fn handle_player_event(&self, event: PlayerEvent) {
        match event {
            PlayerEvent::Ready { device_id } => {
                info!(device_id = %device_id, "Playback device ready");
                self.inner.device.write().await.device_id = Some(device_id.clone());
                self.inner
                    .events
                    .emit(CoreEvent::Game(GameEvent::DeviceReady { device_id }))
                    .ok();
            }
            PlayerEvent::NotReady { device_id } => {
                info!(device_id = %device_id, "Playback device offline");
                self.inner.device.write().await.device_id = None;
                self.inner
                    .events
                    .emit(CoreEvent::Game(GameEvent::DeviceOffline))
                    .ok();
            }
            PlayerEvent::StateChanged(Some(snapshot)) => {
                let playing = snapshot.is_playing();
                self.inner
                    .events
                    .emit(CoreEvent::Game(GameEvent::PositionChanged {
                        position_ms: snapshot.position_ms,
                        duration_ms: snapshot.track.duration_ms,
                    }))
                    .ok();
                self.inner.device.write().await.last_snapshot = Some(snapshot);

                if playing {
                    ControllerInner::start_polling(&self.inner).await;
                } else {
                    self.inner.stop_polling().await;
                }
            }
            PlayerEvent::StateChanged(None) => {
                self.inner.device.write().await.last_snapshot = None;
                self.inner.stop_polling().await;
            }
            PlayerEvent::AuthenticationError { message } => {
                let fault = GameError::DeviceAuth(message);
                warn!(error = %fault, "Signing out after device fault");
                if let Err(e) = self.inner.auth.logout().await {
                    warn!(error = %e, "Logout after device auth failure failed");
                }
                self.inner
                    .events
                    .emit(CoreEvent::Game(GameEvent::Message {
                        text: fault.to_string(),
                    }))
                    .ok();
            }
            PlayerEvent::AccountError { message } => {
                let fault = GameError::DeviceAccount(message);
                warn!(error = %fault, "Playback unavailable for this account");
                self.inner
                    .events
                    .emit(CoreEvent::Game(GameEvent::Message {
                        text: fault.to_string(),
                    }))
                    .ok();
            }
            PlayerEvent::InitializationError { message } => {
                warn!(error = %message, "Playback device failed to initialize");
                self.inner
                    .events
                    .emit(CoreEvent::Game(GameEvent::Message {
                        text: format!("Player failed to initialize: {}", message),
                    }))
                    .ok();
            }
        }
    }

    /// Tear the controller down: abort the pause timer and polling task,
    /// and disconnect the device if one is attached.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.inner.pause_timer.lock().await.take() {
            handle.abort();
        }
        self.inner.stop_polling().await;

        let device = self.inner.device.write().await.handle.take();
        if let Some(device) = device {
            device.disconnect().await;
        }
        debug!("Controller shut down");
    }

    /// Snapshot of the current session state.
    pub async fn session(&self) -> GameSession {
        self.inner.session.lock().await.clone()
    }

    /// Device id reported by the last `Ready` event, if any.
    pub async fn device_id(&self) -> Option<String> {
        self.inner.device.read().await.device_id.clone()
    }

    async fn player_handle(&self) -> Option<Arc<dyn PlayerDevice>> {
        self.inner.device.read().await.handle.clone()
    }

    /// Last polled position, falling back to a direct device sample.
    async fn last_known_position(&self, device: &Arc<dyn PlayerDevice>) -> u64 {
        let cached = self
            .inner
            .device
            .read()
            .await
            .last_snapshot
            .as_ref()
            .map(|snapshot| snapshot.position_ms);

        match cached {
            Some(position) => position,
            None => device
                .current_state()
                .await
                .ok()
                .flatten()
                .map(|snapshot| snapshot.position_ms)
                .unwrap_or(0),
        }
    }

    /// Arm the one-shot pause timer, replacing and aborting any pending
    /// one.
    async fn arm_pause_timer(&self, delay_ms: u64) {
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            inner.fire_pause().await;
        });

        let mut guard = self.inner.pause_timer.lock().await;
        if let Some(previous) = guard.replace(handle) {
            previous.abort();
        }
    }
}

impl ControllerInner {
    /// The armed timer elapsed: pause the transport and settle the round.
    ///
    /// The pause command is fire-and-forget; a device fault here is
    /// logged and swallowed. Not cancellable once entered.
    async fn fire_pause(&self) {
        let device = self.device.read().await.handle.clone();
        if let Some(device) = device {
            if let Err(e) = device.pause().await {
                debug!(error = %e, "Pause command failed after timer fired");
            }
        }

        {
            let mut session = self.session.lock().await;
            session.pause_at_ms = None;
            session.is_active = false;
            session.phase = GamePhase::PausedByGame;
        }

        info!("Pause timer fired");
        self.events.emit(CoreEvent::Game(GameEvent::Paused)).ok();
    }

    /// Start the position polling loop if it is not already running.
    async fn start_polling(inner: &Arc<Self>) {
        let mut guard = inner.poll_task.lock().await;
        if guard.is_some() {
            return;
        }

        let poller = Arc::clone(inner);
        let interval = inner.config.position_poll_interval;
        *guard = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;

                let device = poller.device.read().await.handle.clone();
                let Some(device) = device else { continue };

                match device.current_state().await {
                    Ok(Some(snapshot)) => {
                        poller
                            .events
                            .emit(CoreEvent::Game(GameEvent::PositionChanged {
                                position_ms: snapshot.position_ms,
                                duration_ms: snapshot.track.duration_ms,
                            }))
                            .ok();
                        poller.device.write().await.last_snapshot = Some(snapshot);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        // Transient poll faults never disturb the round
                        debug!(error = %e, "Playback state poll failed");
                    }
                }
            }
        }));
    }

    async fn stop_polling(&self) {
        if let Some(handle) = self.poll_task.lock().await.take() {
            handle.abort();
        }
    }
}
