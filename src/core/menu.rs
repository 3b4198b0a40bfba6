//! Menu lifecycle manager.
//!
//! A menu is a row of buttons bound to one message. While active it listens to
//! component presses on the shared [`EventSource`], checks who pressed,
//! acknowledges, runs the matching button's handler and pushes its inactivity
//! deadline back. It ends exactly once, on inactivity or when application code
//! calls [`MenuHandle::end`] or [`MenuHandle::cancel`]: the buttons are
//! rendered disabled, the timer is stopped and the subscription is released.
//!
//! ```text
//! Active --(timeout | end | cancel)--> Finalizing --> Ended
//! ```
//!
//! The transition out of `Active` is a compare-and-swap, so whichever trigger
//! gets there first finalizes and every later trigger is a no-op.

use crate::{
    core::{
        auth::AllowedActors,
        command::BoxFuture,
        events::{EventSource, Subscription},
        interaction::{
            ButtonDescriptor, ComponentKind, Interaction, InteractionKind, MessageRef, Reply,
        },
        platform::Platform,
    },
    errors::{Error, Result},
};
use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, error, trace, warn};

/// Inactivity window used when none is configured.
pub const DEFAULT_INACTIVITY: Duration = Duration::from_secs(120);

/// Ephemeral refusal shown to actors outside the allow list.
pub const NOT_FOR_YOU: &str = "This menu is not for you";

/// Shown to the actor when a button handler fails.
pub const BUTTON_FAILURE_NOTICE: &str = "There was an error handling the button press.";

/// Type-erased button handler.
pub type ButtonHandler = Arc<dyn Fn(MenuPress) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// A button and what pressing it does.
#[derive(Clone)]
pub struct MenuButton {
    /// How the button looks; `custom_id` must be unique within the menu
    pub descriptor: ButtonDescriptor,
    handler: ButtonHandler,
}

impl std::fmt::Debug for MenuButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuButton")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl MenuButton {
    /// Pairs a descriptor with its handler.
    pub fn new<F, Fut>(descriptor: ButtonDescriptor, handler: F) -> Self
    where
        F: Fn(MenuPress) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            descriptor,
            handler: Arc::new(move |press| Box::pin(handler(press))),
        }
    }
}

/// Who may use a menu and how long it waits for them.
#[derive(Debug, Clone)]
pub struct MenuOptions {
    /// Actors whose presses are honoured
    pub allowed_actors: AllowedActors,
    /// Time without an accepted press after which the menu ends
    pub inactivity: Duration,
}

impl MenuOptions {
    /// Options with the default inactivity window.
    #[must_use]
    pub fn new(allowed_actors: AllowedActors) -> Self {
        Self {
            allowed_actors,
            inactivity: DEFAULT_INACTIVITY,
        }
    }

    /// Overrides the inactivity window.
    #[must_use]
    pub fn inactivity(mut self, inactivity: Duration) -> Self {
        self.inactivity = inactivity;
        self
    }
}

/// Lifecycle state of a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MenuState {
    /// Accepting presses
    Active = 0,
    /// A finalize trigger won; cleanup in progress
    Finalizing = 1,
    /// Cleaned up; terminal
    Ended = 2,
}

impl MenuState {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Active,
            1 => Self::Finalizing,
            _ => Self::Ended,
        }
    }
}

/// What ended a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// No accepted press within the inactivity window
    Timeout,
    /// Application code cancelled it
    Cancelled,
    /// Application code ended it gracefully
    Ended,
}

/// One accepted press, handed to the button's handler.
#[derive(Clone, Debug)]
pub struct MenuPress {
    /// The press, already acknowledged
    pub interaction: Arc<Interaction>,
    /// The menu that received it
    pub menu: MenuHandle,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct MenuInner {
    platform: Arc<dyn Platform>,
    message: MessageRef,
    content: Mutex<Reply>,
    buttons: Vec<MenuButton>,
    allowed_actors: AllowedActors,
    inactivity: Duration,
    state: AtomicU8,
    deadline: watch::Sender<Instant>,
    timer: Mutex<Option<JoinHandle<()>>>,
    subscription: Mutex<Option<Subscription>>,
    ended: watch::Sender<Option<EndReason>>,
}

impl MenuInner {
    fn state(&self) -> MenuState {
        MenuState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn render(&self, disabled: bool) -> Reply {
        let buttons = self
            .buttons
            .iter()
            .map(|button| ButtonDescriptor {
                disabled,
                ..button.descriptor.clone()
            })
            .collect();
        lock(&self.content).clone().with_buttons(buttons)
    }

    fn reset_timer(&self) {
        self.deadline.send_replace(Instant::now() + self.inactivity);
    }

    /// Runs on the publishing task: cheap checks only, I/O goes to spawned tasks.
    fn on_press(self: &Arc<Self>, interaction: Arc<Interaction>) {
        if self.state() != MenuState::Active {
            return;
        }
        let Some(press) = interaction.component() else {
            return;
        };
        if press.kind != ComponentKind::Button || press.message != self.message {
            return;
        }

        if !self.allowed_actors.permits(&interaction) {
            debug!(
                user = interaction.user.id,
                message = self.message.message_id,
                "Refused menu press from unlisted actor"
            );
            let platform = Arc::clone(&self.platform);
            tokio::spawn(async move {
                if let Err(e) = platform.respond_ephemeral(&interaction, NOT_FOR_YOU).await {
                    warn!("Failed to send menu refusal: {}", e);
                }
            });
            return;
        }

        self.reset_timer();
        let menu = Arc::clone(self);
        tokio::spawn(async move { menu.dispatch(interaction).await });
    }

    async fn dispatch(self: Arc<Self>, interaction: Arc<Interaction>) {
        if let Err(e) = self.platform.acknowledge(&interaction).await {
            error!("Failed to acknowledge menu press: {}", e);
            return;
        }

        let Some(custom_id) = interaction.component().map(|press| press.custom_id.as_str()) else {
            return;
        };
        let Some(button) = self
            .buttons
            .iter()
            .find(|button| button.descriptor.custom_id == custom_id)
        else {
            debug!("No button `{}` on this menu", custom_id);
            return;
        };

        let press = MenuPress {
            interaction: Arc::clone(&interaction),
            menu: MenuHandle {
                inner: Arc::clone(&self),
            },
        };
        if let Err(e) = (button.handler)(press).await {
            error!("Error in menu button `{}`: {:?}", custom_id, e);
            let notice = Reply::text(BUTTON_FAILURE_NOTICE).ephemeral();
            if let Err(e) = self.platform.send_follow_up(&interaction, &notice).await {
                error!("Failed to send error message: {}", e);
            }
        }
    }

    async fn finalize(&self, reason: EndReason) -> bool {
        if self
            .state
            .compare_exchange(
                MenuState::Active as u8,
                MenuState::Finalizing as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            trace!(?reason, "Menu already finalizing");
            return false;
        }

        let disabled = self.render(true);
        if let Err(e) = self.platform.edit_message(&self.message, &disabled).await {
            warn!("Failed to disable menu buttons: {}", e);
        }

        // On timeout the timer task is the caller and finishes by itself
        let timer = lock(&self.timer).take();
        if reason != EndReason::Timeout {
            if let Some(timer) = timer {
                timer.abort();
            }
        }

        let subscription = lock(&self.subscription).take();
        drop(subscription);

        self.state.store(MenuState::Ended as u8, Ordering::Release);
        self.ended.send_replace(Some(reason));
        debug!(?reason, message = self.message.message_id, "Menu ended");
        true
    }
}

async fn run_timer(menu: Arc<MenuInner>, mut deadline: watch::Receiver<Instant>) {
    loop {
        let at = *deadline.borrow_and_update();
        tokio::select! {
            () = time::sleep_until(at) => break,
            changed = deadline.changed() => {
                if changed.is_err() {
                    return;
                }
            }
        }
    }
    menu.finalize(EndReason::Timeout).await;
}

/// Entry points for creating menus.
pub struct Menu;

impl Menu {
    /// Sends `content` as a follow-up to `origin` with the button row attached,
    /// and binds a menu to that message.
    pub async fn open(
        platform: Arc<dyn Platform>,
        events: &EventSource,
        origin: &Interaction,
        content: Reply,
        buttons: Vec<MenuButton>,
        options: MenuOptions,
    ) -> Result<MenuHandle> {
        check_unique_ids(&buttons)?;
        let initial = render_initial(&content, &buttons);
        let message = platform.send_follow_up(origin, &initial).await?;
        Ok(Self::start(platform, events, message, content, buttons, options))
    }

    /// Attaches the button row to an existing message and binds a menu to it.
    pub async fn attach(
        platform: Arc<dyn Platform>,
        events: &EventSource,
        message: MessageRef,
        content: Reply,
        buttons: Vec<MenuButton>,
        options: MenuOptions,
    ) -> Result<MenuHandle> {
        check_unique_ids(&buttons)?;
        let initial = render_initial(&content, &buttons);
        platform.edit_message(&message, &initial).await?;
        Ok(Self::start(platform, events, message, content, buttons, options))
    }

    fn start(
        platform: Arc<dyn Platform>,
        events: &EventSource,
        message: MessageRef,
        content: Reply,
        buttons: Vec<MenuButton>,
        options: MenuOptions,
    ) -> MenuHandle {
        let (deadline, deadline_rx) = watch::channel(Instant::now() + options.inactivity);
        let (ended, _) = watch::channel(None);
        let inner = Arc::new(MenuInner {
            platform,
            message,
            content: Mutex::new(Reply {
                buttons: Vec::new(),
                ..content
            }),
            buttons,
            allowed_actors: options.allowed_actors,
            inactivity: options.inactivity,
            state: AtomicU8::new(MenuState::Active as u8),
            deadline,
            timer: Mutex::new(None),
            subscription: Mutex::new(None),
            ended,
        });

        let weak: Weak<MenuInner> = Arc::downgrade(&inner);
        let subscription = events.subscribe(InteractionKind::Component, move |interaction| {
            if let Some(menu) = weak.upgrade() {
                menu.on_press(interaction);
            }
        });
        *lock(&inner.subscription) = Some(subscription);
        *lock(&inner.timer) = Some(tokio::spawn(run_timer(Arc::clone(&inner), deadline_rx)));

        debug!(
            message = message.message_id,
            buttons = inner.buttons.len(),
            inactivity_ms = u64::try_from(inner.inactivity.as_millis()).unwrap_or(u64::MAX),
            "Menu opened"
        );
        MenuHandle { inner }
    }
}

fn check_unique_ids(buttons: &[MenuButton]) -> Result<()> {
    let mut seen = HashSet::new();
    for button in buttons {
        if !seen.insert(button.descriptor.custom_id.as_str()) {
            return Err(Error::Config {
                message: format!(
                    "Duplicate button id `{}` in one menu",
                    button.descriptor.custom_id
                ),
            });
        }
    }
    Ok(())
}

fn render_initial(content: &Reply, buttons: &[MenuButton]) -> Reply {
    content
        .clone()
        .with_buttons(buttons.iter().map(|b| b.descriptor.clone()).collect())
}

/// Cloneable handle to a live (or finished) menu.
#[derive(Clone)]
pub struct MenuHandle {
    inner: Arc<MenuInner>,
}

impl std::fmt::Debug for MenuHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuHandle")
            .field("message", &self.inner.message)
            .field("state", &self.inner.state())
            .finish_non_exhaustive()
    }
}

impl MenuHandle {
    /// The message the menu is bound to.
    #[must_use]
    pub fn message(&self) -> MessageRef {
        self.inner.message
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> MenuState {
        self.inner.state()
    }

    /// Ends the menu gracefully. Returns `false` if it had already ended.
    pub async fn end(&self) -> bool {
        self.inner.finalize(EndReason::Ended).await
    }

    /// Cancels the menu. Returns `false` if it had already ended.
    pub async fn cancel(&self) -> bool {
        self.inner.finalize(EndReason::Cancelled).await
    }

    /// Replaces the message content, keeping the button row.
    ///
    /// Does nothing once the menu has left `Active`, so a slow handler cannot
    /// re-enable the buttons of a finished menu.
    pub async fn edit(&self, content: Reply) -> Result<()> {
        if self.state() != MenuState::Active {
            debug!("Skipping edit of an ended menu");
            return Ok(());
        }
        *lock(&self.inner.content) = Reply {
            buttons: Vec::new(),
            ..content
        };
        let rendered = self.inner.render(false);
        self.inner
            .platform
            .edit_message(&self.inner.message, &rendered)
            .await
    }

    /// Waits until the menu has ended and reports why.
    pub async fn wait_ended(&self) -> EndReason {
        let mut ended = self.inner.ended.subscribe();
        ended
            .wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|reason| *reason)
            .unwrap_or(EndReason::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::interaction::{ComponentPress, Embed, Payload};
    use crate::test_utils::{RecordingPlatform, command_interaction, press_interaction};
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::mpsc;

    const INACTIVITY: Duration = Duration::from_secs(30);

    struct Fixture {
        events: EventSource,
        platform: Arc<RecordingPlatform>,
        menu: MenuHandle,
        presses: mpsc::UnboundedReceiver<String>,
    }

    fn recording_button(id: &str, tx: &mpsc::UnboundedSender<String>) -> MenuButton {
        let tx = tx.clone();
        let name = id.to_string();
        MenuButton::new(ButtonDescriptor::new(id, id), move |_| {
            let _ = tx.send(name.clone());
            async { Ok(()) }
        })
    }

    async fn open_menu(extra: Vec<MenuButton>) -> Fixture {
        let events = EventSource::new();
        let platform = Arc::new(RecordingPlatform::default());
        let (tx, presses) = mpsc::unbounded_channel();
        let mut buttons = vec![recording_button("prev", &tx), recording_button("next", &tx)];
        buttons.extend(extra);

        let menu = Menu::open(
            platform.clone(),
            &events,
            &command_interaction("stats", 1),
            Reply::embed(Embed::titled("Page 1")),
            buttons,
            MenuOptions::new(AllowedActors::only(1)).inactivity(INACTIVITY),
        )
        .await
        .unwrap();

        Fixture {
            events,
            platform,
            menu,
            presses,
        }
    }

    async fn settle() {
        time::sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_renders_buttons_and_subscribes() {
        let f = open_menu(Vec::new()).await;

        let follow_ups = f.platform.follow_ups();
        assert_eq!(follow_ups.len(), 1);
        let ids: Vec<&str> = follow_ups[0].buttons.iter().map(|b| b.custom_id.as_str()).collect();
        assert_eq!(ids, vec!["prev", "next"]);
        assert!(follow_ups[0].buttons.iter().all(|b| !b.disabled));
        assert_eq!(f.events.subscriber_count(), 1);
        assert_eq!(f.menu.state(), MenuState::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_authorized_press_runs_handler() {
        let mut f = open_menu(Vec::new()).await;

        f.events.publish(press_interaction("next", 1, f.menu.message()));
        assert_eq!(f.presses.recv().await.as_deref(), Some("next"));
        assert_eq!(f.platform.acknowledgements(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_press_resets_inactivity_timer() {
        let f = open_menu(Vec::new()).await;
        let start = Instant::now();

        time::sleep(Duration::from_secs(10)).await;
        f.events.publish(press_interaction("next", 1, f.menu.message()));

        time::sleep_until(start + Duration::from_secs(31)).await;
        assert_eq!(f.menu.state(), MenuState::Active);

        assert_eq!(f.menu.wait_ended().await, EndReason::Timeout);
        assert_eq!(Instant::now() - start, Duration::from_secs(40));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_without_presses() {
        let f = open_menu(Vec::new()).await;
        let start = Instant::now();

        assert_eq!(f.menu.wait_ended().await, EndReason::Timeout);
        assert_eq!(Instant::now() - start, INACTIVITY);

        let edits = f.platform.edits();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].0, f.menu.message());
        assert!(edits[0].1.buttons.iter().all(|b| b.disabled));
        assert_eq!(edits[0].1.embeds[0].title, "Page 1");
        assert_eq!(f.events.subscriber_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_frequent_presses_keep_menu_alive() {
        let mut f = open_menu(Vec::new()).await;

        for _ in 0..10 {
            time::sleep(Duration::from_secs(25)).await;
            f.events.publish(press_interaction("prev", 1, f.menu.message()));
            f.presses.recv().await;
        }
        assert_eq!(f.menu.state(), MenuState::Active);
        assert!(f.platform.edits().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unauthorized_actor_never_runs_handler() {
        let mut f = open_menu(Vec::new()).await;
        let start = Instant::now();

        for _ in 0..5 {
            time::sleep(Duration::from_secs(5)).await;
            f.events.publish(press_interaction("next", 2, f.menu.message()));
        }
        settle().await;

        assert!(f.presses.try_recv().is_err());
        assert_eq!(f.platform.acknowledgements(), 0);
        let refusals = f.platform.ephemeral_responses();
        assert_eq!(refusals.len(), 5);
        assert!(refusals.iter().all(|r| r == NOT_FOR_YOU));

        // Refused presses do not extend the menu's life
        assert_eq!(f.menu.wait_ended().await, EndReason::Timeout);
        assert_eq!(Instant::now() - start, INACTIVITY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_handler_keeps_menu_active() {
        let failures = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&failures);
        let broken = MenuButton::new(ButtonDescriptor::new("boom", "Boom"), move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            async {
                Err(Error::Handler {
                    message: "page index out of range".to_string(),
                })
            }
        });
        let mut f = open_menu(vec![broken]).await;

        f.events.publish(press_interaction("boom", 1, f.menu.message()));
        settle().await;

        let follow_ups = f.platform.follow_ups();
        assert_eq!(follow_ups.len(), 2);
        assert_eq!(follow_ups[1].content.as_deref(), Some(BUTTON_FAILURE_NOTICE));
        assert!(follow_ups[1].ephemeral);
        assert_eq!(f.menu.state(), MenuState::Active);

        f.events.publish(press_interaction("boom", 1, f.menu.message()));
        f.events.publish(press_interaction("next", 1, f.menu.message()));
        assert_eq!(f.presses.recv().await.as_deref(), Some("next"));
        settle().await;
        assert_eq!(failures.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ignores_other_messages_and_components() {
        let mut f = open_menu(Vec::new()).await;
        let elsewhere = MessageRef {
            channel_id: f.menu.message().channel_id,
            message_id: f.menu.message().message_id + 1,
        };
        f.events.publish(press_interaction("next", 1, elsewhere));

        let mut select = press_interaction("next", 1, f.menu.message());
        if let Payload::Component(ComponentPress { kind, .. }) = &mut select.payload {
            *kind = ComponentKind::Select;
        }
        f.events.publish(select);
        settle().await;

        assert!(f.presses.try_recv().is_err());
        assert_eq!(f.platform.acknowledgements(), 0);
        assert!(f.platform.ephemeral_responses().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_button_is_acknowledged_but_ignored() {
        let mut f = open_menu(Vec::new()).await;

        f.events.publish(press_interaction("last", 1, f.menu.message()));
        settle().await;

        assert_eq!(f.platform.acknowledgements(), 1);
        assert!(f.presses.try_recv().is_err());
        assert_eq!(f.platform.follow_ups().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acknowledge_failure_skips_handler() {
        let mut f = open_menu(Vec::new()).await;
        f.platform.fail_acknowledgements(true);

        f.events.publish(press_interaction("next", 1, f.menu.message()));
        settle().await;
        assert!(f.presses.try_recv().is_err());
        assert_eq!(f.menu.state(), MenuState::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finalize_runs_once_under_racing_triggers() {
        let f = open_menu(Vec::new()).await;

        let (ended, cancelled) = tokio::join!(f.menu.end(), f.menu.cancel());
        assert!(ended ^ cancelled);
        assert_eq!(f.menu.state(), MenuState::Ended);

        // The timer has been stopped and cannot finalize a second time
        time::sleep(INACTIVITY * 2).await;
        assert!(!f.menu.cancel().await);
        assert_eq!(f.platform.edits().len(), 1);
        assert_eq!(f.events.subscriber_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_racing_explicit_end() {
        let f = open_menu(Vec::new()).await;

        time::sleep(INACTIVITY).await;
        let explicit = f.menu.end().await;
        settle().await;

        assert_eq!(f.menu.state(), MenuState::Ended);
        assert_eq!(f.platform.edits().len(), 1);
        let reason = f.menu.wait_ended().await;
        assert_eq!(explicit, reason == EndReason::Ended);
    }

    #[tokio::test(start_paused = true)]
    async fn test_presses_after_end_do_nothing() {
        let mut f = open_menu(Vec::new()).await;
        assert!(f.menu.end().await);
        assert_eq!(f.menu.wait_ended().await, EndReason::Ended);

        f.events.publish(press_interaction("next", 1, f.menu.message()));
        settle().await;
        assert!(f.presses.try_recv().is_err());
        assert_eq!(f.platform.acknowledgements(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_keeps_buttons_until_ended() {
        let f = open_menu(Vec::new()).await;

        f.menu.edit(Reply::embed(Embed::titled("Page 2"))).await.unwrap();
        let edits = f.platform.edits();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].1.embeds[0].title, "Page 2");
        assert_eq!(edits[0].1.buttons.len(), 2);
        assert!(edits[0].1.buttons.iter().all(|b| !b.disabled));

        f.menu.cancel().await;
        f.menu.edit(Reply::embed(Embed::titled("Page 3"))).await.unwrap();
        let edits = f.platform.edits();
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[1].1.embeds[0].title, "Page 2");
        assert!(edits[1].1.buttons.iter().all(|b| b.disabled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_edits_existing_message() {
        let events = EventSource::new();
        let platform = Arc::new(RecordingPlatform::default());
        let message = MessageRef {
            channel_id: 7,
            message_id: 8,
        };

        let menu = Menu::attach(
            platform.clone(),
            &events,
            message,
            Reply::text("Pick one"),
            vec![MenuButton::new(ButtonDescriptor::new("ok", "OK"), |_| async { Ok(()) })],
            MenuOptions::new(AllowedActors::only(1)),
        )
        .await
        .unwrap();

        assert_eq!(menu.message(), message);
        assert!(platform.follow_ups().is_empty());
        assert_eq!(platform.edits().len(), 1);
        assert_eq!(platform.edits()[0].1.buttons[0].custom_id, "ok");

        let start = Instant::now();
        assert_eq!(menu.wait_ended().await, EndReason::Timeout);
        assert_eq!(Instant::now() - start, DEFAULT_INACTIVITY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_button_ids_rejected() {
        let events = EventSource::new();
        let platform = Arc::new(RecordingPlatform::default());
        let noop = |_: MenuPress| async { Ok::<(), Error>(()) };

        let result = Menu::open(
            platform.clone(),
            &events,
            &command_interaction("stats", 1),
            Reply::text("Pick"),
            vec![
                MenuButton::new(ButtonDescriptor::new("next", "Next"), noop),
                MenuButton::new(ButtonDescriptor::new("next", "Again"), noop),
            ],
            MenuOptions::new(AllowedActors::only(1)),
        )
        .await;

        assert!(matches!(result, Err(Error::Config { .. })));
        assert!(platform.calls().is_empty());
        assert_eq!(events.subscriber_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handler_can_end_its_own_menu() {
        let close = MenuButton::new(ButtonDescriptor::new("close", "Close"), |press: MenuPress| async move {
            press.menu.end().await;
            Ok(())
        });
        let f = open_menu(vec![close]).await;

        f.events.publish(press_interaction("close", 1, f.menu.message()));
        assert_eq!(f.menu.wait_ended().await, EndReason::Ended);
        assert_eq!(f.events.subscriber_count(), 0);
    }
}
