use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use switchboard_core::{InboundMessage, PlatformResult, Session};
use switchboard_framework::{
    BoxedCommand, Command, CommandSettings, DispatchContext, RateLimitStore, Router,
};
use switchboard_runtime::{BotConfig, BotRuntime, ShutdownHandle, SwitchboardConfig, serve};
use tokio::sync::mpsc;

const BOT_CONFIG: &str = r#"{
    "simpleCommands": { "rules": "Be nice." },
    "permissions": { "Ban": ["mods"] }
}"#;

#[derive(Default)]
struct Recorder {
    sent: Mutex<Vec<String>>,
}

impl Recorder {
    fn replies(&self) -> Vec<String> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Session for Recorder {
    fn self_id(&self) -> &str {
        "bot"
    }

    async fn send_text(&self, _channel_id: &str, content: &str) -> PlatformResult<String> {
        self.sent.lock().push(content.to_string());
        Ok(String::new())
    }

    async fn member_roles(&self, _guild_id: &str, user_id: &str) -> PlatformResult<Vec<String>> {
        Ok(match user_id {
            "moderator" => vec!["MODS".to_string()],
            _ => Vec::new(),
        })
    }
}

struct Counter {
    settings: CommandSettings,
    calls: Arc<AtomicUsize>,
    delay: Duration,
}

impl Counter {
    fn new(name: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let cmd = Self {
            settings: CommandSettings::new(name, ""),
            calls: Arc::clone(&calls),
            delay: Duration::ZERO,
        };
        (cmd, calls)
    }
}

#[async_trait]
impl Command for Counter {
    async fn handle(&self, ctx: Arc<DispatchContext>) {
        tokio::time::sleep(self.delay).await;
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = ctx.reply(format!("{} done", ctx.command())).await;
    }

    fn settings(&self) -> &CommandSettings {
        &self.settings
    }
}

fn runtime(use_fuzzy: bool) -> BotRuntime {
    BotRuntime::from_config(&SwitchboardConfig {
        use_fuzzy,
        ..Default::default()
    })
}

fn msg(author: &str, content: &str) -> InboundMessage {
    InboundMessage::new(author, "g1", "c1", content)
}

async fn drive(router: Router, session: Arc<Recorder>, messages: Vec<InboundMessage>) -> usize {
    let (tx, rx) = mpsc::channel(16);
    for message in messages {
        tx.send(message).await.unwrap();
    }
    drop(tx);
    serve(Arc::new(router), session, rx, std::future::pending()).await
}

#[tokio::test]
async fn router_built_from_bot_config() {
    let runtime = runtime(false);
    let bot = BotConfig::from_json("inline", BOT_CONFIG).unwrap();
    let (ban, ban_calls) = Counter::new("ban");
    let router = runtime
        .build_router(&bot, [Arc::new(ban) as BoxedCommand])
        .unwrap();
    let session = Arc::new(Recorder::default());

    let handled = drive(
        router,
        session.clone(),
        vec![
            msg("someone", "!rules"),
            msg("someone", "!ban troll"),
            msg("moderator", "!ban troll"),
            msg("someone", "hello"),
        ],
    )
    .await;

    assert_eq!(handled, 4);
    assert_eq!(ban_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        session.replies(),
        vec![
            "Be nice.",
            "You do not have permission to use that command.",
            "ban done",
        ]
    );
}

#[tokio::test]
async fn fuzzy_follows_configuration() {
    let bot = BotConfig::from_json("inline", BOT_CONFIG).unwrap();

    for (use_fuzzy, expected) in [
        (false, "Command not found."),
        (true, "Command not found. Did you mean:\n- `!example`\n"),
    ] {
        let (example, _) = Counter::new("example");
        let router = runtime(use_fuzzy)
            .build_router(&bot, [Arc::new(example) as BoxedCommand])
            .unwrap();
        assert_eq!(router.fuzzy_enabled(), use_fuzzy);

        let session = Arc::new(Recorder::default());
        drive(router, session.clone(), vec![msg("u1", "!exmple")]).await;
        assert_eq!(session.replies(), vec![expected]);
    }
}

#[tokio::test]
async fn rate_limit_applies_through_event_loop() {
    let bot = BotConfig::from_json("inline", BOT_CONFIG).unwrap();
    let (mut example, calls) = Counter::new("example");
    example.settings = example
        .settings
        .rate_limit(5, Arc::new(RateLimitStore::per_minute()));
    let router = runtime(false)
        .build_router(&bot, [Arc::new(example) as BoxedCommand])
        .unwrap();
    let session = Arc::new(Recorder::default());

    let messages = (0..7).map(|_| msg("u1", "!example")).collect();
    drive(router, session.clone(), messages).await;

    assert_eq!(calls.load(Ordering::SeqCst), 5);
    let limited = session
        .replies()
        .iter()
        .filter(|r| r.starts_with("You've used this command too many times"))
        .count();
    assert_eq!(limited, 2);
}

#[tokio::test]
async fn shutdown_drains_in_flight_commands() {
    let bot = BotConfig::from_json("inline", BOT_CONFIG).unwrap();
    let (mut slow, calls) = Counter::new("slow");
    slow.delay = Duration::from_millis(50);
    let router = Arc::new(
        runtime(false)
            .build_router(&bot, [Arc::new(slow) as BoxedCommand])
            .unwrap(),
    );
    let session = Arc::new(Recorder::default());

    let (tx, rx) = mpsc::channel(16);
    let handle = ShutdownHandle::new();
    let stop = handle.clone();
    let serving = tokio::spawn(serve(
        Arc::clone(&router),
        session.clone(),
        rx,
        async move { stop.cancelled().await },
    ));

    for _ in 0..3 {
        tx.send(msg("u1", "!slow")).await.unwrap();
    }
    // Wait until the loop has taken every message off the channel.
    while tx.capacity() < tx.max_capacity() {
        tokio::task::yield_now().await;
    }
    handle.shutdown();

    let handled = serving.await.unwrap();
    assert_eq!(handled, 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(session.replies(), vec!["slow done"; 3]);
    assert!(tx.is_closed());
}
