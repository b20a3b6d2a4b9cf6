//! End-to-end dispatch scenarios through the public API
//! Run with: cargo test --test dispatch_scenario_test

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;

use aqua::domain::traits::DeliveryInfo;
use aqua::{
    AccessPolicy, Aqua, Attachment, BotError, CommandOptions, Config, DispatchError, EventContext,
    EventKind, LocalBus, Message, MessageDelivery, User,
};

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

#[derive(Default)]
struct RecordingDelivery {
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl MessageDelivery for RecordingDelivery {
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<String, BotError> {
        self.sent.lock().unwrap().push((channel_id.to_string(), content.to_string()));
        Ok("sent".to_string())
    }

    async fn send_bot_message(
        &self,
        channel_id: &str,
        content: &str,
        _attachments: &[Attachment],
    ) -> Result<String, BotError> {
        self.sent.lock().unwrap().push((channel_id.to_string(), content.to_string()));
        Ok("bot".to_string())
    }

    fn info(&self) -> DeliveryInfo {
        DeliveryInfo {
            id: "recording".to_string(),
            name: "recording".to_string(),
        }
    }
}

fn message(author: &str, guild: &str, content: &str) -> EventContext {
    EventContext::message_created(
        Message::from_text("C1", User::new(author), content).with_guild(guild),
    )
}

fn counting(aqua: &Aqua, prefix: &str, name: &str, options: CommandOptions) -> Arc<AtomicUsize> {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    aqua.command_group(Some(prefix))
        .register_command(
            name,
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            options,
        )
        .unwrap();
    hits
}

/// `!ping` from an allowed user fires once, a repeat 200ms later is dropped,
/// and a user outside the allow list never fires.
#[tokio::test(start_paused = true)]
async fn test_ping_scenario() {
    ensure_init();

    let bus = Arc::new(LocalBus::new());
    let policy = AccessPolicy::new();
    policy.allow("U1");
    let aqua = Aqua::new(bus.clone(), Arc::new(RecordingDelivery::default()), policy);
    let ping = counting(&aqua, "!", "ping", CommandOptions::new());
    let channel = EventKind::MessageCreate.channel();

    bus.publish(channel, &message("U1", "G1", "!ping"));
    assert_eq!(ping.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_millis(200)).await;
    bus.publish(channel, &message("U1", "G1", "!ping"));
    assert_eq!(ping.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_millis(2000)).await;
    bus.publish(channel, &message("U2", "G1", "!ping"));
    assert_eq!(ping.load(Ordering::SeqCst), 1);

    bus.publish(channel, &message("U1", "G1", "!ping"));
    assert_eq!(ping.load(Ordering::SeqCst), 2);
}

/// Access lists seeded from YAML gate commands the same way as runtime edits
#[tokio::test]
async fn test_config_seeded_policy() {
    ensure_init();

    let config = Config::from_yaml(
        r#"
bot:
  prefix: "--"
dispatch:
  debounce-ms: 50
access:
  allow: [U1, U2, U3]
  block: { U3: true }
  safe: [U2]
  guild-blacklist: [G-muted]
"#,
    )
    .unwrap();

    let bus = Arc::new(LocalBus::new());
    let aqua = config.dispatcher(bus.clone(), Arc::new(RecordingDelivery::default()));
    let purge = counting(&aqua, &config.bot.prefix, "purge", CommandOptions::new().safe(true));
    let channel = EventKind::MessageCreate.channel();

    // allowed but not safe
    bus.publish(channel, &message("U1", "G1", "--purge"));
    // safe but in a muted guild
    bus.publish(channel, &message("U2", "G-muted", "--purge"));
    // blocked
    bus.publish(channel, &message("U3", "G1", "--purge"));
    assert_eq!(purge.load(Ordering::SeqCst), 0);

    bus.publish(channel, &message("U2", "G1", "--purge everything"));
    assert_eq!(purge.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_registration_errors_surface() {
    ensure_init();

    let bus = Arc::new(LocalBus::new());
    let aqua = Aqua::new(bus, Arc::new(RecordingDelivery::default()), AccessPolicy::new());
    let group = aqua.command_group(None);

    group.register_command("ban", |_| {}, CommandOptions::new()).unwrap();
    assert_eq!(
        group.register_command("ban", |_| {}, CommandOptions::new()),
        Err(DispatchError::DuplicateCommand("ban".to_string()))
    );
    assert_eq!(
        aqua.on("typingStart", |_| {}),
        Err(DispatchError::UnknownEventKind("typingStart".to_string()))
    );
}

/// A command replying through the facade reaches the delivery transport
#[tokio::test(start_paused = true)]
async fn test_command_reply_is_delivered_after_delay() {
    ensure_init();

    let bus = Arc::new(LocalBus::new());
    let delivery = Arc::new(RecordingDelivery::default());
    let policy = AccessPolicy::new();
    policy.allow("U1");
    let aqua = Aqua::new(bus.clone(), delivery.clone(), policy);

    let pending = Arc::new(Mutex::new(Vec::new()));
    let handles = pending.clone();
    let sender = aqua.clone();
    aqua.command_group(Some("!"))
        .register_command(
            "hello",
            move |ctx| {
                let channel = ctx.message.as_ref().map(|m| m.channel_id.clone()).unwrap_or_default();
                handles.lock().unwrap().push(sender.send_message(channel, "hi there"));
            },
            CommandOptions::new(),
        )
        .unwrap();

    bus.publish(EventKind::MessageCreate.channel(), &message("U1", "G1", "!hello"));
    assert!(delivery.sent.lock().unwrap().is_empty());

    let handle = pending.lock().unwrap().pop().unwrap();
    assert_eq!(handle.await.unwrap().unwrap(), "sent");
    assert_eq!(
        delivery.sent.lock().unwrap().as_slice(),
        &[("C1".to_string(), "hi there".to_string())]
    );
}

/// Numeric ids in YAML seeds and JSON payloads compare as the same identity
#[tokio::test]
async fn test_numeric_ids_match_across_config_and_payload() {
    ensure_init();

    let config = Config::from_yaml(
        r#"
access:
  allow: [1234]
  guild-blacklist:
    777: 1
"#,
    )
    .unwrap();

    let bus = Arc::new(LocalBus::new());
    let aqua = config.dispatcher(bus.clone(), Arc::new(RecordingDelivery::default()));
    let ping = counting(&aqua, "--", "ping", CommandOptions::new());
    let channel = EventKind::MessageCreate.channel();

    let payload = |guild: u64| {
        EventContext::from_json(
            EventKind::MessageCreate,
            serde_json::json!({
                "message": {
                    "channel_id": 9,
                    "guild_id": guild,
                    "author": { "id": 1234 },
                    "content": "--ping"
                }
            }),
        )
        .unwrap()
    };

    bus.publish(channel, &payload(777));
    assert_eq!(ping.load(Ordering::SeqCst), 0);

    bus.publish(channel, &payload(555));
    assert_eq!(ping.load(Ordering::SeqCst), 1);
}
