use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use aqua::application::errors::DispatchError;
use aqua::application::messaging::{Aqua, CommandGroup};
use aqua::domain::entities::{CommandOptions, EventContext, EventKind, Message, User};
use aqua::domain::traits::MessageDelivery;
use aqua::infrastructure::adapters::{ConsoleAdapter, DiscordAdapter};
use aqua::infrastructure::bus::LocalBus;
use aqua::infrastructure::config::Config;

#[derive(Parser)]
#[command(name = "aqua")]
#[command(about = "Prefixed command dispatch with access-control gating", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Discord bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish stdin lines as messageCreate events and dispatch commands
    Run {
        /// Author id for console messages
        #[arg(long, default_value = "console")]
        user: String,

        /// Guild id for console messages
        #[arg(long, default_value = "console")]
        guild: String,

        /// Channel id replies are sent to
        #[arg(long, default_value = "console")]
        channel: String,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

/// Where console input is attributed to
struct Session {
    user: String,
    guild: String,
    channel: String,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { user, guild, channel } => {
            run_bot(&cli.config, cli.token, Session { user, guild, channel });
        }
        Commands::Version => {
            println!("aqua v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn load_config(config_path: &str) -> Config {
    if std::path::Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    }
}

fn run_bot(config_path: &str, token_override: Option<String>, session: Session) {
    let config = load_config(config_path);
    tracing::info!("Starting {} (prefix {:?})", config.bot.name, config.bot.prefix);

    let delivery: Arc<dyn MessageDelivery> =
        match token_override.or_else(|| config.discord_token().map(str::to_string)) {
            Some(token) => Arc::new(DiscordAdapter::new(token)),
            None => Arc::new(ConsoleAdapter::new()),
        };
    tracing::info!("Delivering through {}", delivery.info().id);

    let bus = Arc::new(LocalBus::new());
    let aqua = config.dispatcher(bus.clone(), delivery);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            return;
        }
    };

    rt.block_on(async {
        if let Err(e) = register_commands(&aqua, &config) {
            tracing::error!("Failed to register commands: {}", e);
            return;
        }
        run_console(&bus, session).await;
    });
}

fn register_commands(aqua: &Aqua, config: &Config) -> Result<(), DispatchError> {
    aqua.on("messageCreate", |ctx| {
        if let Some(message) = &ctx.message {
            tracing::debug!(author = %message.author, guild = ?message.guild(), "{:?}", message.text());
        }
    })?;

    let group = aqua.command_group(Some(&config.bot.prefix));
    register_ping_command(aqua, &group)?;
    register_echo_command(aqua, &group)?;
    register_help_command(aqua, &group)?;
    register_prefix_command(aqua, &group)?;

    tracing::info!("Registered {} commands", group.len());
    Ok(())
}

/// Text following `{prefix}{name}`, trimmed
fn command_args(group: &CommandGroup, name: &str, ctx: &EventContext) -> String {
    let prefix = group.prefix();
    ctx.message
        .as_ref()
        .and_then(|m| m.text())
        .and_then(|text| text.strip_prefix(prefix.as_str()))
        .and_then(|text| text.strip_prefix(name))
        .map(|args| args.trim().to_string())
        .unwrap_or_default()
}

/// Reply in the message's channel without blocking dispatch
fn reply(aqua: &Aqua, ctx: &EventContext, content: String) {
    let Some(channel_id) = ctx.message.as_ref().map(|m| m.channel_id.clone()) else {
        return;
    };
    let aqua = aqua.clone();
    tokio::spawn(async move {
        if let Err(e) = aqua.send_bot_message(&channel_id, &content, &[]).await {
            tracing::error!("Failed to send reply: {}", e);
        }
    });
}

fn register_ping_command(aqua: &Aqua, group: &CommandGroup) -> Result<(), DispatchError> {
    let handle = aqua.clone();
    group.register_command(
        "ping",
        move |ctx| reply(&handle, ctx, "pong".to_string()),
        CommandOptions::new().with_description("Check the dispatcher is alive"),
    )
}

fn register_echo_command(aqua: &Aqua, group: &CommandGroup) -> Result<(), DispatchError> {
    let handle = aqua.clone();
    let this = group.clone();
    group.register_command(
        "echo",
        move |ctx| {
            let text = command_args(&this, "echo", ctx);
            if !text.is_empty() {
                reply(&handle, ctx, text);
            }
        },
        CommandOptions::new().with_description("Repeat the given text"),
    )
}

fn register_help_command(aqua: &Aqua, group: &CommandGroup) -> Result<(), DispatchError> {
    let handle = aqua.clone();
    let this = group.clone();
    group.register_command(
        "help",
        move |ctx| {
            let mut help = "Available commands:\n".to_string();
            for name in this.command_names() {
                if let Some(line) = this.describe(&name) {
                    help.push_str(&format!("  {}\n", line));
                }
            }
            reply(&handle, ctx, help);
        },
        CommandOptions::new().with_description("Show this message"),
    )
}

fn register_prefix_command(aqua: &Aqua, group: &CommandGroup) -> Result<(), DispatchError> {
    let handle = aqua.clone();
    let this = group.clone();
    group.register_command(
        "prefix",
        move |ctx| {
            let prefix = command_args(&this, "prefix", ctx);
            if prefix.is_empty() {
                reply(&handle, ctx, format!("Current prefix: {}", this.prefix()));
                return;
            }
            this.update_prefix(prefix.as_str());
            reply(&handle, ctx, format!("Prefix changed to {}", prefix));
        },
        CommandOptions::new()
            .safe(true)
            .with_description("Show or change the command prefix"),
    )
}

async fn run_console(bus: &LocalBus, mut session: Session) {
    tracing::info!(
        "Console ready as user {} in guild {} (:user <id>, :guild <id>, :quit)",
        session.user,
        session.guild
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let input = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                break;
            }
        };

        let input = input.trim_end();
        if input.is_empty() {
            continue;
        }

        if let Some(directive) = input.strip_prefix(':') {
            let mut parts = directive.splitn(2, ' ');
            match (parts.next(), parts.next().map(str::trim)) {
                (Some("quit"), _) => break,
                (Some("user"), Some(id)) if !id.is_empty() => session.user = id.to_string(),
                (Some("guild"), Some(id)) if !id.is_empty() => session.guild = id.to_string(),
                _ => tracing::warn!("Unknown directive: {}", input),
            }
            continue;
        }

        let message = Message::from_text(&session.channel, User::new(&session.user), input)
            .with_guild(&session.guild);
        let delivered = bus.publish(
            EventKind::MessageCreate.channel(),
            &EventContext::message_created(message),
        );
        tracing::debug!("Delivered to {} listeners", delivered);

        // let spawned replies flush before the next prompt
        tokio::task::yield_now().await;
    }

    tracing::info!("Console closed");
}

fn init_config() {
    match Config::default().to_yaml() {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => tracing::error!("Failed to render config: {}", e),
    }
}
