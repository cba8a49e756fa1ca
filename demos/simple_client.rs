//! Simple IRC client example
//!
//! Connects, joins a channel and answers `!users` with the channel's member
//! count. Everything on the wire is logged at trace level.
//!
//! ```text
//! RUST_LOG=slirc_client=trace cargo run --example simple_client -- irc.libera.chat 6697 '#slirc-test'
//! ```

use std::sync::Arc;

use anyhow::Context;
use slirc_client::{Client, ClientConfig, CloseReason, Handler, User};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

struct Bot {
    channel: String,
}

impl Handler for Bot {
    fn connection_established(&self, client: &Client) {
        let client = client.clone();
        let channel = self.channel.clone();
        tokio::spawn(async move {
            if let Err(e) = client.join_channel(&channel).await {
                error!("join failed: {}", e);
            }
        });
    }

    fn user_joined(&self, client: &Client, user: &User, channel: &str) {
        info!("{} joined {} (I am {})", user, channel, client.nickname());
    }

    fn names_complete(&self, client: &Client, channel: &str) {
        let count = client.users_in_channel(channel).map_or(0, |u| u.len());
        info!("{} has {} users", channel, count);
    }

    fn channel_message(&self, client: &Client, user: &User, channel: &str, text: &str) {
        info!("<{}:{}> {}", user.nickname(), channel, text);
        if text.trim() != "!users" {
            return;
        }

        let mut users: Vec<String> = client
            .users_in_channel(channel)
            .unwrap_or_default()
            .into_iter()
            .collect();
        users.sort();
        let reply = format!("{} users: {}", users.len(), users.join(" "));

        let client = client.clone();
        let channel = channel.to_owned();
        tokio::spawn(async move {
            if let Err(e) = client.send_message(&reply, &channel).await {
                error!("reply failed: {}", e);
            }
        });
    }

    fn private_message(&self, _client: &Client, user: &User, text: &str) {
        info!("<{}> {}", user.nickname(), text);
    }

    fn connection_closed(&self, _client: &Client, reason: &CloseReason) {
        info!("closed: {}", reason);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let server = args.next().unwrap_or_else(|| "irc.libera.chat".to_owned());
    let port: u16 = match args.next() {
        Some(port) => port.parse().context("invalid port")?,
        None => 6697,
    };
    let channel = args.next().unwrap_or_else(|| "#slirc-test".to_owned());

    let client = Client::new(ClientConfig {
        server,
        port,
        use_tls: port == 6697,
        nickname: "slirc_demo".into(),
        username: "slirc".into(),
        realname: "slirc-client demo".into(),
        ..ClientConfig::default()
    });
    let bot = Arc::new(Bot { channel });
    client.set_handler(&bot);

    client.connect().await.context("connect failed")?;

    tokio::select! {
        _ = client.closed() => {}
        _ = tokio::signal::ctrl_c() => {
            client.disconnect(Some("Interrupted")).await;
        }
    }
    Ok(())
}
