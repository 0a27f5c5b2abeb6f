use std::io::Write;

use anyhow::Context;
use chatbot_client::{ChatTransport, SendOptions, TransportConfig, TransportResult};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so replies on stdout stay readable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = TransportConfig::from_env().context("invalid backend configuration")?;
    let transport = ChatTransport::new(&config).context("failed to create chat transport")?;

    println!("💬 Chat client sending to {}", transport.chat_url());
    println!("Type a message, /health to probe the backend, /quit to leave.");
    report_health(&transport).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };

        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/health" => {
                report_health(&transport).await;
                continue;
            }
            _ => {}
        }

        match send_interruptible(&transport, &line).await {
            Ok(reply) => println!("{reply}"),
            Err(err) => println!("⚠️  {err}"),
        }
    }

    println!("👋 Bye");
    Ok(())
}

async fn report_health(transport: &ChatTransport) {
    if transport.check_health().await {
        println!("✅ Backend is reachable");
    } else {
        println!("❌ Backend is not reachable at {}", transport.health_url());
    }
}

// Ctrl-C while a reply is pending cancels that request only.
async fn send_interruptible(transport: &ChatTransport, message: &str) -> TransportResult<String> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let result = transport
        .send_message_with(message, SendOptions::default().with_cancel(cancel))
        .await;
    watcher.abort();
    result
}
