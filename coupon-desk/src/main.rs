use anyhow::Context;
use chrono::Utc;
use coupon_core::{Clock, IdentityProvider, StaticIdentity, SystemClock};
use coupon_desk::{error, ClaimDesk, DeskState, Notifier};
use coupon_shared::{Coupon, FeedbackKind, FeedbackMessage};
use coupon_store::{identity_store, Config, IdentityFile};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "commands: request | claim [id] | copy | list | status | reset | whoami | help | quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coupon_desk=debug,coupon_registry=debug,coupon_guard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load().context("Failed to load config")?;
    let rules = config.business_rules.clone();
    tracing::info!(
        "Starting coupon desk, cooldown {} minutes, latency {}ms",
        rules.cooldown_minutes,
        rules.request_delay_ms
    );

    let identity_file = IdentityFile::new(&rules.identity_file);
    let identity = identity_file
        .load_or_create(&identity_store::host_descriptor())
        .with_context(|| format!("Failed to load identity from {}", identity_file.path().display()))?;
    let visitor = StaticIdentity(identity).identity();

    let clock = SystemClock;
    let state = DeskState::from_config(&config, clock.now()).context("Invalid configuration")?;
    let mut desk = ClaimDesk::new(state, clock);
    let mut notifier = Notifier::new();
    let latency = Duration::from_millis(rules.request_delay_ms);

    println!("Round-robin coupon desk. One claim per visitor per {} minutes.", rules.cooldown_minutes);
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };

        match command {
            "request" => {
                tokio::time::sleep(latency).await;
                match desk.request_coupon(&visitor) {
                    Ok(coupon) => {
                        print_coupon(&coupon);
                        announce(&mut notifier, error::offer_ready());
                    }
                    Err(err) => announce(&mut notifier, FeedbackMessage::from(&err)),
                }
            }
            "claim" => {
                let Some(coupon_id) = words
                    .next()
                    .map(str::to_string)
                    .or_else(|| desk.pending_offer(&visitor).map(|c| c.id.clone()))
                else {
                    println!("Nothing to claim yet, run `request` first.");
                    continue;
                };

                tokio::time::sleep(latency).await;
                match desk.claim_coupon(&visitor, &coupon_id) {
                    Ok(coupon) => announce(&mut notifier, error::claim_succeeded(&coupon.code)),
                    Err(err) => announce(&mut notifier, FeedbackMessage::from(&err)),
                }
            }
            "copy" => match desk.pending_offer(&visitor) {
                Some(coupon) => {
                    println!("{}", coupon.code);
                    announce(&mut notifier, error::code_copied());
                }
                None => println!("No coupon on offer, run `request` first."),
            },
            "list" => desk.coupons().iter().for_each(print_coupon),
            "status" => match notifier.current() {
                Some(message) => println!("{}", render(&message)),
                None => println!("(no notifications)"),
            },
            "reset" => {
                desk.reset();
                announce(&mut notifier, error::reset_done());
            }
            "whoami" => {
                println!("address {} / fingerprint {}", visitor.key(), visitor.fingerprint.reveal());
            }
            "help" => println!("{}", HELP),
            "quit" | "exit" => break,
            other => println!("Unknown command `{}`. {}", other, HELP),
        }
    }

    tracing::info!("Coupon desk shutting down");
    Ok(())
}

fn announce(notifier: &mut Notifier, message: FeedbackMessage) {
    println!("{}", render(&message));
    notifier.show(message);
}

fn render(message: &FeedbackMessage) -> String {
    let tag = match message.kind {
        FeedbackKind::Success => "ok",
        FeedbackKind::Error => "error",
        FeedbackKind::Info => "info",
    };
    format!("[{}] {}", tag, message.message)
}

fn print_coupon(coupon: &Coupon) {
    let status = if coupon.claimed {
        "claimed".to_string()
    } else if coupon.is_expired_at(Utc::now()) {
        "expired".to_string()
    } else {
        format!("expires {}", coupon.expires_at.format("%Y-%m-%d"))
    };
    println!("  #{:<4} {:<12} {:<36} {}", coupon.id, coupon.code, coupon.description, status);
}
