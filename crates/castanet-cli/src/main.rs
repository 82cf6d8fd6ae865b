#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use anyhow::Context;
use castanet::{
    AtomicSequence, Identifier, IdentifierFactory, MemoryNotes, MemoryTransport, SystemClock,
    SystemContext, Tracker, encode_cookie,
};
use clap::Parser;
use config::{CliArgs, CliConfig, Command};
use std::net::Ipv4Addr;
use telemetry::init_tracing;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    init_tracing();
    tracing::debug!("Running with config: {:#?}", config);

    let counter = AtomicSequence::new();
    let context = match config.local_address {
        Some(addr) => SystemContext::with_local_address(addr),
        None => SystemContext::new(),
    };
    let factory = IdentifierFactory::new(&counter, context, SystemClock);

    match &config.command {
        Command::Issue {
            count,
            service_hint,
            time_hint,
        } => {
            let factory = factory.with_config(&config.uid);
            for _ in 0..*count {
                let id = factory.create_fresh(*service_hint, *time_hint);
                println!("{}\t{}", encode_cookie(&id), config.formatter.format(&id));
            }
        }
        Command::Decode { cookie } => {
            let id = factory.create_from_cookie(cookie)?;
            print_fields(&id, &config);
        }
        Command::Log { cookie } => {
            let id = factory.create_from_cookie(cookie)?;
            println!("{}", config.formatter.format(&id));
        }
        Command::ParseLog { value } => {
            let id = config.formatter.parse(value)?;
            print_fields(&id, &config);
            println!("cookie       {}", encode_cookie(&id));
        }
        Command::Track { cookie_header } => {
            let tracker = Tracker::new(factory, config.uid.clone())
                .with_decode_failure_policy(config.on_decode_failure)
                .with_log_formatter(config.formatter)
                .enable();
            let mut transport = MemoryTransport::from_cookie_header(cookie_header);
            let mut notes = MemoryNotes::new();

            let tracked = tracker
                .start(&mut transport, Some(&mut notes))?
                .context("tracker did not run")?;
            tracing::info!(origin = ?tracked.origin, uid = %tracked.log_value, "Tracked request");

            for cookie in transport.outgoing() {
                println!("Set-Cookie: {cookie}");
                if let Some(p3p) = cookie.p3p_header() {
                    println!("P3P: {p3p}");
                }
            }
            for (key, value) in notes.iter() {
                println!("note {key}={value}");
            }
        }
    }

    Ok(())
}

fn print_fields(id: &Identifier, config: &CliConfig) {
    println!(
        "service_id   {} ({:#010X})",
        Ipv4Addr::from(id.service_id()),
        id.service_id()
    );
    println!("timestamp    {}", id.timestamp());
    println!("start_value  {:#010X}", id.start_value());
    println!("sequence     {:#010X}", id.sequence());
    println!("log          {}", config.formatter.format(id));
}
