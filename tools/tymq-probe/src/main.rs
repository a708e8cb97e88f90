// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! tymq-probe - smoke-test CLI for a running middleend
//!
//! Registers a throwaway client and exercises one command against the
//! middleend, printing the outcome. Useful to verify a deployment answers
//! on its well-known socket before wiring up a real client.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tymq::{ClientConfig, ScalarKind, Session, TypeDesc, Value, DEFAULT_SOCKET_PATH};

/// Smoke-test CLI for a tymq middleend
#[derive(Parser, Debug)]
#[command(name = "tymq-probe")]
#[command(version = "0.1.0")]
#[command(about = "Exercise one middleend command and report the outcome")]
struct Args {
    #[command(subcommand)]
    command: ProbeCommand,

    /// Middleend command socket
    #[arg(short, long, default_value = DEFAULT_SOCKET_PATH, global = true)]
    socket: PathBuf,

    /// Client name to register under
    #[arg(short, long, default_value = "tymq-probe", global = true)]
    name: String,

    /// Reply deadline in milliseconds (0 = wait forever)
    #[arg(long, default_value = "5000", global = true)]
    timeout_ms: u64,
}

#[derive(Subcommand, Debug)]
enum ProbeCommand {
    /// Offer an Int64 mailbox type and report accept/reject
    Offer,
    /// Send an Int64 value to a target mailbox
    Send {
        /// Target client name
        #[arg(short, long)]
        target: String,

        /// Value to deliver
        #[arg(short, long, default_value = "0")]
        value: i64,
    },
    /// Offer an Int64 mailbox type, then poll and fetch one message
    Get,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("probe failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> tymq::Result<()> {
    let mut config = ClientConfig::new(&args.socket);
    if args.timeout_ms > 0 {
        config = config.with_reply_timeout(Duration::from_millis(args.timeout_ms));
    }

    let session = Session::with_config(config)?;
    session.register(&args.name)?;
    println!("registered as {}", args.name);

    let desc = TypeDesc::scalar(ScalarKind::Int64);
    match &args.command {
        ProbeCommand::Offer => {
            session.accept_type(&desc)?;
            println!("middleend accepted {}", desc.name());
        }
        ProbeCommand::Send { target, value } => {
            session.send(&desc, target, &Value::Int64(*value))?;
            println!("sent {} to {}", value, target);
        }
        ProbeCommand::Get => {
            session.accept_type(&desc)?;
            if session.empty(&desc)? {
                println!("mailbox is empty");
            } else {
                let value = session.get(&desc)?;
                println!("got {:?}", value);
            }
        }
    }
    Ok(())
}
