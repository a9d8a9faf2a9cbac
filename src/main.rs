// SPDX-License-Identifier: GPL-3.0-only
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use crate::config::Config;
use crate::protocols::ddc_ci::DdcCiDisplay;
use crate::protocols::ddc_ci::observer::TracingObserver;
use crate::tool::Plan;
use crate::transport::LinuxI2c;

#[macro_use]
extern crate tracing;

mod config;
mod error;
mod hexdump;
mod permissions;
mod protocols;
mod tool;
mod transport;

/// Query and change monitor settings over DDC/CI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// I2C adapter device, e.g. /dev/i2c-0
    device: PathBuf,

    /// Base address of DDC/CI, e.g. 0x37
    #[arg(short = 'a', value_parser = parse_address)]
    address: Option<u8>,

    /// Query EDID at 0x50
    #[arg(short = 'e')]
    edid: bool,

    /// Query capabilities
    #[arg(short = 'c')]
    capabilities: bool,

    /// Query controls 0 - 255
    #[arg(short = 'd')]
    dump: bool,

    /// Query one control
    #[arg(short = 'r', value_parser = parse_control)]
    control: Option<u8>,

    /// Value to write to the control given with -r
    #[arg(short = 'w', value_parser = parse_value, requires = "control")]
    value: Option<u16>,

    /// Force, skip validity checks
    #[arg(short = 'f')]
    force: bool,

    /// Save settings
    #[arg(short = 's')]
    save: bool,

    /// Send the Samsung DDC/CI enable
    #[arg(short = 'S')]
    samsung: bool,

    /// Verbosity, specify more to increase
    #[arg(short = 'v', action = ArgAction::Count)]
    verbose: u8,

    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Decimal or `0x` prefixed hexadecimal
fn parse_number(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("'{}' is not a number: {}", s, e))
}

fn parse_address(s: &str) -> Result<u8, String> {
    match parse_number(s)? {
        n @ 0..=0x7f => Ok(n as u8),
        _ => Err(format!("'{}' does not seem to be a valid i2c address", s)),
    }
}

fn parse_control(s: &str) -> Result<u8, String> {
    u8::try_from(parse_number(s)?)
        .map_err(|_| format!("'{}' does not seem to be a valid register name", s))
}

fn parse_value(s: &str) -> Result<u16, String> {
    u16::try_from(parse_number(s)?)
        .map_err(|_| format!("'{}' does not seem to be a valid value", s))
}

fn setup_logs(verbosity: u8) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    let fmt_layer = fmt::layer().with_target(false).with_writer(io::stderr);
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new(format!(
        "warn,{}={}",
        env!("CARGO_CRATE_NAME"),
        level
    )));

    if let Ok(journal_layer) = tracing_journald::layer() {
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .with(journal_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logs(args.verbose);

    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    let address = args.address.unwrap_or(config.address);

    let transport = match LinuxI2c::open(&args.device) {
        Ok(transport) => transport,
        Err(e) => {
            let report = permissions::check_bus_access(&args.device);
            for requirement in &report.requirements {
                warn!("{}", requirement);
            }
            if report.has_issues() {
                error!("Bus access check: {}", report.summary());
            }
            return Err(e).with_context(|| format!("Failed to open {}", args.device.display()));
        }
    };

    let plan = Plan {
        device: transport.path().display().to_string(),
        edid: args.edid,
        capabilities: args.capabilities,
        control: args.control,
        value: args.value,
        dump: args.dump,
        force: args.force,
        save: args.save,
        samsung: args.samsung,
        verbosity: args.verbose,
    };

    let mut ddc = DdcCiDisplay::new(transport, address)
        .with_retry_policy(config.retry_policy())
        .with_capability_limits(config.caps_chunk_len, config.max_caps_chunks)
        .with_observer(TracingObserver::new(args.verbose));
    debug!("{:?}", ddc);

    println!("ddcci-tool version {}", env!("CARGO_PKG_VERSION"));
    tool::run(&mut ddc, &plan, &mut io::stdout().lock())
}
