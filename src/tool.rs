// SPDX-License-Identifier: GPL-3.0-only
//! Command-line session against one display
//!
//! Runs the steps selected on the command line in a fixed order and prints
//! the results. Protocol failures of individual steps are logged and the
//! session moves on; only output errors abort it.

use std::io::Write;

use anyhow::{Context, Result};

use crate::hexdump::hexdump;
use crate::protocols::ddc_ci::DdcCiDisplay;
use crate::protocols::ddc_ci::caps::render_capabilities;
use crate::protocols::ddc_ci::controls::control_name;
use crate::protocols::ddc_ci::observer::FrameObserver;
use crate::protocols::ddc_ci::reply::ControlValue;
use crate::protocols::edid::{self, EDID_ADDRESS, EdidSummary};
use crate::transport::Transport;

/// Steps requested for this run
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// Device node name, only used in messages
    pub device: String,
    pub edid: bool,
    pub capabilities: bool,
    pub control: Option<u8>,
    /// Value written to `control` before reading it back
    pub value: Option<u16>,
    pub dump: bool,
    /// Accept replies the display flags as invalid while dumping
    pub force: bool,
    pub save: bool,
    /// Bracket the session with the Samsung enable/disable writes
    pub samsung: bool,
    pub verbosity: u8,
}

pub fn run<T, O, W>(display: &mut DdcCiDisplay<T, O>, plan: &Plan, out: &mut W) -> Result<()>
where
    T: Transport,
    O: FrameObserver,
    W: Write,
{
    if plan.edid {
        print_edid(display.transport_mut(), plan, out)?;
    }

    let address = display.address();
    writeln!(out, "\nUsing ddc/ci : 0x{:02x}@{}", address, plan.device)?;

    let opened = if plan.samsung {
        display.set_vendor_enable(true)
    } else {
        display.presence_check()
    };
    if let Err(e) = opened {
        error!("DDC/CI at 0x{:02x} is unusable: {}", address, e);
        return Ok(());
    }

    let policy = display.retry_policy();
    policy.settle();

    if plan.capabilities {
        writeln!(out, "\nCapabilities:")?;
        match display.capabilities() {
            Ok(caps) => writeln!(out, "{}", render_capabilities(&caps))?,
            Err(e) => error!("Failed to read capabilities: {}", e),
        }
    }

    if let Some(control) = plan.control {
        match plan.value {
            Some(value) => {
                writeln!(
                    out,
                    "\nWriting 0x{:02x}({}), 0x{:02x}({})",
                    control,
                    control_name(control),
                    value,
                    value
                )?;
                if let Err(e) = display.write_control(control, value) {
                    warn!("Failed to write control 0x{:02x}: {}", control, e);
                }
                policy.settle();
            }
            None => writeln!(out, "\nReading 0x{:02x}({})", control, control_name(control))?,
        }

        match display.read_control(control, true) {
            Ok(value) => print_control(out, &value)?,
            Err(e) => warn!("Failed to read control 0x{:02x}: {}", control, e),
        }
    }

    if plan.dump {
        writeln!(out, "\nControls (valid/current/max):")?;
        for control in 0..=u8::MAX {
            match display.read_control(control, plan.force) {
                Ok(value) => print_control(out, &value)?,
                Err(e) => debug!("Skipping control 0x{:02x}: {}", control, e),
            }
        }
    }

    if plan.save {
        writeln!(out, "\nSaving settings...")?;
        if let Err(e) = display.save_settings() {
            warn!("Failed to save settings: {}", e);
        }
    }

    policy.settle();
    if plan.samsung {
        if let Err(e) = display.set_vendor_enable(false) {
            warn!("Failed to disable DDC/CI: {}", e);
        }
    }

    out.flush().context("Failed to flush output")
}

fn print_edid<T, W>(transport: &mut T, plan: &Plan, out: &mut W) -> Result<()>
where
    T: Transport,
    W: Write,
{
    writeln!(out, "\nReading EDID : 0x{:02x}@{}", EDID_ADDRESS, plan.device)?;

    let block = match edid::read_block(transport) {
        Ok(block) => block,
        Err(e) => {
            error!("Reading EDID 0x{:02x}@{} failed: {}", EDID_ADDRESS, plan.device, e);
            return Ok(());
        }
    };

    if plan.verbosity > 0 {
        write!(out, "{}", hexdump(&block))?;
    }

    match EdidSummary::parse(&block) {
        Ok(summary) => {
            writeln!(out, "\tPlug and Play ID: {}", summary.pnp_id())?;
            writeln!(out, "\tInput type: {}", summary.input_type())?;
        }
        Err(e) => error!("Reading EDID 0x{:02x}@{} failed: {}", EDID_ADDRESS, plan.device, e),
    }
    Ok(())
}

fn print_control<W: Write>(out: &mut W, value: &ControlValue) -> Result<()> {
    writeln!(
        out,
        "Control 0x{:02x}: {}/{}/{}\t[{}]",
        value.control,
        if value.valid { '+' } else { '-' },
        value.current,
        value.maximum,
        control_name(value.control)
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::protocols::ddc_ci::controls::{BRIGHTNESS, SAMSUNG_ENABLE};
    use crate::protocols::ddc_ci::retry::RetryPolicy;
    use crate::transport::mock::SimulatedDisplay;

    fn display(sim: SimulatedDisplay) -> DdcCiDisplay<SimulatedDisplay> {
        DdcCiDisplay::new(sim, 0x37).with_retry_policy(RetryPolicy::new(3, Duration::ZERO))
    }

    fn plan() -> Plan {
        Plan {
            device: "/dev/i2c-4".to_string(),
            ..Plan::default()
        }
    }

    fn run_to_string(display: &mut DdcCiDisplay<SimulatedDisplay>, plan: &Plan) -> String {
        let mut out = Vec::new();
        run(display, plan, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_read_single_control() {
        let mut display = display(SimulatedDisplay::new(0x37).with_control(BRIGHTNESS, 50, 100));
        let plan = Plan {
            control: Some(BRIGHTNESS),
            ..plan()
        };

        let out = run_to_string(&mut display, &plan);
        assert!(out.contains("Using ddc/ci : 0x37@/dev/i2c-4"));
        assert!(out.contains("Reading 0x10(Brightness)"));
        assert!(out.contains("Control 0x10: +/50/100\t[Brightness]\n"));
        assert_eq!(display.transport_mut().received[0], vec![0xf7]);
    }

    #[test]
    fn test_write_then_read_back() {
        let mut display = display(SimulatedDisplay::new(0x37).with_control(BRIGHTNESS, 50, 100));
        let plan = Plan {
            control: Some(BRIGHTNESS),
            value: Some(80),
            ..plan()
        };

        let out = run_to_string(&mut display, &plan);
        assert!(out.contains("Writing 0x10(Brightness), 0x50(80)"));
        assert!(out.contains("Control 0x10: +/80/100"));
    }

    #[test]
    fn test_unusable_display_skips_everything() {
        let mut display = display(SimulatedDisplay::new(0x38).with_control(BRIGHTNESS, 50, 100));
        let plan = Plan {
            capabilities: true,
            control: Some(BRIGHTNESS),
            ..plan()
        };

        let out = run_to_string(&mut display, &plan);
        assert!(!out.contains("Capabilities"));
        assert!(!out.contains("Control 0x10"));
        assert_eq!(display.transport_mut().traffic, vec![0x37]);
    }

    #[test]
    fn test_capabilities_and_save() {
        let caps = b"(prot(monitor)type(lcd)vcp(02 04 10 12))";
        let mut display = display(SimulatedDisplay::new(0x37).with_capabilities(caps, 16));
        let plan = Plan {
            capabilities: true,
            save: true,
            ..plan()
        };

        let out = run_to_string(&mut display, &plan);
        assert!(out.contains("\nCapabilities:\n(prot(monitor)type(lcd)vcp(02 04 10 12))\n"));
        assert!(out.contains("Saving settings..."));
        assert_eq!(display.transport_mut().received.last(), Some(&vec![0x0c]));
    }

    #[test]
    fn test_dump_respects_force() {
        let sim = SimulatedDisplay::new(0x37)
            .with_control(BRIGHTNESS, 50, 100)
            .with_control(0x12, 70, 100);

        let mut display = display(sim);
        let out = run_to_string(&mut display, &Plan { dump: true, ..plan() });
        let lines: Vec<_> = out.lines().filter(|l| l.starts_with("Control 0x")).collect();
        assert_eq!(
            lines,
            vec![
                "Control 0x10: +/50/100\t[Brightness]",
                "Control 0x12: +/70/100\t[Contrast]",
            ]
        );

        let out = run_to_string(
            &mut display,
            &Plan {
                dump: true,
                force: true,
                ..plan()
            },
        );
        assert_eq!(out.lines().filter(|l| l.starts_with("Control 0x")).count(), 256);
        assert!(out.contains("Control 0x00: -/0/0\t[Degauss]"));
    }

    #[test]
    fn test_samsung_brackets_session() {
        let mut display = display(SimulatedDisplay::new(0x37));
        let plan = Plan {
            samsung: true,
            ..plan()
        };

        run_to_string(&mut display, &plan);
        let received = &display.transport_mut().received;
        assert_eq!(received.first(), Some(&vec![0x03, SAMSUNG_ENABLE, 0x00, 0x01]));
        assert_eq!(received.last(), Some(&vec![0x03, SAMSUNG_ENABLE, 0x00, 0x00]));
    }

    #[test]
    fn test_failed_edid_continues() {
        let mut display = display(SimulatedDisplay::new(0x37).with_control(BRIGHTNESS, 50, 100));
        let plan = Plan {
            edid: true,
            control: Some(BRIGHTNESS),
            ..plan()
        };

        let out = run_to_string(&mut display, &plan);
        assert!(out.contains("Reading EDID : 0x50@/dev/i2c-4"));
        assert!(!out.contains("Plug and Play ID"));
        assert!(out.contains("Control 0x10: +/50/100"));
    }
}
