// SPDX-License-Identifier: GPL-3.0-only
//! Bus access diagnostics
//!
//! When the i2c device node cannot be opened the cause is nearly always one
//! of a handful of setup problems. This checks each of them for the node the
//! user asked for.

use std::fmt;
use std::fs;
use std::path::Path;

/// Where the kernel exposes loaded modules
const I2C_DEV_MODULE: &str = "/sys/module/i2c_dev";

#[derive(Debug, Clone)]
pub struct PermissionCheckResult {
    pub requirements: Vec<PermissionRequirement>,
}

#[derive(Debug, Clone)]
pub struct PermissionRequirement {
    pub name: String,
    pub description: String,
    pub status: RequirementStatus,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RequirementStatus {
    Met,
    NotMet,
    NotApplicable,
}

impl PermissionCheckResult {
    pub fn has_issues(&self) -> bool {
        self.requirements.iter().any(|r| r.status == RequirementStatus::NotMet)
    }

    pub fn summary(&self) -> String {
        let not_met = self
            .requirements
            .iter()
            .filter(|r| r.status == RequirementStatus::NotMet)
            .count();

        if not_met == 0 {
            let met_count = self
                .requirements
                .iter()
                .filter(|r| r.status == RequirementStatus::Met)
                .count();
            format!("All {} requirements met", met_count)
        } else {
            format!("{} requirement(s) not met", not_met)
        }
    }
}

impl fmt::Display for PermissionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = match self.status {
            RequirementStatus::Met => "ok",
            RequirementStatus::NotMet => "missing",
            RequirementStatus::NotApplicable => "n/a",
        };
        write!(f, "[{}] {}: {}", mark, self.name, self.description)
    }
}

/// Check what is needed to talk DDC/CI through `device`
pub fn check_bus_access(device: &Path) -> PermissionCheckResult {
    let mut requirements = Vec::new();
    let exists = device.exists();

    requirements.push(PermissionRequirement {
        name: "Device node".to_string(),
        description: if exists {
            format!("{} exists", device.display())
        } else {
            format!("{} not found", device.display())
        },
        status: met_if(exists),
    });

    // DDC/CI needs both directions
    let writable = exists && can_read_write(device);
    requirements.push(PermissionRequirement {
        name: "I2C read/write access".to_string(),
        description: if !exists {
            "N/A".to_string()
        } else if writable {
            "Device can be opened read/write".to_string()
        } else {
            "Permission denied".to_string()
        },
        status: if exists {
            met_if(writable)
        } else {
            RequirementStatus::NotApplicable
        },
    });

    let in_i2c_group = is_in_i2c_group();
    requirements.push(PermissionRequirement {
        name: "i2c group".to_string(),
        description: if in_i2c_group {
            "User is in i2c group".to_string()
        } else {
            "User not in i2c group".to_string()
        },
        status: met_if(in_i2c_group),
    });

    let module_loaded = Path::new(I2C_DEV_MODULE).exists();
    requirements.push(PermissionRequirement {
        name: "i2c-dev module".to_string(),
        description: if module_loaded {
            "i2c-dev is loaded".to_string()
        } else {
            "i2c-dev is not loaded, try `modprobe i2c-dev`".to_string()
        },
        status: met_if(module_loaded),
    });

    PermissionCheckResult { requirements }
}

fn met_if(condition: bool) -> RequirementStatus {
    if condition {
        RequirementStatus::Met
    } else {
        RequirementStatus::NotMet
    }
}

fn can_read_write(path: &Path) -> bool {
    fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .is_ok()
}

/// Check if current user is in the i2c group
fn is_in_i2c_group() -> bool {
    use std::process::Command;

    match Command::new("groups").output() {
        Ok(output) => match String::from_utf8(output.stdout) {
            Ok(groups) => {
                debug!("Groups output: '{}'", groups.trim());
                has_group(&groups, "i2c")
            }
            Err(e) => {
                debug!("Failed to parse groups output: {}", e);
                false
            }
        },
        Err(e) => {
            debug!("Failed to run groups command: {}", e);
            false
        }
    }
}

fn has_group(groups: &str, name: &str) -> bool {
    groups.split_whitespace().any(|g| g == name)
}
