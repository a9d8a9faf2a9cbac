// SPDX-License-Identifier: GPL-3.0-only
//! Human-readable names for VCP control codes
//!
//! Codes come from the USB Monitor Control Class 1.0 and ACCESS.bus 3.0
//! tables, plus a handful of Samsung specific registers ("SAM:").

/// Brightness control code
pub const BRIGHTNESS: u8 = 0x10;

/// Samsung register that gates DDC/CI (MagicTune writes 1 here first)
pub const SAMSUNG_ENABLE: u8 = 0xf5;

/// Name for `code`, or "???" when unknown
pub fn control_name(code: u8) -> &'static str {
    match code {
        0x00 => "Degauss",
        0x01 => "Degauss",
        0x02 => "Secondary Degauss",
        0x04 => "Reset Factory Defaults",
        0x05 => "SAM: Reset Brightness and Contrast",
        0x06 => "Reset Factory Geometry",
        0x08 => "Reset Factory Default Color",
        0x0a => "Reset Factory Default Position",
        0x0c => "Reset Factory Default Size",
        0x0e => "SAM: Image Lock Coarse",
        BRIGHTNESS => "Brightness",
        0x12 => "Contrast",
        0x14 => "Select Color Preset",
        0x16 => "Red Video Gain",
        0x18 => "Green Video Gain",
        0x1a => "Blue Video Gain",
        0x1c => "Focus",
        0x1e => "SAM: Auto Size Center",
        0x20 => "Horizontal Position",
        0x22 => "Horizontal Size",
        0x24 => "Horizontal Pincushion",
        0x26 => "Horizontal Pincushion Balance",
        0x28 => "Horizontal Misconvergence",
        0x2a => "Horizontal Linearity",
        0x2c => "Horizontal Linearity Balance",
        0x30 => "Vertical Position",
        0x32 => "Vertical Size",
        0x34 => "Vertical Pincushion",
        0x36 => "Vertical Pincushion Balance",
        0x38 => "Vertical Misconvergence",
        0x3a => "Vertical Linearity",
        0x3c => "Vertical Linearity Balance",
        0x3e => "SAM: Image Lock Fine",
        0x40 => "Parallelogram Distortion",
        0x42 => "Trapezoidal Distortion",
        0x44 => "Tilt (Rotation)",
        0x46 => "Top Corner Distortion Control",
        0x48 => "Top Corner Distortion Balance",
        0x4a => "Bottom Corner Distortion Control",
        0x4c => "Bottom Corner Distortion Balance",
        0x50 => "Hue",
        0x52 => "Saturation",
        0x54 => "Color Curve Adjust",
        0x56 => "Horizontal Moire",
        0x58 => "Vertical Moire",
        0x5a => "Auto Size Center Enable/Disable",
        0x5c => "Landing Adjust",
        0x5e => "Input Level Select",
        0x60 => "Input Source Select",
        0x62 => "Audio Speaker Volume Adjust",
        0x64 => "Audio Microphone Volume Adjust",
        0x66 => "On Screen Display Enable/Disable",
        0x68 => "Language Select",
        0x6c => "Red Video Black Level",
        0x6e => "Green Video Black Level",
        0x70 => "Blue Video Black Level",
        0xa2 => "Auto Size Center",
        0xa4 => "Polarity Horizontal Synchronization",
        0xa6 => "Polarity Vertical Synchronization",
        0xa8 => "Synchronization Type",
        0xaa => "Screen Orientation",
        0xac => "Horizontal Frequency",
        0xae => "Vertical Frequency",
        0xb0 => "Settings",
        0xca => "On Screen Display",
        0xcc => "SAM: On Screen Display Language",
        0xd4 => "Stereo Mode",
        0xd6 => "SAM: DPMS control (1 - on/4 - stby)",
        0xdc => "SAM: MagicBright (1 - text/2 - internet/3 - entertain/4 - custom)",
        0xdf => "VCP Version",
        0xe0 => "SAM: Color preset (0 - normal/1 - warm/2 - cool)",
        0xe1 => "SAM: Power control (0 - off/1 - on)",
        0xed => "SAM: Red Video Black Level",
        0xee => "SAM: Green Video Black Level",
        0xef => "SAM: Blue Video Black Level",
        SAMSUNG_ENABLE => "SAM: VCP Enable",
        _ => "???",
    }
}
