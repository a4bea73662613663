//! Flat `key:value` profile files.
//!
//! A profile stores a look as nine lines in a fixed order:
//!
//! ```text
//! lut_file_index:3
//! lut_strength:0.8
//! grain_strength:0.25
//! vignette_strength:0.5
//! hue:1
//! saturation:0.9
//! lightness:1
//! brightness:0.02
//! contrast:1.05
//! ```
//!
//! Reading is tolerant: a bad or missing line is reported as a
//! [`ProfileWarning`] and the field stays at zero. Only I/O failures are
//! errors.

use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DsipResult, ProfileWarning, ProfileWarningKind};
use crate::params::ProcessParams;

/// Profile keys in file order.
pub const PROFILE_KEYS: [&str; 9] = [
    "lut_file_index",
    "lut_strength",
    "grain_strength",
    "vignette_strength",
    "hue",
    "saturation",
    "lightness",
    "brightness",
    "contrast",
];

/// Stored look. `Default` is all zeros, which is also what an empty file
/// parses to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Index into the LUT library.
    pub lut_file_index: i32,
    pub lut_strength: f32,
    pub grain_strength: f32,
    pub vignette_strength: f32,
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub brightness: f32,
    pub contrast: f32,
}

/// Result of parsing a profile: the values plus any tolerated problems.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedProfile {
    pub profile: Profile,
    pub warnings: Vec<ProfileWarning>,
}

impl Profile {
    /// Capture `params` together with the selected LUT.
    pub fn from_params(params: &ProcessParams, lut_file_index: i32) -> Self {
        Self {
            lut_file_index,
            lut_strength: params.lut_strength,
            grain_strength: params.grain_strength,
            vignette_strength: params.vignette_strength,
            hue: params.hue,
            saturation: params.saturation,
            lightness: params.lightness,
            brightness: params.brightness,
            contrast: params.contrast,
        }
    }

    /// Parameters for an export run (`cpu_pipeline` set).
    pub fn to_params(&self) -> ProcessParams {
        ProcessParams {
            lut_strength: self.lut_strength,
            grain_strength: self.grain_strength,
            vignette_strength: self.vignette_strength,
            hue: self.hue,
            saturation: self.saturation,
            lightness: self.lightness,
            brightness: self.brightness,
            contrast: self.contrast,
            cpu_pipeline: true,
        }
    }

    /// Keys whose value lies outside the slider range the editor offers.
    /// Such values are still applied as-is.
    pub fn outside_ui_ranges(&self) -> Vec<&'static str> {
        let params = self.to_params();
        let clamped = params.clamped_to_ui();
        let pairs = [
            (params.lut_strength, clamped.lut_strength),
            (params.grain_strength, clamped.grain_strength),
            (params.vignette_strength, clamped.vignette_strength),
            (params.hue, clamped.hue),
            (params.saturation, clamped.saturation),
            (params.lightness, clamped.lightness),
            (params.brightness, clamped.brightness),
            (params.contrast, clamped.contrast),
        ];
        PROFILE_KEYS[1..]
            .iter()
            .zip(pairs)
            .filter(|(_, (value, clamped))| value != clamped)
            .map(|(key, _)| *key)
            .collect()
    }

    /// Parse profile text. Never fails.
    pub fn parse(text: &str) -> ParsedProfile {
        let mut profile = Profile::default();
        let mut warnings = Vec::new();
        let mut seen = [false; PROFILE_KEYS.len()];

        for (n, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let line_no = Some(n + 1);

            let Some((key, value)) = line.split_once(':') else {
                warnings.push(ProfileWarning {
                    line: line_no,
                    kind: ProfileWarningKind::Malformed(line.to_string()),
                });
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            let Some(slot) = PROFILE_KEYS.iter().position(|k| *k == key) else {
                warnings.push(ProfileWarning {
                    line: line_no,
                    kind: ProfileWarningKind::UnknownKey(key.to_string()),
                });
                continue;
            };
            let key = PROFILE_KEYS[slot];

            if seen[slot] {
                warnings.push(ProfileWarning {
                    line: line_no,
                    kind: ProfileWarningKind::Duplicate(key),
                });
            }

            if profile.set_field(slot, value) {
                seen[slot] = true;
            } else {
                warnings.push(ProfileWarning {
                    line: line_no,
                    kind: ProfileWarningKind::InvalidValue {
                        key,
                        value: value.to_string(),
                    },
                });
            }
        }

        for (slot, key) in PROFILE_KEYS.iter().enumerate() {
            let reported = warnings.iter().any(|w| {
                matches!(&w.kind, ProfileWarningKind::InvalidValue { key: k, .. } if k == key)
            });
            if !seen[slot] && !reported {
                warnings.push(ProfileWarning {
                    line: None,
                    kind: ProfileWarningKind::Missing(key),
                });
            }
        }

        ParsedProfile { profile, warnings }
    }

    /// Store `value` into the field at `slot`. Returns false when it does not parse.
    fn set_field(&mut self, slot: usize, value: &str) -> bool {
        if slot == 0 {
            return match value.parse::<i32>() {
                Ok(v) => {
                    self.lut_file_index = v;
                    true
                }
                Err(_) => false,
            };
        }
        let Ok(v) = value.parse::<f32>() else {
            return false;
        };
        let field = match slot {
            1 => &mut self.lut_strength,
            2 => &mut self.grain_strength,
            3 => &mut self.vignette_strength,
            4 => &mut self.hue,
            5 => &mut self.saturation,
            6 => &mut self.lightness,
            7 => &mut self.brightness,
            _ => &mut self.contrast,
        };
        *field = v;
        true
    }

    /// Profile text in canonical key order, one `key:value` per line.
    pub fn to_text(&self) -> String {
        let floats = [
            self.lut_strength,
            self.grain_strength,
            self.vignette_strength,
            self.hue,
            self.saturation,
            self.lightness,
            self.brightness,
            self.contrast,
        ];
        let mut out = String::new();
        let _ = writeln!(out, "{}:{}", PROFILE_KEYS[0], self.lut_file_index);
        for (key, value) in PROFILE_KEYS[1..].iter().zip(floats) {
            let _ = writeln!(out, "{key}:{value}");
        }
        out
    }

    /// Read and parse a profile file. Warnings are logged and returned.
    pub fn load(path: &Path) -> DsipResult<ParsedProfile> {
        let text = std::fs::read_to_string(path)?;
        let parsed = Self::parse(&text);
        for warning in &parsed.warnings {
            tracing::warn!("{}: {warning}", path.display());
        }
        tracing::debug!(path = %path.display(), "loaded profile");
        Ok(parsed)
    }

    /// Write this profile to `path`.
    pub fn save(&self, path: &Path) -> DsipResult<()> {
        std::fs::write(path, self.to_text())?;
        tracing::debug!(path = %path.display(), "saved profile");
        Ok(())
    }
}
