// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Startup key/value overrides, e.g. from the command line.

use super::{NamedVariant, ShadingMode, VrsSettings};
use crate::capability::VrsCapabilities;
use crate::rate::{ShadingRate, ShadingRateCombiner};

/// Key/value pairs collected from `-key value`, `--key=value` or `key=value`
/// tokens. Keys are case-insensitive; the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupOverrides {
    entries: Vec<(String, String)>,
}

impl StartupOverrides {
    /// Collects overrides from an argument list. Tokens that are neither a
    /// dashed key nor `key=value` are ignored.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        let mut entries = Vec::new();
        let mut i = 0;
        while i < args.len() {
            let token = args[i].as_str();
            let dashed = token.starts_with('-');
            let body = token.trim_start_matches('-');
            if let Some((key, value)) = body.split_once('=') {
                entries.push((key.to_ascii_lowercase(), value.to_string()));
            } else if dashed && !body.is_empty() {
                let value = match args.get(i + 1) {
                    Some(next) if !next.starts_with('-') => {
                        i += 1;
                        next.clone()
                    }
                    _ => String::new(),
                };
                entries.push((body.to_ascii_lowercase(), value));
            }
            i += 1;
        }
        Self { entries }
    }

    /// Value of `key`, if given.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Whether no override was collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Applies the recognized keys to `settings`.
    ///
    /// | Key         | Effect                                   |
    /// |-------------|------------------------------------------|
    /// | `vrs`       | `on`/`off`, feature enable               |
    /// | `overlay`   | `on`/`off`, debug overlay                |
    /// | `rate`      | tier-1 rate name, gated on capabilities  |
    /// | `combiner1` | first combiner name                      |
    /// | `combiner2` | second combiner name                     |
    /// | `mode`      | shading mode name                        |
    ///
    /// Invalid values fall back to the default with a notice.
    pub fn apply(&self, settings: &mut VrsSettings, capabilities: &VrsCapabilities) {
        if let Some(value) = self.get("vrs") {
            settings.enabled = parse_switch("vrs", value, true);
        }
        if let Some(value) = self.get("overlay") {
            settings.overlay.enabled = parse_switch("overlay", value, false);
        }
        if let Some(value) = self.get("rate") {
            let rate = ShadingRate::parse_or_default(value);
            settings.set_tier1_rate(rate, capabilities);
        }
        if let Some(value) = self.get("combiner1") {
            settings.combiners.first = ShadingRateCombiner::parse_or_default(value);
        }
        if let Some(value) = self.get("combiner2") {
            settings.combiners.second = ShadingRateCombiner::parse_or_default(value);
        }
        if let Some(value) = self.get("mode") {
            settings.mode = ShadingMode::parse_or_default(value);
        }

        for (key, _) in &self.entries {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                log::debug!("Ignoring startup option '{key}'");
            }
        }
    }
}

const KNOWN_KEYS: [&str; 6] = ["vrs", "overlay", "rate", "combiner1", "combiner2", "mode"];

fn parse_switch(key: &str, value: &str, default: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => true,
        "off" | "false" | "0" | "no" => false,
        _ => {
            log::warn!(
                "Unrecognized value '{value}' for '{key}', using {}",
                if default { "on" } else { "off" }
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::ShadingRateTier;

    fn caps(additional_rates: bool) -> VrsCapabilities {
        VrsCapabilities {
            tier: ShadingRateTier::Tier2,
            tile_size: 16,
            additional_rates,
            sum_combiner: false,
        }
    }

    #[test]
    fn test_parse_token_styles() {
        let overrides = StartupOverrides::parse([
            "-vrs",
            "off",
            "--rate=2X2",
            "combiner1=max",
            "-flag",
            "-overlay",
            "on",
        ]);
        assert_eq!(overrides.get("vrs"), Some("off"));
        assert_eq!(overrides.get("RATE"), Some("2X2"));
        assert_eq!(overrides.get("combiner1"), Some("max"));
        assert_eq!(overrides.get("flag"), Some(""));
        assert_eq!(overrides.get("overlay"), Some("on"));
        assert_eq!(overrides.get("missing"), None);
    }

    #[test]
    fn test_apply_recognized_keys() {
        let mut settings = VrsSettings::default();
        let overrides = StartupOverrides::parse([
            "-vrs", "off", "-overlay", "on", "-rate", "2x1", "-combiner1", "Min",
            "-combiner2", "sum", "-mode", "foveated",
        ]);
        overrides.apply(&mut settings, &caps(false));
        assert!(!settings.enabled);
        assert!(settings.overlay.enabled);
        assert_eq!(settings.tier1_rate(), ShadingRate::R2x1);
        assert_eq!(settings.combiners.first, ShadingRateCombiner::Min);
        assert_eq!(settings.combiners.second, ShadingRateCombiner::Sum);
        assert_eq!(settings.mode, ShadingMode::Foveated);
    }

    #[test]
    fn test_mode_override_accepts_strategy_names() {
        for mode in ShadingMode::ALL {
            let mut settings = VrsSettings::default();
            settings.mode = ShadingMode::Quadrant;
            let token = format!("mode={}", mode.strategy_name());
            StartupOverrides::parse([token.as_str()]).apply(&mut settings, &caps(true));
            assert_eq!(settings.mode, mode);
        }
    }

    #[test]
    fn test_extended_rate_override_is_gated() {
        for rate in ["2X4", "4X2", "4X4"] {
            let mut settings = VrsSettings::default();
            StartupOverrides::parse(["-rate", rate]).apply(&mut settings, &caps(false));
            assert_eq!(settings.tier1_rate(), ShadingRate::R1x1);

            StartupOverrides::parse(["-rate", rate]).apply(&mut settings, &caps(true));
            assert!(settings.tier1_rate().is_extended());
        }
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let mut settings = VrsSettings::default();
        settings.combiners.first = ShadingRateCombiner::Max;
        StartupOverrides::parse(["-vrs", "maybe", "-combiner1", "blend", "-rate", "3X3"])
            .apply(&mut settings, &caps(true));
        assert!(settings.enabled);
        assert_eq!(settings.combiners.first, ShadingRateCombiner::Passthrough);
        assert_eq!(settings.tier1_rate(), ShadingRate::R1x1);
    }
}
