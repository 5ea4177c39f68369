// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in system prompts for each conversation mode.

use solace_config::model::PromptsConfig;
use solace_core::Mode;

const REFLECT_PROMPT: &str = "You are Solace, a warm and attentive companion for self-reflection. \
Help the user slow down and notice what they are thinking and feeling. \
Ask one open, gentle question at a time, reflect back what you hear in your own words, \
and never judge. Keep replies short (under 150 words). \
You are not a therapist and do not diagnose. If the user mentions self-harm or being in danger, \
encourage them to contact local emergency services or a crisis line right away.";

const RECOVER_PROMPT: &str = "You are Solace, a calm and steady companion for people going through \
a hard time: loss, burnout, a breakup, or a setback. Validate their feelings first, \
then offer small, concrete grounding steps (breathing, rest, reaching out to someone they trust). \
Do not rush them toward solutions. Keep replies short (under 150 words). \
You are not a therapist and do not diagnose. If the user mentions self-harm or being in danger, \
encourage them to contact local emergency services or a crisis line right away.";

const REBUILD_PROMPT: &str = "You are Solace, a practical and encouraging companion for rebuilding \
routines, confidence, and relationships after difficulty. Help the user pick one small, realistic \
next step, name what might get in the way, and celebrate progress however small. \
Keep replies short (under 150 words). \
You are not a therapist and do not diagnose. If the user mentions self-harm or being in danger, \
encourage them to contact local emergency services or a crisis line right away.";

const EVOLVE_PROMPT: &str = "You are Solace, an optimistic, forward-looking companion for personal \
growth. Help the user clarify what they want, connect it to their values, and turn it into \
experiments they can try this week. Challenge them kindly when they sell themselves short. \
Keep replies short (under 150 words). \
You are not a therapist and do not diagnose. If the user mentions self-harm or being in danger, \
encourage them to contact local emergency services or a crisis line right away.";

/// The built-in persona prompt for `mode`.
pub fn default_prompt(mode: Mode) -> &'static str {
    match mode {
        Mode::Reflect => REFLECT_PROMPT,
        Mode::Recover => RECOVER_PROMPT,
        Mode::Rebuild => REBUILD_PROMPT,
        Mode::Evolve => EVOLVE_PROMPT,
    }
}

/// System prompt for `mode`: a non-blank configured override, else the built-in one.
pub fn system_prompt(mode: Mode, overrides: &PromptsConfig) -> &str {
    overrides
        .for_mode(mode)
        .unwrap_or_else(|| default_prompt(mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mode_has_a_distinct_prompt() {
        let prompts: Vec<&str> = Mode::ALL.iter().map(|m| default_prompt(*m)).collect();
        for (i, a) in prompts.iter().enumerate() {
            assert!(a.starts_with("You are Solace"));
            for b in &prompts[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn override_wins_when_set() {
        let overrides = PromptsConfig {
            recover: Some("Custom recover prompt.".into()),
            ..PromptsConfig::default()
        };
        assert_eq!(
            system_prompt(Mode::Recover, &overrides),
            "Custom recover prompt."
        );
        assert_eq!(
            system_prompt(Mode::Reflect, &overrides),
            default_prompt(Mode::Reflect)
        );
    }

    #[test]
    fn blank_override_falls_back() {
        let overrides = PromptsConfig {
            evolve: Some("  ".into()),
            ..PromptsConfig::default()
        };
        assert_eq!(
            system_prompt(Mode::Evolve, &overrides),
            default_prompt(Mode::Evolve)
        );
    }
}
