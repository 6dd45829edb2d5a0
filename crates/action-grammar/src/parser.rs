//! Tokenizer for compound command strings

use crate::{CompoundAction, DeviceClass, Direction, PowerState, Token};

const PRESET_PREFIX: &str = "goto_preset_";

/// Parse a compound command string into its primitive tokens.
///
/// Splits on `+`, trims and lower-cases each piece, and drops empty pieces.
/// Unknown pieces are kept as [`Token::Unrecognized`] so the executor can
/// report them in sequence order.
pub fn parse(cmd: &str) -> CompoundAction {
    let tokens: Vec<Token> = cmd
        .split('+')
        .map(|raw| raw.trim().to_lowercase())
        .filter(|raw| !raw.is_empty())
        .map(|raw| classify(&raw))
        .collect();
    tracing::debug!(cmd, count = tokens.len(), "parsed compound command");
    CompoundAction::new(tokens)
}

fn classify(raw: &str) -> Token {
    match raw {
        "snapshot" => Token::Snapshot,
        "left" => Token::Motion(Direction::Left),
        "right" => Token::Motion(Direction::Right),
        "up" => Token::Motion(Direction::Up),
        "down" => Token::Motion(Direction::Down),
        "on" => Token::Power(PowerState::On),
        "off" => Token::Power(PowerState::Off),
        "lamp" => Token::DeviceClass(DeviceClass::Lamp),
        "plug" => Token::DeviceClass(DeviceClass::Plug),
        _ => match raw.strip_prefix(PRESET_PREFIX) {
            Some(idx) => match idx.parse::<u32>() {
                Ok(idx) => Token::Preset(idx),
                Err(_) => Token::Unrecognized(raw.to_string()),
            },
            None => Token::Unrecognized(raw.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_trims_and_lowercases() {
        let actions = parse("Right+ SNAPSHOT +");
        assert_eq!(
            actions.tokens(),
            &[Token::Motion(Direction::Right), Token::Snapshot]
        );
    }

    #[test]
    fn parses_preset_index() {
        assert_eq!(parse("goto_preset_3").tokens(), &[Token::Preset(3)]);
    }

    #[test]
    fn bad_preset_index_is_unrecognized() {
        assert_eq!(
            parse("goto_preset_x").tokens(),
            &[Token::Unrecognized("goto_preset_x".to_string())]
        );
    }

    #[test]
    fn power_and_class_tokens() {
        let actions = parse("lamp+on+off+plug");
        assert_eq!(
            actions.tokens(),
            &[
                Token::DeviceClass(DeviceClass::Lamp),
                Token::Power(PowerState::On),
                Token::Power(PowerState::Off),
                Token::DeviceClass(DeviceClass::Plug),
            ]
        );
    }

    #[test]
    fn empty_command_yields_no_tokens() {
        assert!(parse("").is_empty());
        assert!(parse(" + + ").is_empty());
    }

    #[test]
    fn actionable_predicate_ignores_unrecognized_and_class() {
        assert!(!parse("dance+lamp").has_actionable());
        assert!(parse("dance+on").has_actionable());
    }

    #[test]
    fn snapshot_predicate() {
        assert!(parse("left+snapshot").has_snapshot());
        assert!(!parse("left+right").has_snapshot());
    }
}
