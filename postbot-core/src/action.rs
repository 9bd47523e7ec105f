//! Action token grammar: the wire protocol between button presses and the
//! core, parsed once at the event boundary into a tagged variant.
//!
//! Tokens are ASCII strings `verb "_" arg...` with `_` reserved as the field
//! separator. Custom button labels never appear in tokens; buttons are
//! addressed by their position in the profile list.

use crate::error::{PostError, Result};
use crate::types::ReactionKind;

/// A parsed button-press token. Malformed tokens are rejected as
/// [`PostError::UserInput`] before any state is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// `sendto_<mediaRef>_<channelID>`: distribute the staged media.
    SendTo { message_id: i32, channel_id: i64 },
    /// `react_<postID>_<kind>`: toggle the voter's reaction on a post.
    React { post_id: i32, kind: ReactionKind },
    /// `delch_<channelID>`: remove a saved channel.
    DeleteChannel { channel_id: i64 },
    /// `delbtn_<position>`: remove the custom button at this list position.
    DeleteButton { position: i64 },
}

impl CallbackAction {
    /// Parses a raw callback-data string. Verbs and arities are exact; any
    /// leftover or missing field is an error, never a panic.
    pub fn parse(data: &str) -> Result<Self> {
        let malformed = || PostError::UserInput(format!("Unrecognized action: {}", data));

        let (verb, rest) = data.split_once('_').ok_or_else(malformed)?;
        match verb {
            "sendto" => {
                let (message_id, channel_id) = rest.split_once('_').ok_or_else(malformed)?;
                Ok(CallbackAction::SendTo {
                    message_id: message_id.parse().map_err(|_| malformed())?,
                    channel_id: channel_id.parse().map_err(|_| malformed())?,
                })
            }
            "react" => {
                let (post_id, kind) = rest.split_once('_').ok_or_else(malformed)?;
                Ok(CallbackAction::React {
                    post_id: post_id.parse().map_err(|_| malformed())?,
                    kind: ReactionKind::parse(kind).ok_or_else(malformed)?,
                })
            }
            "delch" => Ok(CallbackAction::DeleteChannel {
                channel_id: rest.parse().map_err(|_| malformed())?,
            }),
            "delbtn" => Ok(CallbackAction::DeleteButton {
                position: rest.parse().map_err(|_| malformed())?,
            }),
            _ => Err(malformed()),
        }
    }

    /// Emits the token for this action, inverse of [`parse`](Self::parse).
    pub fn encode(&self) -> String {
        match self {
            CallbackAction::SendTo {
                message_id,
                channel_id,
            } => format!("sendto_{}_{}", message_id, channel_id),
            CallbackAction::React { post_id, kind } => {
                format!("react_{}_{}", post_id, kind.as_str())
            }
            CallbackAction::DeleteChannel { channel_id } => format!("delch_{}", channel_id),
            CallbackAction::DeleteButton { position } => format!("delbtn_{}", position),
        }
    }

    /// True if the token belongs to the reaction tag family. Used by the
    /// keyboard composer to recognize the reaction band inside a live layout
    /// without parsing the full token.
    pub fn is_reaction_tag(data: &str) -> bool {
        data.starts_with("react_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sendto() {
        let action = CallbackAction::parse("sendto_42_-1001234567890").unwrap();
        assert_eq!(
            action,
            CallbackAction::SendTo {
                message_id: 42,
                channel_id: -1001234567890,
            }
        );
    }

    #[test]
    fn test_parse_react() {
        assert_eq!(
            CallbackAction::parse("react_77_like").unwrap(),
            CallbackAction::React {
                post_id: 77,
                kind: ReactionKind::Like,
            }
        );
        assert_eq!(
            CallbackAction::parse("react_77_love").unwrap(),
            CallbackAction::React {
                post_id: 77,
                kind: ReactionKind::Love,
            }
        );
    }

    #[test]
    fn test_parse_delch_negative_id() {
        assert_eq!(
            CallbackAction::parse("delch_-1009").unwrap(),
            CallbackAction::DeleteChannel { channel_id: -1009 }
        );
    }

    #[test]
    fn test_parse_delbtn_position() {
        assert_eq!(
            CallbackAction::parse("delbtn_3").unwrap(),
            CallbackAction::DeleteButton { position: 3 }
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "sendto",
            "sendto_42",
            "sendto_x_y",
            "react_1_hate",
            "react_abc_like",
            "delch_",
            "delbtn_first_button",
            "unknown_1",
        ] {
            assert!(
                matches!(CallbackAction::parse(bad), Err(PostError::UserInput(_))),
                "expected UserInput error for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_encode_round_trip() {
        let actions = [
            CallbackAction::SendTo {
                message_id: 5,
                channel_id: -100123,
            },
            CallbackAction::React {
                post_id: 9,
                kind: ReactionKind::Love,
            },
            CallbackAction::DeleteChannel { channel_id: -100123 },
            CallbackAction::DeleteButton { position: 0 },
        ];
        for action in actions {
            assert_eq!(CallbackAction::parse(&action.encode()).unwrap(), action);
        }
    }

    #[test]
    fn test_reaction_tag_family() {
        assert!(CallbackAction::is_reaction_tag("react_1_like"));
        assert!(!CallbackAction::is_reaction_tag("sendto_1_2"));
        assert!(!CallbackAction::is_reaction_tag("delbtn_0"));
    }
}
