//! Playback commands and their transport tags.

use bridge_traits::ActionIntent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A playback command.
///
/// Each variant has a stable integer tag used when the command crosses the
/// host boundary inside an [`ActionIntent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Play,
    Pause,
    Resume,
    Previous,
    Next,
    Close,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Play,
        Action::Pause,
        Action::Resume,
        Action::Previous,
        Action::Next,
        Action::Close,
    ];

    pub fn tag(self) -> i32 {
        match self {
            Action::Play => 0,
            Action::Pause => 1,
            Action::Resume => 2,
            Action::Previous => 3,
            Action::Next => 4,
            Action::Close => 5,
        }
    }

    /// Map a transport tag back to its command. Unknown tags yield `None`.
    pub fn from_tag(tag: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.tag() == tag)
    }

    /// Envelope a host can attach to a control and hand back on tap.
    pub fn intent(self) -> ActionIntent {
        ActionIntent::new(self.tag())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Play => "play",
            Action::Pause => "pause",
            Action::Resume => "resume",
            Action::Previous => "previous",
            Action::Next => "next",
            Action::Close => "close",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_stable() {
        let tags: Vec<i32> = Action::ALL.iter().map(|a| a.tag()).collect();
        assert_eq!(tags, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn from_tag_round_trips_known_tags() {
        for action in Action::ALL {
            assert_eq!(Action::from_tag(action.tag()), Some(action));
        }
        assert_eq!(Action::from_tag(6), None);
        assert_eq!(Action::from_tag(-1), None);
    }

    #[test]
    fn intent_carries_tag() {
        let intent = Action::Next.intent();
        assert!(intent.is_action());
        assert_eq!(intent.value, 4);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Action::Previous).unwrap(), "\"previous\"");
        assert_eq!(Action::Resume.to_string(), "resume");
    }
}
