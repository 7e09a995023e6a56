//! Keyboard commands.
//!
//! A command is selected by the first character of an input line. Speed
//! selection is case-sensitive; every other key is not.

/// Banner printed before the pipeline starts.
pub const USAGE: &str = "\
USAGE: Choose one of the following options, then press enter:
 'P' to toggle between PAUSE and PLAY
 's' to switch to fast playback (20x), 'S' to switch back to slow playback (4x)
 'D' to toggle playback direction
 'N' to move to next frame (in the current direction, better in PAUSE)
 'Q' to quit";

/// Playback-control actions a line of input can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    FastSpeed,
    SlowSpeed,
    ReverseDirection,
    StepFrame,
    Quit,
}

impl Command {
    /// Map an input line to a command; unknown and empty lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        match line.chars().next()? {
            'p' | 'P' => Some(Self::TogglePause),
            's' => Some(Self::FastSpeed),
            'S' => Some(Self::SlowSpeed),
            'd' | 'D' => Some(Self::ReverseDirection),
            'n' | 'N' => Some(Self::StepFrame),
            'q' | 'Q' => Some(Self::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_except_speed() {
        assert_eq!(Command::parse("p"), Some(Command::TogglePause));
        assert_eq!(Command::parse("P"), Some(Command::TogglePause));
        assert_eq!(Command::parse("s"), Some(Command::FastSpeed));
        assert_eq!(Command::parse("S"), Some(Command::SlowSpeed));
        assert_eq!(Command::parse("D"), Some(Command::ReverseDirection));
        assert_eq!(Command::parse("n"), Some(Command::StepFrame));
        assert_eq!(Command::parse("Q"), Some(Command::Quit));
    }

    #[test]
    fn parse_only_looks_at_first_character() {
        assert_eq!(Command::parse("pause please"), Some(Command::TogglePause));
        assert_eq!(Command::parse("xq"), None);
    }

    #[test]
    fn parse_ignores_empty_and_unknown_lines() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse(" p"), None);
        assert_eq!(Command::parse("z"), None);
    }
}
