use std::str::FromStr;

use super::board::SQUARES;
use super::game::Action;
use super::Error;

/// Parses one line of player input.
///
/// Squares are numbered 1 to 9 in reading order. `j N` (also `jump N` or
/// `goto N`) views move N and `s` (or `sort`) flips the move list.
impl FromStr for Action {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim().to_ascii_lowercase();
        let mut words = line.split_whitespace();

        match (words.next(), words.next(), words.next()) {
            (Some("s" | "sort"), None, None) => Ok(Action::ToggleSort),
            (Some("j" | "jump" | "goto"), Some(ordinal), None) => ordinal
                .parse::<usize>()
                .map(Action::JumpTo)
                .map_err(Error::InvalidInteger),
            (Some(word), None, None) if word.bytes().all(|b| b.is_ascii_digit()) => {
                let square = word.parse::<usize>().map_err(Error::InvalidInteger)?;
                if (1..=SQUARES).contains(&square) {
                    Ok(Action::Play(square - 1))
                } else {
                    Err(Error::InvalidIndex(square))
                }
            }
            _ => Err(Error::UnknownCommand(line.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squares_are_one_based() {
        assert_eq!("1".parse(), Ok(Action::Play(0)));
        assert_eq!(" 9 \n".parse(), Ok(Action::Play(8)));
    }

    #[test]
    fn squares_out_of_range() {
        assert_eq!("0".parse::<Action>(), Err(Error::InvalidIndex(0)));
        assert_eq!("10".parse::<Action>(), Err(Error::InvalidIndex(10)));
    }

    #[test]
    fn jump_commands() {
        assert_eq!("j 3".parse(), Ok(Action::JumpTo(3)));
        assert_eq!("Jump 0".parse(), Ok(Action::JumpTo(0)));
        assert_eq!("goto   12".parse(), Ok(Action::JumpTo(12)));
        assert!(matches!(
            "j x".parse::<Action>(),
            Err(Error::InvalidInteger(_))
        ));
    }

    #[test]
    fn sort_commands() {
        assert_eq!("s".parse(), Ok(Action::ToggleSort));
        assert_eq!("SORT".parse(), Ok(Action::ToggleSort));
    }

    #[test]
    fn unknown_commands() {
        assert_eq!(
            "hello".parse::<Action>(),
            Err(Error::UnknownCommand("hello".to_string()))
        );
        assert!(matches!("j".parse::<Action>(), Err(Error::UnknownCommand(_))));
        assert!(matches!("".parse::<Action>(), Err(Error::UnknownCommand(_))));
    }
}
