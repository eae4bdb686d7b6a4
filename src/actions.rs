//! Keyboard shortcuts mapped to game actions.

/// Something the player asked for without using the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Same as clicking the cookie.
    ClickCookie,
    /// Buy one unit of the catalog entry at this index.
    Buy(usize),
}

/// `c` or space clicks the cookie; `1`..`9` buy the matching item.
pub fn action_for_key(key: char) -> Option<Action> {
    match key {
        'c' | 'C' | ' ' => Some(Action::ClickCookie),
        '1'..='9' => key.to_digit(10).map(|d| Action::Buy(d as usize - 1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_are_one_based() {
        assert_eq!(action_for_key('1'), Some(Action::Buy(0)));
        assert_eq!(action_for_key('9'), Some(Action::Buy(8)));
        assert_eq!(action_for_key('0'), None);
    }

    #[test]
    fn click_keys() {
        assert_eq!(action_for_key('c'), Some(Action::ClickCookie));
        assert_eq!(action_for_key(' '), Some(Action::ClickCookie));
        assert_eq!(action_for_key('x'), None);
    }
}
