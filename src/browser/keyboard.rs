//! Keyboard key definitions and utilities.
//!
//! Special keys travel inside `element.sendKeys` text as Unicode private-use
//! code points (`U+E000` block).
//!
//! # Example
//!
//! ```ignore
//! use remote_webdriver::Key;
//!
//! // Navigation keys
//! element.press(Key::Enter).await?;
//! element.press(Key::Tab).await?;
//!
//! // Mixed text and keys
//! element.send_keys(&format!("hello{}", Key::Enter)).await?;
//! ```

use std::fmt;

// ============================================================================
// Key Enum
// ============================================================================

/// Special keyboard keys.
///
/// For typing text, use `element.send_keys()` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // ========================================================================
    // Navigation & Control
    // ========================================================================
    /// Enter key
    Enter,
    /// Return key
    Return,
    /// Tab key
    Tab,
    /// Escape key
    Escape,
    /// Backspace key
    Backspace,
    /// Delete key
    Delete,
    /// Insert key
    Insert,
    /// Space bar
    Space,

    // ========================================================================
    // Arrow Keys
    // ========================================================================
    /// Arrow Up
    ArrowUp,
    /// Arrow Down
    ArrowDown,
    /// Arrow Left
    ArrowLeft,
    /// Arrow Right
    ArrowRight,

    // ========================================================================
    // Page Navigation
    // ========================================================================
    /// Home key
    Home,
    /// End key
    End,
    /// Page Up key
    PageUp,
    /// Page Down key
    PageDown,

    // ========================================================================
    // Modifiers
    // ========================================================================
    /// Shift modifier
    Shift,
    /// Control modifier
    Control,
    /// Alt modifier
    Alt,
    /// Meta (Command/Windows) modifier
    Meta,
    /// Releases all held modifiers
    Null,
}

impl Key {
    /// Returns the private-use code point sent on the wire.
    #[must_use]
    pub const fn code_point(self) -> char {
        match self {
            Key::Null => '\u{E000}',
            Key::Backspace => '\u{E003}',
            Key::Tab => '\u{E004}',
            Key::Return => '\u{E006}',
            Key::Enter => '\u{E007}',
            Key::Shift => '\u{E008}',
            Key::Control => '\u{E009}',
            Key::Alt => '\u{E00A}',
            Key::Escape => '\u{E00C}',
            Key::Space => '\u{E00D}',
            Key::PageUp => '\u{E00E}',
            Key::PageDown => '\u{E00F}',
            Key::End => '\u{E010}',
            Key::Home => '\u{E011}',
            Key::ArrowLeft => '\u{E012}',
            Key::ArrowUp => '\u{E013}',
            Key::ArrowRight => '\u{E014}',
            Key::ArrowDown => '\u{E015}',
            Key::Insert => '\u{E016}',
            Key::Delete => '\u{E017}',
            Key::Meta => '\u{E03D}',
        }
    }

    /// Returns `true` for keys that stay held until [`Key::Null`].
    #[inline]
    #[must_use]
    pub const fn is_modifier(self) -> bool {
        matches!(self, Key::Shift | Key::Control | Key::Alt | Key::Meta)
    }

    /// Builds a chord: modifiers held while `text` is typed, then released.
    ///
    /// # Example
    ///
    /// ```
    /// use remote_webdriver::Key;
    ///
    /// let select_all = Key::chord(&[Key::Control], "a");
    /// assert_eq!(select_all, "\u{E009}a\u{E000}");
    /// ```
    #[must_use]
    pub fn chord(keys: &[Key], text: &str) -> String {
        let mut out: String = keys.iter().map(|k| k.code_point()).collect();
        out.push_str(text);
        out.push(Key::Null.code_point());
        out
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code_point())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_points() {
        assert_eq!(Key::Enter.code_point(), '\u{E007}');
        assert_eq!(Key::Tab.code_point(), '\u{E004}');
        assert_eq!(Key::Null.code_point(), '\u{E000}');
    }

    #[test]
    fn test_display_is_code_point() {
        assert_eq!(format!("a{}", Key::Enter), "a\u{E007}");
    }

    #[test]
    fn test_modifiers() {
        assert!(Key::Shift.is_modifier());
        assert!(!Key::Enter.is_modifier());
    }

    #[test]
    fn test_chord() {
        assert_eq!(
            Key::chord(&[Key::Control, Key::Shift], "k"),
            "\u{E009}\u{E008}k\u{E000}"
        );
    }
}
