//! Terminal capability detection.

use cellscreen_core::Toggle;

/// `TERM` prefixes whose terminfo entries advertise italics (`sitm`).
const ITALIC_TERMS: [&str; 9] = [
    "xterm",
    "tmux",
    "alacritty",
    "kitty",
    "xterm-kitty",
    "wezterm",
    "foot",
    "rxvt-unicode",
    "ghostty",
];

/// `TERM_PROGRAM` values of emulators known to render italics.
const ITALIC_PROGRAMS: [&str; 6] = [
    "iTerm.app",
    "WezTerm",
    "vscode",
    "ghostty",
    "Apple_Terminal",
    "tmux",
];

/// Rendering capabilities the attribute translator cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// The terminal renders italic text.
    pub italic: bool,
}

impl Capabilities {
    /// Detect capabilities, honouring a configured override.
    #[must_use]
    pub fn detect(italic: Toggle) -> Self {
        Self::detect_with_env(
            italic,
            std::env::var("TERM").ok(),
            std::env::var("TERM_PROGRAM").ok(),
        )
    }

    /// Detect capabilities from environment variable values.
    /// This is the testable core of `detect()`.
    #[must_use]
    #[allow(clippy::needless_pass_by_value)]
    pub fn detect_with_env(
        italic: Toggle,
        term: Option<String>,
        term_program: Option<String>,
    ) -> Self {
        let italic = match italic {
            Toggle::On => true,
            Toggle::Off => false,
            Toggle::Auto => italic_from_env(term.as_deref(), term_program.as_deref()),
        };
        Self { italic }
    }
}

fn italic_from_env(term: Option<&str>, term_program: Option<&str>) -> bool {
    // TERM_PROGRAM wins over TERM.
    if let Some(program) = term_program {
        if ITALIC_PROGRAMS.contains(&program) {
            return true;
        }
    }

    match term {
        Some("dumb" | "linux") | None => false,
        // Plain screen entries lack sitm even when the outer terminal has it.
        Some(t) if t.starts_with("screen") => false,
        Some(t) => ITALIC_TERMS.iter().any(|prefix| t.starts_with(prefix)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auto(term: Option<&str>, program: Option<&str>) -> bool {
        Capabilities::detect_with_env(
            Toggle::Auto,
            term.map(str::to_string),
            program.map(str::to_string),
        )
        .italic
    }

    #[test]
    fn test_detect_table() {
        let cases: [(Toggle, Option<&str>, Option<&str>, bool); 10] = [
            (Toggle::Auto, Some("xterm-256color"), None, true),
            (Toggle::Auto, Some("dumb"), None, false),
            (Toggle::Auto, Some("screen-256color"), None, false),
            (Toggle::Auto, Some("screen-256color"), Some("tmux"), true),
            (Toggle::Auto, Some("vt100"), Some("Apple_Terminal"), true),
            (Toggle::Auto, None, None, false),
            (Toggle::On, Some("dumb"), None, true),
            (Toggle::On, None, None, true),
            (Toggle::Off, Some("xterm-256color"), Some("iTerm.app"), false),
            (Toggle::Off, None, None, false),
        ];
        for (toggle, term, program, expected) in cases {
            let caps = Capabilities::detect_with_env(
                toggle,
                term.map(str::to_string),
                program.map(str::to_string),
            );
            assert_eq!(
                caps.italic, expected,
                "{toggle:?} TERM={term:?} TERM_PROGRAM={program:?}"
            );
        }
    }

    #[test]
    fn test_detect_override_ignores_process_env() {
        assert!(Capabilities::detect(Toggle::On).italic);
        assert!(!Capabilities::detect(Toggle::Off).italic);
    }

    #[test]
    fn test_forced_on_ignores_env() {
        let caps = Capabilities::detect_with_env(Toggle::On, Some("dumb".to_string()), None);
        assert!(caps.italic);
    }

    #[test]
    fn test_forced_off_ignores_env() {
        let caps =
            Capabilities::detect_with_env(Toggle::Off, Some("xterm-256color".to_string()), None);
        assert!(!caps.italic);
    }

    #[test]
    fn test_detect_term_xterm() {
        assert!(auto(Some("xterm-256color"), None));
        assert!(auto(Some("xterm"), None));
    }

    #[test]
    fn test_detect_term_tmux_and_kitty() {
        assert!(auto(Some("tmux-256color"), None));
        assert!(auto(Some("xterm-kitty"), None));
        assert!(auto(Some("alacritty"), None));
    }

    #[test]
    fn test_detect_term_screen() {
        assert!(!auto(Some("screen-256color"), None));
        assert!(!auto(Some("screen"), None));
    }

    #[test]
    fn test_detect_term_dumb_and_none() {
        assert!(!auto(Some("dumb"), None));
        assert!(!auto(Some("linux"), None));
        assert!(!auto(None, None));
    }

    #[test]
    fn test_detect_term_unknown() {
        assert!(!auto(Some("vt100"), None));
    }

    #[test]
    fn test_detect_term_program_priority() {
        assert!(auto(Some("screen"), Some("iTerm.app")));
        assert!(auto(None, Some("WezTerm")));
        assert!(!auto(Some("vt220"), Some("unknown-emulator")));
    }
}
