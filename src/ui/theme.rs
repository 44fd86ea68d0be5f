use owo_colors::Style;
use std::sync::OnceLock;

static PALETTE: OnceLock<Palette> = OnceLock::new();

/// Styles for the stderr report printed around an extraction.
#[derive(Debug, Clone)]
pub struct Palette {
    pub heading: Style,
    pub ok: Style,
    pub failure: Style,
    pub label: Style,
}

impl Palette {
    /// Color only when stderr is a terminal that accepts it; stdout may be piped entries.
    pub fn for_stderr() -> Self {
        if console::Term::stderr().is_term() && console::colors_enabled_stderr() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn colored() -> Self {
        Self {
            heading: Style::new().cyan().bold(),
            ok: Style::new().green().bold(),
            failure: Style::new().red().bold(),
            label: Style::new().dimmed(),
        }
    }

    pub fn plain() -> Self {
        Self {
            heading: Style::new(),
            ok: Style::new(),
            failure: Style::new(),
            label: Style::new(),
        }
    }
}

pub fn palette() -> &'static Palette {
    PALETTE.get_or_init(Palette::for_stderr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;

    #[test]
    fn test_plain_palette_leaves_text_alone() {
        let plain = Palette::plain();
        assert_eq!("top.sv".style(plain.heading).to_string(), "top.sv");
        assert_eq!("Entries:".style(plain.label).to_string(), "Entries:");
    }

    #[test]
    fn test_colored_palette_adds_escapes() {
        let colored = Palette::colored();
        assert_ne!("failed".style(colored.failure).to_string(), "failed");
    }
}
