use std::fmt::Write;

/// Terminal control sequences emitted by the rasterizer and the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscapeCodes {
    pub reset: String,
    /// Clears the screen and homes the cursor.
    pub clear: String,
    pub home: String,
    /// SGR introducer for a 24-bit foreground; followed by `R;G;Bm`.
    pub foreground: String,
}

impl EscapeCodes {
    /// Appends a 24-bit foreground color selection for `rgb`.
    pub fn push_truecolor(&self, out: &mut String, rgb: [u8; 3]) {
        out.push_str(&self.foreground);
        let _ = write!(out, "{};{};{}m", rgb[0], rgb[1], rgb[2]);
    }

    pub fn truecolor(&self, rgb: [u8; 3]) -> String {
        let mut out = String::with_capacity(self.foreground.len() + 12);
        self.push_truecolor(&mut out, rgb);
        out
    }
}

impl Default for EscapeCodes {
    fn default() -> Self {
        Self {
            reset: "\u{1b}[0m".into(),
            clear: "\u{1b}[2J\u{1b}[H".into(),
            home: "\u{1b}[H".into(),
            foreground: "\u{1b}[38;2;".into(),
        }
    }
}
