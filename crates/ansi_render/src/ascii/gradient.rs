use crate::AnsiError;

/// Glyph ramp ordered from the lightest-looking glyph (index 0) to the densest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gradient {
    chars: Vec<char>,
}

impl Gradient {
    pub fn new(chars: impl Into<String>) -> Self {
        let chars: Vec<char> = chars.into().chars().collect();
        assert!(chars.len() >= 2, "gradient must contain at least two characters");
        Self { chars }
    }

    pub fn try_new(chars: impl Into<String>) -> Result<Self, AnsiError> {
        let chars: Vec<char> = chars.into().chars().collect();
        if chars.len() < 2 {
            return Err(AnsiError::InvalidGradient);
        }
        Ok(Self { chars })
    }

    pub fn density() -> Self {
        Self::new(" _.,-=+:;cba!?0123456789$W#@Ñ")
    }

    pub fn detailed() -> Self {
        Self::new(" .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$")
    }

    pub fn standard() -> Self {
        Self::new(" .:-=+*#%@")
    }

    pub fn blocks() -> Self {
        Self::new(" ░▒▓█")
    }

    pub fn binary() -> Self {
        Self::new("01")
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn lightest(&self) -> char {
        self.chars[0]
    }

    pub fn densest(&self) -> char {
        self.chars[self.chars.len() - 1]
    }

    /// Quantizes an 8-bit luminance to a ramp level in `0..len`.
    pub fn level(&self, gray: u8) -> usize {
        let levels = (self.chars.len() - 1) as f64;
        (f64::from(gray) / 255.0 * levels).round() as usize
    }

    /// Darker pixels land on denser glyphs.
    pub fn glyph_for(&self, gray: u8) -> char {
        let max_index = self.chars.len() - 1;
        self.chars[max_index - self.level(gray).min(max_index)]
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::density()
    }
}
