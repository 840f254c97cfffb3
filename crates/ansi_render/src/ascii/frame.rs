/// One rendered block of styled text plus its cached line count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnsiFrame {
    text: String,
    line_count: usize,
}

impl AnsiFrame {
    pub fn new(text: String) -> Self {
        let line_count = text.bytes().filter(|&b| b == b'\n').count();
        Self { text, line_count }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
