/// Compact `[CONTENT]` document returned as the text part of every tool result.
///
/// `A:` answer line, `N:` notes, `R:` references (`path:line label`); artifact text
/// follows its reference line.
pub(crate) struct ContextDocBuilder {
    out: String,
}

impl ContextDocBuilder {
    const QUOTE_PREFIX: &'static str = " ";

    #[must_use]
    pub(crate) fn new() -> Self {
        let mut out = String::new();
        out.push_str("[CONTENT]\n");
        Self { out }
    }

    #[must_use]
    pub(crate) fn finish(self) -> String {
        self.out
    }

    pub(crate) fn push_line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    pub(crate) fn push_blank(&mut self) {
        if !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out.push('\n');
    }

    pub(crate) fn push_answer(&mut self, text: &str) {
        self.push_line(&format!("A: {text}"));
    }

    pub(crate) fn push_note(&mut self, text: &str) {
        self.push_line(&format!("N: {text}"));
    }

    pub(crate) fn push_ref_header(&mut self, file: &str, line: usize, label: Option<&str>) {
        match label {
            Some(label) if !label.trim().is_empty() => {
                self.push_line(&format!("R: {file}:{line} {label}"));
            }
            _ => {
                self.push_line(&format!("R: {file}:{line}"));
            }
        }
    }

    fn line_needs_quoting(line: &str) -> bool {
        let trimmed = line.trim_start();
        trimmed.starts_with("[CONTENT]")
            || trimmed.starts_with("A:")
            || trimmed.starts_with("N:")
            || trimmed.starts_with("R:")
    }

    /// Push artifact text, quoting only lines that would read as envelope markers.
    pub(crate) fn push_block_smart(&mut self, block: &str) {
        for line in block.lines() {
            if Self::line_needs_quoting(line) {
                self.out.push_str(Self::QUOTE_PREFIX);
            }
            self.out.push_str(line);
            self.out.push('\n');
        }
    }
}
