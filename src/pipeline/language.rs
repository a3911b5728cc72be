pub const DEFAULT_ENGLISH_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub non_ascii: usize,
    pub total: usize,
    pub ratio: f64,
    pub english: bool,
}

/// Coarse English gate: text is English when the share of characters outside
/// printable ASCII stays below `threshold`.
#[derive(Debug, Clone, Copy)]
pub struct LanguageHeuristic {
    threshold: f64,
}

impl Default for LanguageHeuristic {
    fn default() -> Self {
        Self::new(DEFAULT_ENGLISH_THRESHOLD)
    }
}

impl LanguageHeuristic {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn classify(&self, text: &str) -> Classification {
        let total = text.chars().count();

        // Nothing to measure; let it through as English.
        if total == 0 {
            return Classification {
                non_ascii: 0,
                total: 0,
                ratio: 0.0,
                english: true,
            };
        }

        let non_ascii = text.chars().filter(|c| !is_printable_ascii(*c)).count();
        let ratio = non_ascii as f64 / total as f64;

        Classification {
            non_ascii,
            total,
            ratio,
            english: ratio < self.threshold,
        }
    }

    pub fn is_english(&self, text: &str) -> bool {
        self.classify(text).english
    }
}

pub fn is_english(text: &str) -> bool {
    LanguageHeuristic::default().is_english(text)
}

fn is_printable_ascii(c: char) -> bool {
    c.is_ascii_graphic() || matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}
