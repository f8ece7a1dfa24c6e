//! Collected template errors and their rendering with source context.

/// A template error, tied to a 0-based source line unless `line` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fatal {
    pub message: String,
    pub line: Option<usize>,
}

impl Fatal {
    pub fn at(line: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: Some(line),
        }
    }

    /// A fatal that belongs to no particular line or file.
    pub fn global(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
        }
    }

    /// Render with one line of context on each side, `>` marking the line.
    ///
    /// ```text
    /// Cannot find value for variable HOST on line 2:
    ///   1 | [Host]
    /// > 2 | https://${HOST}
    ///   3 | [Backend]
    /// ```
    pub fn render(&self, source: &[String]) -> String {
        let Some(index) = self.line else {
            return format!("Fatal error {}", self.message);
        };
        let first = index.saturating_sub(1);
        let last = (index + 1).min(source.len().saturating_sub(1)).max(index);
        let width = (last + 1).to_string().len();

        let mut out = format!("{} on line {}:", self.message, index + 1);
        for i in first..=last {
            let marker = if i == index { '>' } else { ' ' };
            let text = source.get(i).map_or("", String::as_str);
            out.push_str(&format!("\n{marker} {:>width$} | {text}", i + 1));
        }
        out
    }
}

/// All fatals of one file, headed by the file name, separated by blank lines.
pub fn render_file(name: &str, fatals: &[Fatal], source: &[String]) -> String {
    let blocks: Vec<String> = fatals.iter().map(|f| f.render(source)).collect();
    format!("Fatal errors in {name}:\n{}", blocks.join("\n\n"))
}

/// Position-less fatals, one per line.
pub fn render_global(fatals: &[Fatal]) -> String {
    fatals
        .iter()
        .map(|f| f.render(&[]))
        .collect::<Vec<_>>()
        .join("\n")
}
