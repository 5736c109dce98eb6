//! Document-level output options

/// How the finished `<svg>` document is framed and laid out
///
/// The default is a bare fragment on a single line with the viewBox hugging
/// the rendered features.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvgConfig {
    /// Padding added around an accumulated viewBox; explicit extents and
    /// declared data bboxes are used as given
    pub viewbox_padding: f64,

    /// Prepend `<?xml ...?>` so the output is a file of its own
    pub standalone: bool,

    /// One line per definition and feature fragment
    pub pretty_print: bool,
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewbox_padding(mut self, padding: f64) -> Self {
        self.viewbox_padding = padding;
        self
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_pretty_print(mut self, pretty_print: bool) -> Self {
        self.pretty_print = pretty_print;
        self
    }

    /// Separator placed between fragments of the document
    pub fn line_break(&self) -> &'static str {
        if self.pretty_print {
            "\n"
        } else {
            ""
        }
    }
}
