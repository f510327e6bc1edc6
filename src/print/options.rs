//! Print panel options

use serde::{Deserialize, Serialize};

use crate::layout::WrapMode;

/// User choices made in the print panel accessory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintOptions {
    /// Print "Page N of M" above each page
    pub page_numbering: bool,
    /// Rewrap wrap-to-window text to the page width before printing
    pub wrapping_to_fit: bool,
    /// Whether the rewrap choice is offered at all
    pub shows_wrapping_to_fit: bool,
}

/// One line of the print panel summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryItem {
    pub name: &'static str,
    pub description: &'static str,
}

impl PrintOptions {
    /// Defaults for a document; the rewrap option only applies to wrap-to-window text
    pub fn for_wrap_mode(mode: WrapMode) -> Self {
        Self {
            shows_wrapping_to_fit: mode == WrapMode::WrapToWindow,
            ..Self::default()
        }
    }

    /// Whether printing must reflow the text container
    pub fn rewraps(&self, mode: WrapMode) -> bool {
        mode == WrapMode::WrapToWindow && self.shows_wrapping_to_fit && self.wrapping_to_fit
    }

    pub fn summary_items(&self) -> Vec<SummaryItem> {
        let on_off = |flag: bool| if flag { "On" } else { "Off" };
        let mut items = vec![SummaryItem {
            name: "Page Numbers",
            description: on_off(self.page_numbering),
        }];
        if self.shows_wrapping_to_fit {
            items.push(SummaryItem {
                name: "Rewrap to Fit Page",
                description: on_off(self.wrapping_to_fit),
            });
        }
        items
    }

    /// Header text for `page_index` when page numbering is on
    pub fn header_label(&self, page_index: usize, page_count: usize) -> Option<String> {
        self.page_numbering
            .then(|| format!("Page {} of {}", page_index + 1, page_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_to_page_hides_rewrap() {
        let options = PrintOptions::for_wrap_mode(WrapMode::WrapToPage);
        assert!(!options.shows_wrapping_to_fit);
        assert_eq!(options.summary_items().len(), 1);
        assert!(!PrintOptions {
            wrapping_to_fit: true,
            ..options
        }
        .rewraps(WrapMode::WrapToPage));
    }

    #[test]
    fn test_rewraps_only_when_chosen() {
        let mut options = PrintOptions::for_wrap_mode(WrapMode::WrapToWindow);
        assert!(!options.rewraps(WrapMode::WrapToWindow));
        options.wrapping_to_fit = true;
        assert!(options.rewraps(WrapMode::WrapToWindow));
        assert_eq!(
            options.summary_items()[1],
            SummaryItem {
                name: "Rewrap to Fit Page",
                description: "On"
            }
        );
    }

    #[test]
    fn test_header_label() {
        let mut options = PrintOptions::default();
        assert_eq!(options.header_label(0, 5), None);
        options.page_numbering = true;
        assert_eq!(options.header_label(1, 5).as_deref(), Some("Page 2 of 5"));
    }
}
