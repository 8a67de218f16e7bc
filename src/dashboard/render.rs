//! Structural model of the results view
//!
//! Responses are turned into typed rows of plain-text cells. The egui table
//! draws those cells as labels, and the HTML export escapes every one of
//! them, so backend text is never treated as markup.

use crate::models::{ReportRow, TableResponse};

/// Column headers, in display order after the bar column
pub const COLUMNS: [&str; 6] = ["flat", "flat%", "sum%", "cum", "cum%", "name"];

/// Bar width in pixels for a score of 1.0
pub const BAR_SCALE_PX: f32 = 100.0;

/// One table row ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    /// Score clamped to [0, 1]
    pub bar_fraction: f32,
    /// flat, flat%, sum%, cum, cum%, name
    pub cells: [String; 6],
}

impl RenderedRow {
    pub fn from_row(row: &ReportRow) -> Self {
        Self {
            bar_fraction: row.bar_fraction(),
            cells: [
                row.flat.to_string(),
                row.flat_perc.to_string(),
                row.flatsum_perc.to_string(),
                row.cum.to_string(),
                row.cum_perc.to_string(),
                row.name.clone(),
            ],
        }
    }

    pub fn bar_width_px(&self) -> f32 {
        self.bar_fraction * BAR_SCALE_PX
    }

    pub fn name(&self) -> &str {
        &self.cells[5]
    }
}

/// What the results panel currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    Table(Vec<RenderedRow>),
    /// Plain text: non-JSON bodies and error payloads
    Text(String),
}

impl ResultsView {
    pub fn from_response(response: &TableResponse) -> Self {
        match response {
            TableResponse::Rows(rows) => ResultsView::Table(rows.iter().map(RenderedRow::from_row).collect()),
            TableResponse::Fragment(text) => ResultsView::Text(text.clone()),
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            ResultsView::Table(rows) => rows.len(),
            ResultsView::Text(_) => 0,
        }
    }

    /// Export as an HTML fragment with every value escaped.
    pub fn to_html(&self) -> String {
        match self {
            ResultsView::Text(text) => format!("<pre>{}</pre>", escape_html(text)),
            ResultsView::Table(rows) => {
                let mut html = String::from("<table>\n<tr><th></th>");
                for column in COLUMNS {
                    html.push_str(&format!("<th>{}</th>", column));
                }
                html.push_str("</tr>\n");

                for row in rows {
                    html.push_str(&format!(
                        "<tr><td class=\"bar\"><div style=\"width:{}px\"></div></td>",
                        row.bar_width_px()
                    ));
                    for (i, cell) in row.cells.iter().enumerate() {
                        if i == 5 {
                            html.push_str(&format!("<td>{}</td>", escape_html(cell)));
                        } else {
                            html.push_str(&format!("<td class=\"num\">{}</td>", escape_html(cell)));
                        }
                    }
                    html.push_str("</tr>\n");
                }
                html.push_str("</table>\n");
                html
            }
        }
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metric;

    fn row(name: &str, score: f64) -> ReportRow {
        ReportRow {
            score,
            flat: Metric::Number(10.0),
            flat_perc: Metric::Text("10%".to_string()),
            flatsum_perc: Metric::Text("10%".to_string()),
            cum: Metric::Number(20.5),
            cum_perc: Metric::Text("20.50%".to_string()),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_rows_copied_verbatim_in_order() {
        let response = TableResponse::Rows(vec![row("main.b", 0.9), row("main.a", 0.1)]);
        let view = ResultsView::from_response(&response);
        match view {
            ResultsView::Table(rows) => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].name(), "main.b");
                assert_eq!(rows[1].name(), "main.a");
                assert_eq!(rows[0].cells, [
                    "10".to_string(),
                    "10%".to_string(),
                    "10%".to_string(),
                    "20.5".to_string(),
                    "20.50%".to_string(),
                    "main.b".to_string(),
                ]);
                assert!((rows[0].bar_width_px() - 90.0).abs() < 1e-3);
            }
            other => panic!("Expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_html_export_escapes_names() {
        let response = TableResponse::Rows(vec![row("<script>alert('x')</script>", 0.5)]);
        let html = ResultsView::from_response(&response).to_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("width:50px"));
    }

    #[test]
    fn test_html_export_escapes_error_text() {
        let view = ResultsView::Text("<b>boom</b> & more".to_string());
        assert_eq!(view.to_html(), "<pre>&lt;b&gt;boom&lt;/b&gt; &amp; more</pre>");
    }
}
