//! Terminal rendering for DataFrames: a shape line, `name:dtype` column
//! headers, and a head/tail row window with an elision marker between the
//! two blocks when the frame is taller than the window.

// dependencies
use std::fmt::{Display, Formatter};
use num_format::{Locale, ToFormattedString};
use crate::frame::DataFrame;

// rows shown from each end of a tall frame
const HEAD_ROWS: usize = 10;
const TAIL_ROWS: usize = 5;
// longest rendered cell before clipping
const CELL_CAP: usize = 24;
const GUTTER: &str = "  ";
const ELISION: &str = "...";

// clip long cell text, keeping the total within CELL_CAP characters
fn clip(text: String) -> String {
    if text.chars().count() <= CELL_CAP {
        return text;
    }
    let kept: String = text.chars().take(CELL_CAP - ELISION.len()).collect();
    format!("{kept}{ELISION}")
}

impl Display for DataFrame {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        // the visible row window: the whole frame when short, otherwise a
        // head block and a tail block with a gap between them
        let total = self.height();
        let elide = total > HEAD_ROWS + TAIL_ROWS;
        let visible: Vec<usize> = if elide {
            (0..HEAD_ROWS).chain(total - TAIL_ROWS..total).collect()
        } else {
            (0..total).collect()
        };

        // render every visible cell once; widths fall out of the same pass
        let headers: Vec<String> = self
            .columns()
            .iter()
            .map(|c| format!("{}:{}", c.name(), c.dtype()))
            .collect();
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        let cells: Vec<Vec<String>> = self
            .columns()
            .iter()
            .zip(widths.iter_mut())
            .map(|(column, width)| {
                visible
                    .iter()
                    .map(|&row| {
                        let text = column
                            .get(row)
                            .map(|value| clip(value.to_display_string()))
                            .unwrap_or_default();
                        *width = (*width).max(text.chars().count());
                        text
                    })
                    .collect()
            })
            .collect();

        writeln!(
            f,
            "\nshape: ({} rows, {} cols)",
            total.to_formatted_string(&Locale::en),
            self.width()
        )?;

        // header and rule
        let mut line = String::new();
        for (header, &width) in headers.iter().zip(&widths) {
            line.push_str(&format!("{header:<width$}{GUTTER}"));
        }
        writeln!(f, "{}", line.trim_end())?;
        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        writeln!(f, "{}", rule.join(GUTTER))?;

        // data rows, with the elision marker between head and tail blocks
        for (slot, _) in visible.iter().enumerate() {
            if elide && slot == HEAD_ROWS {
                writeln!(f, "{ELISION}")?;
            }
            let mut line = String::new();
            for (column_cells, &width) in cells.iter().zip(&widths) {
                line.push_str(&format!("{:<width$}{GUTTER}", column_cells[slot]));
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::frame::DataFrame;
    use crate::series::Series;

    #[test]
    fn renders_shape_headers_and_values() {
        let df = DataFrame::new(vec![
            Series::new_int64("n", vec![1, 2, 3]),
            Series::new_str("s", &["a", "bb", "ccc"]),
        ])
        .unwrap();
        let rendered = format!("{df}");
        assert!(rendered.contains("shape: (3 rows, 2 cols)"));
        assert!(rendered.contains("n:i64"));
        assert!(rendered.contains("s:str"));
        assert!(rendered.contains("ccc"));
        assert!(!rendered.contains("...")); // short frames show every row
    }

    #[test]
    fn tall_frames_show_head_and_tail_blocks() {
        let df = DataFrame::new(vec![Series::new_int64("n", (0..50).collect())]).unwrap();
        let rendered = format!("{df}");
        assert!(rendered.contains("shape: (50 rows, 1 cols)"));
        assert!(rendered.contains("\n...\n")); // the elision marker row
        assert!(rendered.contains("\n9\n")); // last head row
        assert!(rendered.contains("\n45\n")); // first tail row
        assert!(rendered.contains("\n49\n")); // final row survives
        assert!(!rendered.contains("\n20\n")); // middle rows are elided
    }

    #[test]
    fn long_cells_are_clipped() {
        let long = "x".repeat(60);
        let df =
            DataFrame::new(vec![Series::new_str("s", &[long.as_str(), "short"])]).unwrap();
        let rendered = format!("{df}");
        assert!(rendered.contains("xxx..."));
        assert!(!rendered.contains(&long));
        assert!(rendered.contains("short"));
    }

    #[test]
    fn null_rows_render_as_null() {
        use crate::bitmap::Bitmap;
        let df = DataFrame::new(vec![Series::new_int64("n", vec![1, 2])
            .with_validity(Bitmap::from_bools(&[true, false]))
            .unwrap()])
        .unwrap();
        assert!(format!("{df}").contains("null"));
    }
}
