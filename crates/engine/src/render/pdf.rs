//! Paginated-document encoding of a report.
//!
//! Built directly on `printpdf` with the builtin Helvetica faces: a Letter
//! page, a bold title, the period line, and bordered tables whose header row
//! uses a grey background with white text. Rows flow across pages and the
//! header row is repeated after every break.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};

use crate::report::{Report, ReportBody, format_amount};
use crate::{EngineError, ResultEngine};

// Letter page, portrait.
const PAGE_WIDTH: f64 = 215.9;
const PAGE_HEIGHT: f64 = 279.4;
const MARGIN: f64 = 15.0;
const ROW_HEIGHT: f64 = 8.0;
const LAYER_NAME: &str = "Layer 1";

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn white() -> Color {
    Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None))
}

fn header_grey() -> Color {
    Color::Rgb(Rgb::new(0.45, 0.45, 0.45, None))
}

/// Axis-aligned rectangle as a closed shape.
fn rect(x: f64, y_bottom: f64, width: f64, height: f64, fill: bool, stroke: bool) -> Line {
    let points = vec![
        (Point::new(Mm(x), Mm(y_bottom)), false),
        (Point::new(Mm(x + width), Mm(y_bottom)), false),
        (Point::new(Mm(x + width), Mm(y_bottom + height)), false),
        (Point::new(Mm(x), Mm(y_bottom + height)), false),
    ];
    Line {
        points,
        is_closed: true,
        has_fill: fill,
        has_stroke: stroke,
        is_clipping_path: false,
    }
}

/// Clip cell text to its column so rows never overlap horizontally.
fn fit(text: &str, column_width: f64, font_size: f64) -> String {
    let approx_char_width = font_size * 0.19;
    let max_chars = ((column_width - 4.0) / approx_char_width).max(1.0) as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Cursor over the growing document; tracks the current layer and vertical
/// position, breaking to a fresh page when a block would cross the margin.
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f64,
}

impl PageWriter<'_> {
    /// Returns true when a page break happened.
    fn ensure_room(&mut self, needed: f64) -> bool {
        if self.y - needed >= MARGIN {
            return false;
        }
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
        true
    }

    fn text_line(&mut self, font: &IndirectFontRef, size: f64, text: &str, advance: f64) {
        self.ensure_room(advance);
        self.layer.set_fill_color(black());
        self.layer
            .use_text(text, size, Mm(MARGIN), Mm(self.y - advance + 2.0), font);
        self.y -= advance;
    }

    fn spacer(&mut self, height: f64) {
        self.y -= height;
    }

    fn table_row(
        &mut self,
        columns: &[f64],
        cells: &[String],
        font: &IndirectFontRef,
        size: f64,
        header: bool,
    ) {
        let bottom = self.y - ROW_HEIGHT;
        let total_width: f64 = columns.iter().sum();

        if header {
            self.layer.set_fill_color(header_grey());
            self.layer
                .add_shape(rect(MARGIN, bottom, total_width, ROW_HEIGHT, true, false));
        }

        self.layer.set_outline_color(black());
        self.layer.set_outline_thickness(0.3);
        let mut x = MARGIN;
        for (column_width, cell) in columns.iter().zip(cells) {
            self.layer
                .add_shape(rect(x, bottom, *column_width, ROW_HEIGHT, false, true));
            self.layer
                .set_fill_color(if header { white() } else { black() });
            self.layer.use_text(
                fit(cell, *column_width, size),
                size,
                Mm(x + 2.0),
                Mm(bottom + 2.5),
                font,
            );
            x += column_width;
        }

        self.y = bottom;
    }

    /// Bordered table with a styled header row, repeated after page breaks.
    fn table(
        &mut self,
        columns: &[f64],
        header: &[String],
        rows: &[Vec<String>],
        bold: &IndirectFontRef,
        regular: &IndirectFontRef,
    ) {
        self.ensure_room(ROW_HEIGHT * 2.0);
        self.table_row(columns, header, bold, 10.0, true);
        for row in rows {
            if self.ensure_room(ROW_HEIGHT) {
                self.table_row(columns, header, bold, 10.0, true);
            }
            self.table_row(columns, row, regular, 9.0, false);
        }
    }
}

/// Render a report as a paginated PDF document.
pub fn render_pdf(report: &Report) -> ResultEngine<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        report.title(),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        LAYER_NAME,
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| EngineError::Render(err.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|err| EngineError::Render(err.to_string()))?;

    {
        let mut writer = PageWriter {
            doc: &doc,
            layer: doc.get_page(first_page).get_layer(first_layer),
            y: PAGE_HEIGHT - MARGIN,
        };

        writer.text_line(&bold, 16.0, &report.title(), 10.0);
        writer.text_line(&regular, 10.0, &report.period_line(), 6.0);
        writer.spacer(4.0);

        match &report.body {
            ReportBody::Summary {
                rows,
                total_amount,
                total_payments,
            } => {
                writer.text_line(&bold, 12.0, "Summary Statistics", 8.0);
                writer.table(
                    &[50.0, 50.0],
                    &["Metric".to_string(), "Value".to_string()],
                    &[
                        vec!["Total Amount".to_string(), format_amount(*total_amount)],
                        vec!["Total Payments".to_string(), total_payments.to_string()],
                    ],
                    &bold,
                    &regular,
                );
                writer.spacer(6.0);

                writer.text_line(&bold, 12.0, "Minister Contributions", 8.0);
                let table_rows: Vec<Vec<String>> = rows
                    .iter()
                    .map(|row| {
                        vec![
                            row.minister_name.clone(),
                            format_amount(row.total_amount),
                            row.payment_count.to_string(),
                        ]
                    })
                    .collect();
                writer.table(
                    &[85.0, 50.0, 50.0],
                    &[
                        "Minister Name".to_string(),
                        "Total Amount".to_string(),
                        "Number of Payments".to_string(),
                    ],
                    &table_rows,
                    &bold,
                    &regular,
                );
            }
            ReportBody::Detailed { rows } => {
                writer.text_line(&bold, 12.0, "Payment Details", 8.0);
                let table_rows: Vec<Vec<String>> = rows
                    .iter()
                    .map(|row| {
                        vec![
                            row.payment_date.format("%Y-%m-%d").to_string(),
                            row.minister_name.clone(),
                            format_amount(row.amount),
                            row.week_number.map(|w| w.to_string()).unwrap_or_default(),
                            row.note.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                writer.table(
                    &[25.0, 55.0, 30.0, 25.0, 50.0],
                    &[
                        "Date".to_string(),
                        "Minister Name".to_string(),
                        "Amount".to_string(),
                        "Week Number".to_string(),
                        "Note".to_string(),
                    ],
                    &table_rows,
                    &bold,
                    &regular,
                );
            }
        }
    }

    doc.save_to_bytes()
        .map_err(|err| EngineError::Render(err.to_string()))
}
