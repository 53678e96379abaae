//! Stateless report renderers.
//!
//! Both encodings consume the same [`Report`](crate::Report) value; neither
//! touches the database. Rendering the same report twice yields identical
//! bytes.

mod csv;
mod pdf;

pub use csv::render_csv;
pub use pdf::render_pdf;
