pub use error::EngineError;
pub use ministers::MinisterDraft;
pub use ops::{DashboardStats, Engine, EngineBuilder, PaymentListFilter};
pub use payments::PaymentDraft;
pub use report::{
    CURRENCY_PREFIX, DetailRow, Report, ReportBody, ReportScope, SummaryRow, format_amount,
};

mod error;
pub mod ministers;
mod ops;
pub mod payments;
pub mod render;
mod report;

pub type ResultEngine<T> = Result<T, EngineError>;
