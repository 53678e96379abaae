use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod minister {
    use super::*;

    /// Form body for adding or editing a minister.
    ///
    /// Optional fields should be omitted rather than sent empty.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MinisterForm {
        pub full_name: String,
        pub department: Option<String>,
        pub phone: Option<String>,
        pub email: Option<String>,
        pub date_joined: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MinisterSearch {
        pub search: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MinisterView {
        pub id: i32,
        pub full_name: String,
        pub department: Option<String>,
        pub phone: Option<String>,
        pub email: Option<String>,
        pub date_joined: NaiveDate,
        pub total_savings: f64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod payment {
    use super::*;

    /// Form body for recording or editing a payment.
    ///
    /// `week_number` left out is derived server-side as the ISO week of
    /// `payment_date`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentForm {
        pub minister_id: i32,
        pub amount: f64,
        pub payment_date: NaiveDate,
        pub week_number: Option<i32>,
        pub note: Option<String>,
    }

    /// Inclusive date-range filter; either bound may be omitted.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentListParams {
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentView {
        pub id: i32,
        pub minister_id: i32,
        pub minister_name: String,
        pub amount: f64,
        pub payment_date: NaiveDate,
        pub week_number: Option<i32>,
        pub note: Option<String>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod report {
    use super::*;

    /// Form body for both report endpoints. Both bounds are required and
    /// inclusive; a reversed range produces an empty report.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportParams {
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PasswordChange {
        pub current_password: String,
        pub new_password: String,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TopSaver {
        pub id: i32,
        pub full_name: String,
        pub total_savings: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecentPayment {
        pub id: i32,
        pub minister_name: String,
        pub amount: f64,
        pub payment_date: NaiveDate,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Dashboard {
        pub total_ministers: u64,
        pub total_savings: f64,
        pub top_savers: Vec<TopSaver>,
        pub recent_payments: Vec<RecentPayment>,
        /// Collection day flag for the UI shell.
        pub is_sunday: bool,
    }
}
