//! finsight-core: transaction store, aggregation, projection and 50/30/20 budget engine

pub mod aggregate;
pub mod budget;
pub mod error;
pub mod finance;
pub mod projection;
pub mod registry;
pub mod report;
pub mod session;
pub mod store;
pub mod time;

pub use aggregate::{CashflowPeriod, CategoryShare, DailyTotal, LabelAggregate, MerchantTotal, PeriodTotal};
pub use budget::{BudgetAllocation, BudgetLine, BudgetStatusLine, NEEDS_SHARE, SAVINGS_SHARE, WANTS_SHARE};
pub use error::{EngineError, Result};
pub use finance::{BudgetGroup, Category, Transaction, TransactionKind};
pub use projection::{Forecast, project_next_period};
pub use registry::SessionRegistry;
pub use report::{AnalysisExport, DashboardSummary, ExpenseReport, Listing, ReportOptions};
pub use session::{QueryFilters, QueryResult, SavingsSummary, Session, SessionSettings};
pub use store::{TransactionFilter, TransactionStore};
pub use time::{Bucket, DateRange, RelativePeriod};
