//! Typed records and write payloads for the application surface.
//!
//! Everything here mirrors rows produced by the backend; stock arithmetic,
//! valuation and shrinkage math stay server-side. Drafts carry only
//! structural validation; business rules are the backend's concern.

pub mod counts;
pub mod delivery;
pub mod error;
pub mod material;
pub mod metrics;
pub mod reports;
pub mod team;

pub use counts::{CountLine, CountLineEntry, CountSession, CountStatus};
pub use delivery::{Delivery, DeliveryDraft, DeliveryLine};
pub use error::ValidationError;
pub use material::{Material, MaterialDraft};
pub use metrics::{PvrSummaryRow, ShrinkPoint, ShrinkRange};
pub use reports::{DailyReport, DailyReportDraft, UsageLine};
pub use team::{TeamMember, TeamMemberDraft};
