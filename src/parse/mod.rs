pub mod amount;
pub mod budget;
pub mod membership;
pub mod scanner;

pub use budget::{parse_budget, BudgetSummary, DueSummary};
pub use membership::{parse_membership, MembershipSummary};
pub use scanner::{Entry, SectionScanner};
