pub mod client;
pub mod types;

pub use client::BackendClient;
pub use types::{
    Activity, BudgetApproval, BudgetRequest, Committee, Member, MemberResponse, MemberStatus,
    MemberType, Message, NewMember, NewRequest, RequestStatus,
};
