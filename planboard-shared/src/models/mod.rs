/// Database models
///
/// Each model maps to one table and owns its CRUD operations. Handlers in
/// the API crate call these methods instead of writing SQL inline.
pub mod jsontext;
pub mod notification;
pub mod plan;
pub mod plan_member;
pub mod sections;
pub mod user;

pub use notification::Notification;
pub use plan::StrategicPlan;
pub use plan_member::PlanMember;
pub use user::User;
