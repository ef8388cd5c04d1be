pub mod department_service;
pub mod event_service;
pub mod prayer_request_service;
pub mod sermon_service;
pub mod testimony_service;
pub mod user_service;

pub use department_service::{DepartmentFilter, DepartmentService, DepartmentWithMembers};
pub use event_service::{EventDetail, EventFilter, EventService};
pub use prayer_request_service::{PrayerRequestFilter, PrayerRequestService};
pub use sermon_service::{SermonFilter, SermonService};
pub use testimony_service::{TestimonyFilter, TestimonyService};
pub use user_service::{UserFilter, UserProfile, UserService};
