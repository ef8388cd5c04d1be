pub mod department;
pub mod event;
pub mod file;
pub mod prayer_request;
pub mod sermon;
pub mod testimony;
pub mod user;

pub use department::Department;
pub use event::Event;
pub use file::File;
pub use prayer_request::PrayerRequest;
pub use sermon::Sermon;
pub use testimony::Testimony;
pub use user::User;
