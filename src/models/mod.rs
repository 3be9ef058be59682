pub mod admin;
pub mod appointment;
pub mod condition;
pub mod doctor;
pub mod document;
pub mod enums;
pub mod patient;

pub use admin::Admin;
pub use appointment::Appointment;
pub use condition::MedicalCondition;
pub use doctor::Doctor;
pub use document::Document;
pub use enums::{AppointmentStatus, ConditionSeverity};
pub use patient::Patient;
