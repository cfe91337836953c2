pub mod appointment;
pub mod availability;
pub mod credentials;
pub mod draft;
pub mod professional;
pub mod service;
pub mod user;

pub use appointment::{
    AppointmentPatch, AppointmentServiceItem, AppointmentStatus, NewAppointment, NextAppointment,
    RecentAppointment, RecentAppointmentsPage, APPOINTMENT_ORIGIN,
};
pub use availability::{AvailableTimes, DateOption, Period, SlotGroup};
pub use credentials::Credentials;
pub use draft::AppointmentDraft;
pub use professional::ProfessionalProfile;
pub use service::{Service, ServiceCategory};
pub use user::{ProfileUpdate, UserProfile};
