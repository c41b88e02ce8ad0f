pub mod directory;
pub mod domain;
pub mod ledger;
pub mod ports;
pub mod slots;
pub mod steps;

pub use directory::ProviderDirectory;
pub use domain::{
    Appointment, AppointmentStatus, IntakeRecord, IntakeStep, Provider, StepKind,
};
pub use ledger::{AppointmentLedger, NewAppointment};
pub use ports::{AppointmentStore, IntakeStore, PortError, PortResult, SessionStore};
pub use steps::{demo_steps, IntakeFlow};
