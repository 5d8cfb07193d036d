pub mod enums;
pub mod prescription;

pub use enums::{DoseFrequency, PrescriptionSource};
pub use prescription::{MedicationRecord, Prescription, Reminder, TakenEvent};
