//! # Domain Module
//!
//! Entity services. Each method builds one parameterized statement, runs it
//! through the storage gateway and maps rows to and from the public entity
//! shapes defined in the `shared` crate. There is no business logic beyond
//! that mapping and filter composition.

pub mod doctors_service;
pub mod patients_service;

pub use doctors_service::DoctorsService;
pub use patients_service::PatientsService;
