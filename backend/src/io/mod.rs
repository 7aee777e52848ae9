//! # IO Module
//!
//! Interface layer between HTTP clients (the two browser pages and anything
//! else speaking JSON) and the domain services. It extracts and validates
//! request input, calls the matching service method and maps the outcome to
//! a status code and body.

pub mod rest;
