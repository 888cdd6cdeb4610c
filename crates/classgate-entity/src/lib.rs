//! # classgate-entity
//!
//! Domain entity models for Classgate. Every struct in this crate is
//! either a persisted aggregate (users, courses, enrollments, live
//! sessions) or a value object carried between layers. Status and role
//! fields are closed enums; open strings from storage are normalized at
//! the store boundary.

pub mod course;
pub mod enrollment;
pub mod live;
pub mod user;
