//! Daybook Core Library
//!
//! Models, SQLite storage, authentication and owner-scoped services for the
//! Daybook productivity tracker.

pub mod auth;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use auth::{AuthService, Credentials, NewAccount, PasswordPolicy};
pub use error::{Error, Result};
pub use models::*;
pub use storage::{
    Database, GoalRepository, HabitRepository, NoteRepository, SessionRepository, Storage,
    UserRepository,
};
