/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `user`: Registration, login, and profile endpoints
/// - `tasks`: Owner-scoped task CRUD endpoints

pub mod health;
pub mod tasks;
pub mod user;
