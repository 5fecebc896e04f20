// Application layer - Use cases and the ports they depend on
pub mod countdown_task;
pub mod event_repository;
pub mod event_service;
pub mod media_store;
pub mod timeline_service;
pub mod upload_service;

#[cfg(test)]
pub mod testing;
