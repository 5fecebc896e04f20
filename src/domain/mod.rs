// Domain layer - Pure models and computations, no I/O
pub mod countdown;
pub mod event;
pub mod media;
pub mod timeline;
pub mod upload;
