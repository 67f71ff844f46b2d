// Application layer - Use case interactors

pub mod container;
pub mod controller;
pub mod convert_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use controller::{BatchCompletion, BatchController, BatchHandle, BatchReport};
pub use convert_interactor::BatchConverter;
