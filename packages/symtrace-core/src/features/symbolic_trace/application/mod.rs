//! Symbolic trace application layer

mod trace_usecase;

pub use trace_usecase::{TraceBuildingUseCase, TraceBuildingUseCaseImpl};
