pub mod functor;
pub mod state;

pub use functor::DynamicsFunctor;
pub use state::State;
