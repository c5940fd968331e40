pub mod engine;

pub use engine::QueryService;
