mod registry;

pub use registry::LockRegistry;
