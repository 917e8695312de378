mod processor;

pub use processor::InfraImageProcessor;
