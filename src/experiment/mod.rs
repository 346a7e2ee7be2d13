mod experiment;

pub use experiment::Experiment;
