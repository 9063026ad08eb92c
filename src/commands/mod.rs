// Declarative lifecycle commands
pub mod declarative;

// Inspection and one-off execution
pub mod run;
pub mod show;
