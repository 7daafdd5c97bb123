//! Boothpack Prober - locate the interpreter and the optional native
//! components installed in the environment that will be bundled.

pub mod components;
pub mod executor;
pub mod interpreter;
pub mod probe;
pub mod search;

pub use components::{ComponentSpec, ProbeShape};
pub use executor::{Executor, LocalExecutor};
pub use interpreter::{locate_interpreter, InterpreterHandle};
pub use probe::{ComponentProbeResult, EnvironmentProbe, InterpreterProbe, ProbedLocation};
