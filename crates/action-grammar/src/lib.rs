//! action-grammar: compound device-command strings parsed into primitive tokens
//!
//! A compound command is a `+`-joined sequence of primitives, e.g. `"lamp+on"`
//! or `"right+snapshot"`. Parsing only tokenizes; sequencing rules (ambient
//! device class, default targets) are enforced by the executor.

mod token;
pub use token::{CompoundAction, DeviceClass, Direction, PowerState, Token};

mod parser;
pub use parser::parse;
