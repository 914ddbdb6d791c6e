//! The four pipeline stages. Each one is a stateless invocation: re-fetch
//! the campaign by id, mutate and persist it, then either hand off to
//! exactly one next stage or return a terminal result — never both.

pub mod copywriting;
pub mod intake;
pub mod research;
pub mod scheduling;
