//! Collectors module for cumulative performance counters.
//!
//! Each collector turns an OS-exposed statistics source into a cumulative
//! total that can be fed through a rate counter.

pub mod diskstats;
