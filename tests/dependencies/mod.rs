//! Dependency tests
//!
//! How arguments become edges and how results flow along them.

mod methods;
