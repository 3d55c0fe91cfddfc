//! Grammar productions.
//!
//! Split by syntactic category; each file adds methods to `Parser`.

mod expr;
mod stmt;
