//! Tests for expansion, guard selection, reduction and merging

mod append_tests;
mod guard_tests;
mod reduce_tests;
