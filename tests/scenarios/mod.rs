//! Tests that exercise the library as a whole on realistic databases
