mod common;

mod artifacts;
