mod common;
mod ptrr;
mod relationships;
mod snap;
