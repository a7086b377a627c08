//! Progress display during a coordinator run

pub mod reporter;
