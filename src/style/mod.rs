//! Request-level styling model: sizes, orientation, filters and the request record.

pub(crate) mod model;
