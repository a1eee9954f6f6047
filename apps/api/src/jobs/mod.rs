// Public careers surface: read-only job postings.

pub mod handlers;
