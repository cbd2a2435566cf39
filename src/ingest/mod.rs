/// Ingest layer: wire formats for the external APIs the service consumes.
///
/// Each upstream API gets its own file rather than bloating a single
/// module. Today that is only OpenAQ; `fixtures` holds test-only payloads.

pub mod openaq;

#[cfg(test)]
pub(crate) mod fixtures;
