/// Public identifiers are opaque strings: millisecond timestamps in the
/// local store, UUIDs in Postgres, hex object ids in the document store.
pub type EntityId = String;
