mod hashmap_member_store;
mod redb_member_store;

pub use hashmap_member_store::*;
pub use redb_member_store::*;
