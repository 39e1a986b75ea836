//! Relational storage layout.

mod layout;
mod synthesizer;

pub use layout::{
    ColumnDef, ColumnType, IdentityDef, JoinColumn, JoinTableDef, ParentRef, ReferenceColumn,
    StorageLayout, TableDef, DISCRIMINATOR_COLUMN, IDENTITY_COLUMN,
};
pub use synthesizer::{table_name, StorageSynthesizer};
