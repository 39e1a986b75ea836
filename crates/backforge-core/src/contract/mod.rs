//! Creation contracts: the field set needed to create an instance of a class.

mod field;
mod synthesizer;

pub use field::{
    contract_name, Contract, ContractField, ElementType, EnumDef, EnumLiteral, FieldOrigin,
    FieldType, CONTRACT_SUFFIX,
};
pub use synthesizer::{ContractSet, ContractSynthesizer};
