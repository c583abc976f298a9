pub mod random;
pub mod stratified;
